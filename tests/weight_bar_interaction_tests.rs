use approx::assert_relative_eq;
use emblab::api::{ContainerLayout, Workbench, WorkbenchConfig};
use emblab::core::{ClassLabel, ContainerSize, ViewId, WeightChannel};
use emblab::interaction::{GestureState, WeightDragMode};
use emblab::protocol::RecordingChannel;
use emblab::render::{ElementKey, NullRenderer, Shape};
use serde_json::json;

type TestWorkbench = Workbench<NullRenderer, RecordingChannel>;

fn load_message(target: f64, max_upper_bound: f64) -> String {
    json!({
        "action": 4,
        "content": {
            "weights": {
                "tg": [{"label": 0, "val": target}, {"label": 1, "val": 0.5}],
                "bg": [{"label": 0, "val": 0.1}, {"label": 1, "val": 0.2}],
                "bw": [{"label": 0, "val": 0.9}, {"label": 1, "val": 0.4}]
            },
            "bounds": [{"label": "alpha", "val": 2.0}],
            "max_upper_bound": max_upper_bound,
            "emb": [
                {"x": 0.0, "y": 0.0, "label": 0},
                {"x": 2.0, "y": 0.0, "label": 0},
                {"x": 0.0, "y": 2.0, "label": 1}
            ],
            "components": {"x": [1.0, 0.0], "y": [0.0, 1.0], "feat_names": ["sepal", "petal"]},
            "label_to_name": {"0": "setosa", "1": "versicolor", "alpha": "alpha"}
        }
    })
    .to_string()
}

/// Weight plot area is 200 px wide with the default 60/30 side margins.
fn loaded_workbench(target: f64) -> TestWorkbench {
    loaded_with_bound(target, 10.0)
}

fn loaded_with_bound(target: f64, max_upper_bound: f64) -> TestWorkbench {
    let containers = ContainerLayout {
        weight_chart: ContainerSize::new(290.0, 160.0),
        ..ContainerLayout::default()
    };
    let config = WorkbenchConfig::default().with_containers(containers);
    let mut workbench = Workbench::new(config, NullRenderer::default(), RecordingChannel::new())
        .expect("valid workbench");
    workbench
        .handle_message(&load_message(target, max_upper_bound))
        .expect("initial load");
    workbench
}

fn target_value(workbench: &TestWorkbench, label: i64) -> f64 {
    workbench
        .store()
        .weights(WeightChannel::Target)
        .expect("target rows")
        .iter()
        .find(|entry| entry.label == ClassLabel::Id(label))
        .map(|entry| entry.val)
        .expect("row present")
}

#[test]
fn drag_end_commits_value_and_sends_one_update_request() {
    let mut workbench = loaded_workbench(0.3);
    let label = ClassLabel::Id(0);
    assert_relative_eq!(
        workbench
            .store()
            .pixel_area(ViewId::TargetWeight)
            .expect("area")
            .width,
        200.0
    );

    workbench
        .weight_drag_start(WeightChannel::Target, &label, WeightDragMode::Row, 150.0)
        .expect("start");
    let commit = workbench
        .weight_drag_end(WeightChannel::Target, &label, 150.0)
        .expect("end")
        .expect("commit");

    assert_relative_eq!(commit.value, 0.75);
    assert_relative_eq!(target_value(&workbench, 0), 0.75);
    assert_eq!(workbench.channel().len(), 1);

    let sent = workbench
        .channel()
        .last_json()
        .expect("json")
        .expect("one message");
    assert_eq!(sent["action"], 0);
    assert_eq!(sent["content"]["data"]["weights"]["tg"][0]["label"], 0);
    assert_relative_eq!(
        sent["content"]["data"]["weights"]["tg"][0]["val"]
            .as_f64()
            .expect("number"),
        0.75
    );
    assert_eq!(sent["content"]["data"]["bounds"][0]["label"], "alpha");
    assert_eq!(
        sent["content"]["data"]["emb"].as_array().map(Vec::len),
        Some(3)
    );
}

#[test]
fn moves_update_bar_live_without_requests() {
    let mut workbench = loaded_workbench(0.3);
    let label = ClassLabel::Id(0);
    workbench
        .weight_drag_start(WeightChannel::Target, &label, WeightDragMode::Handle, 60.0)
        .expect("start");
    for x in [80.0, 100.0, 120.0] {
        assert!(
            workbench
                .weight_drag_move(WeightChannel::Target, &label, x)
                .expect("move")
        );
    }

    assert!(workbench.channel().is_empty());
    assert_relative_eq!(target_value(&workbench, 0), 0.6);
    assert_eq!(
        workbench
            .weight_controller(WeightChannel::Target)
            .expect("controller")
            .gesture_state(&label),
        GestureState::Dragging
    );

    let elements = workbench
        .renderer()
        .elements(ViewId::TargetWeight)
        .expect("rendered view");
    let Some(Shape::Rect(bar)) = elements.get(&ElementKey::Bar(0)) else {
        panic!("bar missing");
    };
    assert_relative_eq!(bar.width, 120.0);
}

#[test]
fn out_of_range_pointer_is_clamped_to_domain() {
    let mut workbench = loaded_workbench(0.3);
    let label = ClassLabel::Id(1);
    workbench
        .weight_drag_start(WeightChannel::Target, &label, WeightDragMode::Row, -40.0)
        .expect("start");
    assert_eq!(target_value(&workbench, 1), 0.0);

    let commit = workbench
        .weight_drag_end(WeightChannel::Target, &label, 900.0)
        .expect("end")
        .expect("commit");
    assert_relative_eq!(commit.value, 1.0);
}

#[test]
fn oversized_backend_value_widens_axis_but_edits_stay_capped() {
    let mut workbench = loaded_workbench(1.5);
    let controller = workbench
        .weight_controller(WeightChannel::Target)
        .expect("controller");
    let rows = workbench
        .store()
        .weights(WeightChannel::Target)
        .expect("rows");
    assert_eq!(controller.x_domain(rows), (0.0, 1.5));

    let label = ClassLabel::Id(0);
    workbench
        .weight_drag_start(WeightChannel::Target, &label, WeightDragMode::Handle, 200.0)
        .expect("start");
    let commit = workbench
        .weight_drag_end(WeightChannel::Target, &label, 200.0)
        .expect("end")
        .expect("commit");
    assert_relative_eq!(commit.value, 1.0);
}

#[test]
fn cancel_restores_value_and_sends_nothing() {
    let mut workbench = loaded_workbench(0.3);
    let label = ClassLabel::Id(0);
    workbench
        .weight_drag_start(WeightChannel::Target, &label, WeightDragMode::Row, 10.0)
        .expect("start");
    workbench
        .weight_drag_move(WeightChannel::Target, &label, 190.0)
        .expect("move");

    assert!(
        workbench
            .weight_drag_cancel(WeightChannel::Target, &label)
            .expect("cancel")
    );
    assert_relative_eq!(target_value(&workbench, 0), 0.3);
    assert!(workbench.channel().is_empty());
    assert!(
        workbench
            .weight_drag_end(WeightChannel::Target, &label, 100.0)
            .expect("end")
            .is_none()
    );
}

#[test]
fn boundary_channel_follows_max_upper_bound() {
    let mut workbench = loaded_with_bound(0.3, 4.0);
    assert_ne!(workbench.config().boundary_max, 4.0);
    let controller = workbench
        .weight_controller(WeightChannel::Boundary)
        .expect("controller");
    assert_eq!(controller.domain_max(), 4.0);

    let label = ClassLabel::from("alpha");
    workbench
        .weight_drag_start(WeightChannel::Boundary, &label, WeightDragMode::Row, 50.0)
        .expect("start");
    assert_relative_eq!(
        workbench.store().weights(WeightChannel::Boundary).expect("bounds")[0].val,
        1.0
    );
    let commit = workbench
        .weight_drag_end(WeightChannel::Boundary, &label, 100_000.0)
        .expect("end")
        .expect("commit");
    assert_relative_eq!(commit.value, 4.0);

    let sent = workbench
        .channel()
        .last_json()
        .expect("json")
        .expect("message");
    assert_relative_eq!(
        sent["content"]["data"]["bounds"][0]["val"]
            .as_f64()
            .expect("number"),
        4.0
    );
}

#[test]
fn row_and_handle_drags_resolve_to_the_same_value() {
    let label = ClassLabel::Id(1);
    let commits: Vec<f64> = [WeightDragMode::Row, WeightDragMode::Handle]
        .into_iter()
        .map(|mode| {
            let mut workbench = loaded_workbench(0.3);
            workbench
                .weight_drag_start(WeightChannel::Background, &label, mode, 100.0)
                .expect("start");
            workbench
                .weight_drag_end(WeightChannel::Background, &label, 30.0)
                .expect("end")
                .expect("commit")
                .value
        })
        .collect();
    assert_relative_eq!(commits[0], 0.15);
    assert_relative_eq!(commits[1], commits[0]);
}

#[test]
fn unknown_row_label_is_rejected() {
    let mut workbench = loaded_workbench(0.3);
    let result = workbench.weight_drag_start(
        WeightChannel::Target,
        &ClassLabel::Id(9),
        WeightDragMode::Row,
        10.0,
    );
    assert!(result.is_err());
    assert!(workbench.channel().is_empty());
}
