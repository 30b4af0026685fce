use approx::assert_relative_eq;
use emblab::api::{ContainerLayout, Workbench, WorkbenchConfig};
use emblab::core::{ClassLabel, ContainerSize, PixelPoint, ViewId, WeightChannel};
use emblab::interaction::{EllipseLayer, WeightDragMode};
use emblab::protocol::RecordingChannel;
use emblab::render::palette;
use emblab::render::{ElementKey, NullRenderer, Shape};
use emblab::ViewError;
use serde_json::{Value, json};

type TestWorkbench = Workbench<NullRenderer, RecordingChannel>;

fn content() -> Value {
    json!({
        "weights": {
            "tg": [{"label": 0, "val": 0.5}, {"label": 1, "val": 0.5}],
            "bg": [{"label": 0, "val": 0.5}, {"label": 1, "val": 0.5}],
            "bw": [{"label": 0, "val": 0.5}, {"label": 1, "val": 0.5}]
        },
        "bounds": [{"label": "alpha", "val": 1.0}],
        "max_upper_bound": 3.0,
        "emb": [
            {"x": 0.0, "y": 0.0, "label": 0, "feat_vals": [1.0, 10.0]},
            {"x": 2.0, "y": 0.0, "label": 0, "feat_vals": [3.0, 10.0]},
            {"x": 0.0, "y": 2.0, "label": 1, "feat_vals": [2.0, 10.0]}
        ],
        "components": {
            "x": [0.2, 0.8],
            "y": [0.6, -0.4],
            "feat_names": ["sepal length in centimetres", "petal"]
        },
        "label_to_name": {"0": "setosa", "1": "virginica", "alpha": "alpha"}
    })
}

fn load(action: i64) -> String {
    json!({"action": action, "content": content()}).to_string()
}

fn loaded() -> TestWorkbench {
    let mut workbench = Workbench::new(
        WorkbenchConfig::default(),
        NullRenderer::default(),
        RecordingChannel::new(),
    )
    .expect("valid workbench");
    workbench.handle_message(&load(4)).expect("load");
    workbench
}

fn point_radius(workbench: &TestWorkbench, index: usize) -> f64 {
    let elements = workbench
        .renderer()
        .elements(ViewId::Embedding)
        .expect("embedding drawn");
    match elements.get(&ElementKey::Point(index)) {
        Some(Shape::Circle(circle)) => circle.radius,
        other => panic!("point {index} missing: {other:?}"),
    }
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let config = WorkbenchConfig::default().with_point_radius_range(8.0, 2.0);
    let result = Workbench::new(config, NullRenderer::default(), RecordingChannel::new());
    assert!(matches!(result, Err(ViewError::InvalidData(_))));

    let config = WorkbenchConfig::default().with_confidence_percent(100.0);
    assert!(Workbench::new(config, NullRenderer::default(), RecordingChannel::new()).is_err());
}

#[test]
fn nothing_is_drawn_before_the_first_load() {
    let workbench = Workbench::new(
        WorkbenchConfig::default(),
        NullRenderer::default(),
        RecordingChannel::new(),
    )
    .expect("valid workbench");
    assert_eq!(workbench.renderer().patches_applied, 0);
    assert_eq!(workbench.store().view_ids().count(), 8);
}

#[test]
fn embedding_draws_points_legend_and_canvas() {
    let workbench = loaded();
    let elements = workbench
        .renderer()
        .elements(ViewId::Embedding)
        .expect("embedding drawn");
    for index in 0..3 {
        assert!(elements.contains_key(&ElementKey::Point(index)));
    }
    assert!(elements.contains_key(&ElementKey::DrawCanvas));
    let Some(Shape::Text(first)) = elements.get(&ElementKey::LegendText(0)) else {
        panic!("legend missing");
    };
    assert_eq!(first.text, "setosa");
    assert!(elements.contains_key(&ElementKey::LegendText(1)));
    assert!(!elements.contains_key(&ElementKey::LegendText(2)));
}

#[test]
fn highlight_scales_points_by_feature_value() {
    let mut workbench = loaded();
    let uniform = point_radius(&workbench, 0);
    assert_relative_eq!(uniform, 4.0);

    workbench.highlight_feature(Some(0)).expect("highlight");
    assert_eq!(workbench.highlighted_feature(), Some(0));
    assert_relative_eq!(point_radius(&workbench, 0), 2.0);
    assert_relative_eq!(point_radius(&workbench, 1), 6.0);
    assert_relative_eq!(point_radius(&workbench, 2), 4.0);

    let names = workbench
        .renderer()
        .elements(ViewId::ComponentFeatureNames)
        .expect("feature names drawn");
    let Some(Shape::Text(label)) = names.get(&ElementKey::RowLabel(0)) else {
        panic!("row label missing");
    };
    assert_eq!(label.color, palette::OUTLINE);
    assert_eq!(label.text, "sepal length in cent...");

    workbench.highlight_feature(Some(1)).expect("flat feature");
    assert_relative_eq!(point_radius(&workbench, 1), 4.0);

    workbench.highlight_feature(None).expect("clear");
    assert_relative_eq!(point_radius(&workbench, 1), uniform);
    assert!(workbench.channel().is_empty());
}

#[test]
fn highlight_out_of_range_is_an_error() {
    let mut workbench = loaded();
    let applied = workbench.renderer().patches_applied;
    assert!(matches!(
        workbench.highlight_feature(Some(2)),
        Err(ViewError::InvalidData(_))
    ));
    assert_eq!(workbench.highlighted_feature(), None);
    assert_eq!(workbench.renderer().patches_applied, applied);
}

#[test]
fn full_reload_clears_highlight_and_gestures() {
    let mut workbench = loaded();
    workbench.highlight_feature(Some(0)).expect("highlight");
    let label = ClassLabel::Id(0);
    workbench
        .weight_drag_start(WeightChannel::Background, &label, WeightDragMode::Row, 30.0)
        .expect("start");

    workbench.handle_message(&load(3)).expect("reload");
    assert_eq!(workbench.highlighted_feature(), None);
    assert!(
        workbench
            .weight_drag_end(WeightChannel::Background, &label, 30.0)
            .expect("end")
            .is_none()
    );
    assert!(workbench.channel().is_empty());
    assert_eq!(
        workbench
            .weight_controller(WeightChannel::Boundary)
            .expect("controller")
            .domain_max(),
        3.0
    );
}

#[test]
fn resize_recomputes_areas_and_ellipses() {
    let mut workbench = loaded();
    let before = workbench
        .ellipses()
        .ellipse(&ClassLabel::Id(0))
        .expect("ellipse")
        .center;
    assert_relative_eq!(before.x, 250.0);

    let containers = ContainerLayout {
        embedding: ContainerSize::new(300.0, 300.0),
        component_strip: ContainerSize::new(600.0, 600.0),
        ..ContainerLayout::default()
    };
    workbench.resize(containers).expect("resize");

    let embedding = workbench.store().pixel_area(ViewId::Embedding).expect("area");
    assert_relative_eq!(embedding.width, 200.0);
    let after = workbench
        .ellipses()
        .ellipse(&ClassLabel::Id(0))
        .expect("ellipse")
        .center;
    assert_relative_eq!(after.x, 100.0);
    assert_relative_eq!(after.y, 200.0);

    let component = workbench.store().pixel_area(ViewId::ComponentY).expect("area");
    assert_relative_eq!(component.width, 300.0 - 12.0);
}

#[test]
fn resize_rejects_degenerate_containers() {
    let mut workbench = loaded();
    let containers = ContainerLayout {
        embedding: ContainerSize::new(0.0, 300.0),
        ..ContainerLayout::default()
    };
    assert!(workbench.resize(containers).is_err());
    assert_relative_eq!(
        workbench.store().pixel_area(ViewId::Embedding).expect("area").width,
        500.0
    );
}

#[test]
fn interaction_round_trip_reaches_backend_in_order() {
    let mut workbench = loaded();
    let label = ClassLabel::Id(1);

    workbench
        .weight_drag_start(WeightChannel::Target, &label, WeightDragMode::Handle, 42.0)
        .expect("weight start");
    workbench
        .weight_drag_end(WeightChannel::Target, &label, 84.0)
        .expect("weight end");

    workbench
        .ellipse_drag_start(&label, EllipseLayer::MoveArea, PixelPoint::new(0.0, 0.0))
        .expect("ellipse start");
    workbench
        .ellipse_drag_end(&label, PixelPoint::new(10.0, 10.0))
        .expect("ellipse end");

    workbench
        .component_draw_start(PixelPoint::new(0.0, 500.0))
        .expect("draw start");
    workbench
        .component_draw_end(PixelPoint::new(0.0, 250.0))
        .expect("draw end");

    let actions: Vec<i64> = workbench
        .channel()
        .sent()
        .iter()
        .map(|text| {
            serde_json::from_str::<Value>(text).expect("json")["action"]
                .as_i64()
                .expect("code")
        })
        .collect();
    assert_eq!(actions, vec![0, 1, 5]);
    assert_eq!(workbench.adapter().requests_sent(), 3);

    let sent = workbench.channel().last_json().expect("json").expect("message");
    assert_relative_eq!(sent["content"]["component"][0].as_f64().expect("v0"), 0.6);
    assert_relative_eq!(sent["content"]["component"][1].as_f64().expect("v1"), -0.4);
}

#[test]
fn backend_update_after_drawing_retires_component_panels() {
    let mut workbench = loaded();
    workbench
        .component_draw_start(PixelPoint::new(0.0, 500.0))
        .expect("draw start");
    let commit = workbench
        .component_draw_end(PixelPoint::new(250.0, 500.0))
        .expect("draw end")
        .expect("commit");
    assert!(workbench.store().contains(ViewId::Component(commit.key)));

    workbench.handle_message(&load(1)).expect("update");
    assert!(!workbench.store().contains(ViewId::Component(commit.key)));
    assert!(workbench.renderer().elements(ViewId::Component(commit.key)).is_none());
    assert_relative_eq!(
        workbench.store().pixel_area(ViewId::ComponentY).expect("area").width,
        200.0 - 12.0
    );
}
