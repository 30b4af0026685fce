use approx::assert_relative_eq;
use emblab::api::{Workbench, WorkbenchConfig};
use emblab::core::{ClassLabel, EmbeddedPoint, Margins, PixelArea, PixelPoint, ViewId};
use emblab::interaction::{EllipseController, EllipseGesture, EllipseLayer, GestureState};
use emblab::protocol::RecordingChannel;
use emblab::render::{ElementKey, NullRenderer, Shape};
use proptest::prelude::*;
use serde_json::json;

type TestWorkbench = Workbench<NullRenderer, RecordingChannel>;

fn load_message() -> String {
    json!({
        "action": 4,
        "content": {
            "weights": {"tg": [{"label": 0, "val": 0.5}, {"label": 1, "val": 0.5}]},
            "bounds": [{"label": "alpha", "val": 1.0}],
            "max_upper_bound": 5.0,
            "emb": [
                {"x": 0.0, "y": 0.0, "label": 0},
                {"x": 2.0, "y": 0.0, "label": 0},
                {"x": 0.0, "y": 2.0, "label": 1}
            ],
            "components": {"x": [1.0, 0.0], "y": [0.0, 1.0], "feat_names": ["a", "b"]},
            "label_to_name": {"0": "zero", "1": "one"}
        }
    })
    .to_string()
}

/// Embedding plot is 500x500 over the domain [0, 2] on both axes.
fn loaded_workbench() -> TestWorkbench {
    let mut workbench = Workbench::new(
        WorkbenchConfig::default(),
        NullRenderer::default(),
        RecordingChannel::new(),
    )
    .expect("valid workbench");
    workbench.handle_message(&load_message()).expect("load");
    workbench
}

fn fifty_percent_radius() -> f64 {
    (2.0 * std::f64::consts::LN_2).sqrt()
}

#[test]
fn ellipses_are_derived_on_first_render() {
    let workbench = loaded_workbench();
    let ellipse = workbench
        .ellipses()
        .ellipse(&ClassLabel::Id(0))
        .expect("class 0 ellipse");
    assert_relative_eq!(ellipse.center.x, 250.0);
    assert_relative_eq!(ellipse.center.y, 500.0);
    assert_relative_eq!(ellipse.radius_x, 250.0 * fifty_percent_radius(), epsilon = 1e-9);
    assert_relative_eq!(ellipse.radius_y, 0.0);
    assert_eq!(ellipse.rotation_degrees(), 0.0);

    let elements = workbench
        .renderer()
        .elements(ViewId::Embedding)
        .expect("embedding drawn");
    for layer in EllipseLayer::ALL {
        assert!(elements.contains_key(&ElementKey::Ellipse {
            layer,
            label: ClassLabel::Id(0),
        }));
    }
}

#[test]
fn move_gesture_sends_optimize_request_in_domain_units() {
    let mut workbench = loaded_workbench();
    let label = ClassLabel::Id(0);

    assert!(
        workbench
            .ellipse_drag_start(&label, EllipseLayer::MoveArea, PixelPoint::new(250.0, 500.0))
            .expect("start")
    );
    workbench
        .ellipse_drag_move(&label, PixelPoint::new(280.0, 450.0))
        .expect("move");
    assert!(workbench.channel().is_empty());

    let commit = workbench
        .ellipse_drag_end(&label, PixelPoint::new(300.0, 400.0))
        .expect("end")
        .expect("commit");
    assert_eq!(commit.gesture, EllipseGesture::Move);

    let sent = workbench
        .channel()
        .last_json()
        .expect("json")
        .expect("message");
    let data = &sent["content"]["data"];
    assert_eq!(sent["action"], 1);
    assert_eq!(data["interaction"], "move");
    assert_eq!(data["updated_label"], 0);
    let ellipses = data["ellipses"].as_array().expect("ellipses");
    assert_eq!(ellipses.len(), 2);
    assert_relative_eq!(ellipses[0]["cx"].as_f64().expect("cx"), 1.2, epsilon = 1e-9);
    assert_relative_eq!(ellipses[0]["cy"].as_f64().expect("cy"), 0.4, epsilon = 1e-9);
    assert_relative_eq!(
        ellipses[0]["rx"].as_f64().expect("rx"),
        fifty_percent_radius(),
        epsilon = 1e-9
    );
    assert_eq!(data["emb"].as_array().map(Vec::len), Some(3));
}

#[test]
fn scale_gesture_multiplies_radii_by_pointer_distance_ratio() {
    let mut workbench = loaded_workbench();
    let label = ClassLabel::Id(0);
    let before = workbench
        .ellipses()
        .ellipse(&label)
        .expect("ellipse")
        .radius_x;

    workbench
        .ellipse_drag_start(&label, EllipseLayer::ScaleRing, PixelPoint::new(350.0, 500.0))
        .expect("start");
    workbench
        .ellipse_drag_move(&label, PixelPoint::new(450.0, 500.0))
        .expect("move");

    let elements = workbench
        .renderer()
        .elements(ViewId::Embedding)
        .expect("embedding drawn");
    let Some(Shape::Ellipse(visual)) = elements.get(&ElementKey::Ellipse {
        layer: EllipseLayer::Visual,
        label: label.clone(),
    }) else {
        panic!("visual layer missing");
    };
    assert_relative_eq!(visual.rx, before * 2.0, epsilon = 1e-9);

    workbench
        .ellipse_drag_end(&label, PixelPoint::new(450.0, 500.0))
        .expect("end")
        .expect("commit");
    let after = workbench.ellipses().ellipse(&label).expect("ellipse");
    assert_relative_eq!(after.radius_x, before * 2.0, epsilon = 1e-9);
    assert_eq!(after.drag.state(), GestureState::Idle);

    let sent = workbench
        .channel()
        .last_json()
        .expect("json")
        .expect("message");
    assert_eq!(sent["content"]["data"]["interaction"], "scale");
}

#[test]
fn inert_and_visual_layers_start_nothing() {
    let mut workbench = loaded_workbench();
    let label = ClassLabel::Id(0);
    for layer in [EllipseLayer::Inert, EllipseLayer::Visual] {
        assert!(
            !workbench
                .ellipse_drag_start(&label, layer, PixelPoint::new(250.0, 500.0))
                .expect("start")
        );
    }
    assert!(
        workbench
            .ellipse_drag_end(&label, PixelPoint::new(0.0, 0.0))
            .expect("end")
            .is_none()
    );
    assert!(workbench.channel().is_empty());
}

#[test]
fn cancel_restores_geometry_without_request() {
    let mut workbench = loaded_workbench();
    let label = ClassLabel::Id(0);
    let before = workbench.ellipses().ellipse(&label).expect("ellipse").clone();

    workbench
        .ellipse_drag_start(&label, EllipseLayer::ScaleRing, PixelPoint::new(350.0, 500.0))
        .expect("start");
    workbench
        .ellipse_drag_move(&label, PixelPoint::new(260.0, 500.0))
        .expect("move");
    assert!(workbench.ellipse_drag_cancel(&label).expect("cancel"));

    let after = workbench.ellipses().ellipse(&label).expect("ellipse");
    assert_eq!(after.radius_x, before.radius_x);
    assert_eq!(after.center, before.center);
    assert!(workbench.channel().is_empty());
}

#[test]
fn backend_update_discards_edited_ellipses() {
    let mut workbench = loaded_workbench();
    let label = ClassLabel::Id(0);
    workbench
        .ellipse_drag_start(&label, EllipseLayer::MoveArea, PixelPoint::new(250.0, 500.0))
        .expect("start");
    workbench
        .ellipse_drag_end(&label, PixelPoint::new(100.0, 100.0))
        .expect("end");

    let update = load_message().replace("\"action\":4", "\"action\":1");
    workbench.handle_message(&update).expect("update");
    let ellipse = workbench.ellipses().ellipse(&label).expect("ellipse");
    assert_relative_eq!(ellipse.center.x, 250.0);
    assert_relative_eq!(ellipse.center.y, 500.0);
}

fn controller_with_ellipses() -> EllipseController {
    let points = vec![
        EmbeddedPoint::new(-1.0, -0.5, 0),
        EmbeddedPoint::new(1.0, 0.5, 0),
        EmbeddedPoint::new(0.0, 1.0, 0),
    ];
    let mut controller = EllipseController::default();
    controller
        .ensure(&points, PixelArea::new(300.0, 300.0, Margins::zero()))
        .expect("ellipses");
    controller
}

proptest! {
    #[test]
    fn scale_drags_never_produce_negative_radii(
        path in prop::collection::vec((-400.0f64..700.0, -400.0f64..700.0), 1..12),
        anchor in (-400.0f64..700.0, -400.0f64..700.0)
    ) {
        let mut controller = controller_with_ellipses();
        let label = ClassLabel::Id(0);
        controller
            .start(&label, EllipseGesture::Scale, PixelPoint::new(anchor.0, anchor.1))
            .expect("start");
        for &(x, y) in &path {
            controller.drag(&label, PixelPoint::new(x, y)).expect("drag");
            let ellipse = controller.ellipse(&label).expect("ellipse");
            for layer in EllipseLayer::ALL {
                let (rx, ry) = ellipse.layer_radii(layer);
                prop_assert!(rx >= 0.0 && ry >= 0.0);
            }
        }
        let last = path[path.len() - 1];
        controller
            .end(&label, PixelPoint::new(last.0, last.1))
            .expect("end");
        let ellipse = controller.ellipse(&label).expect("ellipse");
        prop_assert!(ellipse.radius_x >= 0.0 && ellipse.radius_y >= 0.0);
    }
}
