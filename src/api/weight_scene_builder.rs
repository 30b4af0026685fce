use crate::core::{BandScale, LinearScale, PixelArea, ViewId, WeightEntry};
use crate::error::ViewResult;
use crate::render::palette::{self, label_color};
use crate::render::{
    ElementKey, LinePrimitive, RectPrimitive, Scene, Shape, Stroke, TextHAlign, TextPrimitive,
};

const AXIS_TICKS: usize = 3;
const FONT_PX: f64 = 12.0;
const TICK_FONT_PX: f64 = 10.0;

/// Geometry knobs shared by all weight charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightBarStyle {
    pub band_padding: f64,
    pub max_bar_height: f64,
    pub handle_width: f64,
}

/// Horizontal bar chart of one weight channel.
///
/// Each row gets a bar, a full-width transparent hit area for positional
/// drags and a narrow slider handle at the current value.
pub fn build_weight_scene(
    view: ViewId,
    area: PixelArea,
    subtitle: &str,
    rows: &[WeightEntry],
    row_names: &[String],
    x_scale: LinearScale,
    style: WeightBarStyle,
) -> ViewResult<Scene> {
    let mut scene = Scene::new(view, area);
    if !subtitle.is_empty() {
        scene.push(
            ElementKey::Subtitle,
            Shape::Text(TextPrimitive::new(
                subtitle,
                -(area.margins.left - 7.0),
                -8.0,
                FONT_PX,
                palette::NEUTRAL,
                TextHAlign::Left,
            )),
        );
    }

    scene.push(
        ElementKey::AxisLine,
        Shape::Line(LinePrimitive::new(
            0.0,
            area.height,
            area.width,
            area.height,
            1.0,
            palette::NEUTRAL,
        )),
    );
    for (index, tick) in x_scale.ticks(AXIS_TICKS).into_iter().enumerate() {
        scene.push(
            ElementKey::AxisTick(index),
            Shape::Text(TextPrimitive::new(
                format!("{tick:.1}"),
                x_scale.map(tick),
                area.height + 15.0,
                TICK_FONT_PX,
                palette::NEUTRAL,
                TextHAlign::Center,
            )),
        );
    }

    let bands = BandScale::rows(rows.len(), area, style.band_padding)?;
    let zero = x_scale.map(0.0);
    for (index, row) in rows.iter().enumerate() {
        let Some((top, height)) = bands.centered_bar(index, style.max_bar_height) else {
            continue;
        };
        let value_x = x_scale.map(row.val).max(0.0);

        if let Some(name) = row_names.get(index).filter(|name| !name.is_empty()) {
            scene.push(
                ElementKey::RowLabel(index),
                Shape::Text(TextPrimitive::new(
                    name.as_str(),
                    -6.0,
                    top + height * 0.5,
                    TICK_FONT_PX,
                    palette::NEUTRAL,
                    TextHAlign::Right,
                )),
            );
        }
        scene.push(
            ElementKey::Bar(index),
            Shape::Rect(
                RectPrimitive::new(zero, top, (value_x - zero).max(0.0), height, label_color(&row.label))
                    .with_stroke(Stroke::new(0.5, palette::OUTLINE)),
            ),
        );
        scene.push(
            ElementKey::BarHitArea(index),
            Shape::Rect(RectPrimitive::new(
                0.0,
                top,
                area.width,
                height,
                palette::TRANSPARENT,
            )),
        );
        scene.push(
            ElementKey::BarHandle(index),
            Shape::Rect(
                RectPrimitive::new(
                    value_x - style.handle_width * 0.5,
                    top + 2.0,
                    style.handle_width,
                    (height - 4.0).max(0.0),
                    palette::WHITE,
                )
                .with_stroke(Stroke::new(1.0, palette::OUTLINE)),
            ),
        );
    }
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Margins;

    #[test]
    fn bar_width_and_handle_follow_the_value() {
        let area = PixelArea::new(200.0, 100.0, Margins::new(25.0, 30.0, 25.0, 60.0));
        let scale = LinearScale::horizontal((0.0, 1.0), area).expect("scale");
        let style = WeightBarStyle {
            band_padding: 0.3,
            max_bar_height: 20.0,
            handle_width: 3.0,
        };
        let scene = build_weight_scene(
            ViewId::TargetWeight,
            area,
            "Target weight",
            &[WeightEntry::new(0, 0.25)],
            &["setosa".to_owned()],
            scale,
            style,
        )
        .expect("scene");

        let Some(Shape::Rect(bar)) = scene.get(&ElementKey::Bar(0)) else {
            panic!("bar missing");
        };
        assert!((bar.width - 50.0).abs() < 1e-9);
        assert!((bar.height - 20.0).abs() < 1e-9);
        let Some(Shape::Rect(handle)) = scene.get(&ElementKey::BarHandle(0)) else {
            panic!("handle missing");
        };
        assert!((handle.x - 48.5).abs() < 1e-9);
        assert!(scene.get(&ElementKey::AxisTick(2)).is_some());
        scene.validate().expect("valid");
    }
}
