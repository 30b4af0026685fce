use crate::core::{BandScale, LinearScale, PixelArea, ViewId};
use crate::error::ViewResult;
use crate::render::palette;
use crate::render::{
    CirclePrimitive, ElementKey, LinePrimitive, RectPrimitive, Scene, Shape, Stroke, TextHAlign,
    TextPrimitive,
};

/// Loadings and projections are drawn over this fixed domain.
pub const COMPONENT_DOMAIN: (f64, f64) = (-1.0, 1.0);
/// Feature names longer than this are cut and suffixed with `...`.
pub const MAX_FEATURE_NAME_CHARS: usize = 20;

const BADGE_RADIUS: f64 = 8.0;
const FONT_PX: f64 = 10.0;

/// Horizontal value bars centered at zero, one per row.
pub fn build_component_scene(
    view: ViewId,
    area: PixelArea,
    subtitle: &str,
    values: &[f64],
    band_padding: f64,
    max_bar_height: f64,
) -> ViewResult<Scene> {
    let mut scene = Scene::new(view, area);
    let x = LinearScale::horizontal(COMPONENT_DOMAIN, area)?;
    let mid = x.map(0.0);

    if !subtitle.is_empty() {
        scene.push(
            ElementKey::SubtitleBadge,
            Shape::Circle(
                CirclePrimitive::new(mid, -10.0, BADGE_RADIUS, palette::WHITE)
                    .with_stroke(Stroke::new(0.5, palette::GUIDE)),
            ),
        );
        scene.push(
            ElementKey::Subtitle,
            Shape::Text(TextPrimitive::new(
                subtitle,
                mid,
                -10.0,
                FONT_PX,
                palette::NEUTRAL,
                TextHAlign::Center,
            )),
        );
    }
    scene.push(
        ElementKey::Background,
        Shape::Rect(RectPrimitive::new(
            0.0,
            0.0,
            area.width,
            area.height,
            palette::PANEL_BACKGROUND,
        )),
    );
    scene.push(
        ElementKey::AxisLine,
        Shape::Line(LinePrimitive::new(mid, 0.0, mid, area.height, 1.0, palette::GUIDE)),
    );
    for (index, tick) in x.ticks(3).into_iter().enumerate() {
        scene.push(
            ElementKey::AxisTick(index),
            Shape::Text(TextPrimitive::new(
                format!("{tick}"),
                x.map(tick),
                area.height + 12.0,
                FONT_PX,
                palette::NEUTRAL,
                TextHAlign::Center,
            )),
        );
    }

    let bands = BandScale::rows(values.len(), area, band_padding)?;
    for (index, value) in values.iter().enumerate() {
        let Some((top, height)) = bands.centered_bar(index, max_bar_height) else {
            continue;
        };
        let value = if value.is_finite() {
            value.clamp(COMPONENT_DOMAIN.0, COMPONENT_DOMAIN.1)
        } else {
            0.0
        };
        let end = x.map(value);
        scene.push(
            ElementKey::Bar(index),
            Shape::Rect(RectPrimitive::new(
                mid.min(end),
                top,
                (end - mid).abs(),
                height,
                palette::COMPONENT_BAR,
            )),
        );
    }
    Ok(scene)
}

/// Feature name column aligned with the component rows.
pub fn build_feature_name_scene(
    area: PixelArea,
    names: &[String],
    highlighted: Option<usize>,
    band_padding: f64,
) -> ViewResult<Scene> {
    let mut scene = Scene::new(ViewId::ComponentFeatureNames, area);
    let bands = BandScale::rows(names.len(), area, band_padding)?;
    for (index, name) in names.iter().enumerate() {
        let Some(top) = bands.position(index) else {
            continue;
        };
        let short = shorten_feature_name(name);
        if short.is_empty() {
            continue;
        }
        let color = if highlighted == Some(index) {
            palette::OUTLINE
        } else {
            palette::GUIDE
        };
        scene.push(
            ElementKey::RowLabel(index),
            Shape::Text(TextPrimitive::new(
                short,
                area.width,
                top + bands.bandwidth() * 0.5,
                FONT_PX,
                color,
                TextHAlign::Right,
            )),
        );
    }
    Ok(scene)
}

#[must_use]
pub fn shorten_feature_name(name: &str) -> String {
    if name.chars().count() > MAX_FEATURE_NAME_CHARS {
        let mut short: String = name.chars().take(MAX_FEATURE_NAME_CHARS).collect();
        short.push_str("...");
        short
    } else {
        name.to_owned()
    }
}
