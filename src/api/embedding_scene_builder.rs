use smallvec::SmallVec;

use crate::core::{EmbeddedPoint, EmbeddingScales, PixelArea, ViewId};
use crate::error::ViewResult;
use crate::interaction::{Component, ConfidenceEllipse, EllipseLayer, HandleEnd};
use crate::render::palette::{self, label_color};
use crate::render::{
    CirclePrimitive, Color, ElementKey, EllipsePrimitive, LinePrimitive, RectPrimitive, Scene, Shape,
    Stroke, TextHAlign, TextPrimitive,
};

const BADGE_RADIUS: f64 = 8.0;
const HANDLE_RADIUS: f64 = 8.0;
const LEGEND_ROW_PX: f64 = 16.0;
const LEGEND_SWATCH_PX: f64 = 10.0;
const FONT_PX: f64 = 11.0;

/// Radius range of embedding points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSizing {
    pub min_radius: f64,
    pub max_radius: f64,
}

impl PointSizing {
    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.min_radius + self.max_radius) * 0.5
    }

    /// Radius of every point, sized by the highlighted feature if any.
    ///
    /// Without a feature, with a flat value range or for a point missing
    /// the feature, the midpoint radius is used.
    #[must_use]
    pub fn radii(self, points: &[EmbeddedPoint], feature: Option<usize>) -> Vec<f64> {
        let mid = self.midpoint();
        let Some(feature) = feature else {
            return vec![mid; points.len()];
        };

        let (low, high) = points
            .iter()
            .filter_map(|point| point.feature_values.get(feature).copied())
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
                (low.min(value), high.max(value))
            });
        let span = high - low;
        if !span.is_finite() || span <= 0.0 {
            return vec![mid; points.len()];
        }

        points
            .iter()
            .map(|point| match point.feature_values.get(feature) {
                Some(value) if value.is_finite() => {
                    self.min_radius + (value - low) / span * (self.max_radius - self.min_radius)
                }
                _ => mid,
            })
            .collect()
    }
}

/// Legend row: display name and class fill.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub fill: Color,
}

/// Inputs of the embedding scene.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddingSceneInput<'a> {
    pub area: PixelArea,
    pub scales: EmbeddingScales,
    pub points: &'a [EmbeddedPoint],
    pub radii: &'a [f64],
    pub legend: &'a [LegendEntry],
}

/// Scatterplot with confidence ellipses, drawn components and legend.
pub fn build_embedding_scene<'a>(
    input: EmbeddingSceneInput<'_>,
    ellipses: impl Iterator<Item = &'a ConfidenceEllipse>,
    components: impl Iterator<Item = &'a Component>,
) -> ViewResult<Scene> {
    let area = input.area;
    let mut scene = Scene::new(ViewId::Embedding, area);
    scene.push(
        ElementKey::DrawCanvas,
        Shape::Rect(RectPrimitive::new(
            0.0,
            0.0,
            area.width,
            area.height,
            palette::TRANSPARENT,
        )),
    );

    for (index, point) in input.points.iter().enumerate() {
        if !point.x.is_finite() || !point.y.is_finite() {
            continue;
        }
        let center = input.scales.to_pixel(point.x, point.y);
        let radius = input.radii.get(index).copied().unwrap_or(0.0);
        scene.push(
            ElementKey::Point(index),
            Shape::Circle(
                CirclePrimitive::new(center.x, center.y, radius, label_color(&point.label))
                    .with_stroke(Stroke::new(0.5, palette::OUTLINE)),
            ),
        );
    }

    for ellipse in ellipses {
        let center = ellipse.center;
        let rotation = ellipse.rotation_degrees();
        let layers: SmallVec<[(EllipseLayer, (f64, f64)); 4]> = EllipseLayer::ALL
            .iter()
            .map(|&layer| (layer, ellipse.layer_radii(layer)))
            .collect();
        for (layer, (rx, ry)) in layers {
            scene.push(
                ElementKey::Ellipse {
                    layer,
                    label: ellipse.label.clone(),
                },
                Shape::Ellipse(EllipsePrimitive::new(
                    center.x,
                    center.y,
                    rx,
                    ry,
                    rotation,
                    ellipse.fill.with_alpha(layer.fill_opacity()),
                )),
            );
        }
    }

    for component in components.filter(|component| !component.removed) {
        push_component(&mut scene, component);
    }

    let legend_x = area.width + 10.0;
    for (index, entry) in input.legend.iter().enumerate() {
        let y = index as f64 * LEGEND_ROW_PX;
        scene.push(
            ElementKey::LegendSwatch(index),
            Shape::Rect(RectPrimitive::new(
                legend_x,
                y,
                LEGEND_SWATCH_PX,
                LEGEND_SWATCH_PX,
                entry.fill,
            )),
        );
        if !entry.name.is_empty() {
            scene.push(
                ElementKey::LegendText(index),
                Shape::Text(TextPrimitive::new(
                    entry.name.as_str(),
                    legend_x + LEGEND_SWATCH_PX + 4.0,
                    y + LEGEND_SWATCH_PX * 0.5,
                    FONT_PX,
                    palette::NEUTRAL,
                    TextHAlign::Left,
                )),
            );
        }
    }
    Ok(scene)
}

fn push_component(scene: &mut Scene, component: &Component) {
    let key = component.key;
    let (start, end) = (component.start, component.end);
    scene.push(
        ElementKey::ComponentLine(key),
        Shape::Line(
            LinePrimitive::new(start.x, start.y, end.x, end.y, 1.5, palette::GUIDE)
                .with_arrow_end(),
        ),
    );
    scene.push(
        ElementKey::ComponentBadge(key),
        Shape::Circle(
            CirclePrimitive::new(start.x, start.y, BADGE_RADIUS, palette::WHITE)
                .with_stroke(Stroke::new(0.5, palette::GUIDE)),
        ),
    );
    scene.push(
        ElementKey::ComponentBadgeText(key),
        Shape::Text(TextPrimitive::new(
            key.to_string(),
            start.x,
            start.y,
            FONT_PX,
            palette::NEUTRAL,
            TextHAlign::Center,
        )),
    );
    for end_kind in [HandleEnd::Start, HandleEnd::End] {
        let at = component.handle(end_kind);
        scene.push(
            ElementKey::ComponentHandle { key, end: end_kind },
            Shape::Circle(CirclePrimitive::new(
                at.x,
                at.y,
                HANDLE_RADIUS,
                palette::TRANSPARENT,
            )),
        );
    }
}
