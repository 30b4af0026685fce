use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{
    ClassLabel, ConfidenceArea, ConfidenceLevel, EmbeddedPoint, EmbeddingScales, PixelArea,
    PixelPoint, class_statistics, rotation_degrees, unique_labels,
};
use crate::error::{ViewError, ViewResult};
use crate::render::Color;
use crate::render::palette::label_color;

use super::{DragState, GestureState};

/// Semantic kind of an ellipse edit, as reported to the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EllipseGesture {
    Move,
    Scale,
}

/// One of the concentric rings every ellipse is drawn as.
///
/// Only the visual layer is filled; the others are transparent hit areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EllipseLayer {
    Visual,
    ScaleRing,
    Inert,
    MoveArea,
}

impl EllipseLayer {
    /// Paint order, bottom to top.
    pub const ALL: [Self; 4] = [Self::Visual, Self::ScaleRing, Self::Inert, Self::MoveArea];

    #[must_use]
    pub const fn size_scale(self) -> f64 {
        match self {
            Self::MoveArea => 0.3,
            _ => 1.0,
        }
    }

    #[must_use]
    pub const fn size_diff(self) -> f64 {
        match self {
            Self::ScaleRing => 3.0,
            Self::Inert => -3.0,
            _ => 0.0,
        }
    }

    #[must_use]
    pub const fn fill_opacity(self) -> f64 {
        match self {
            Self::Visual => 0.2,
            _ => 0.0,
        }
    }

    /// Gesture a pointer-down on this layer starts, if any.
    #[must_use]
    pub const fn gesture(self) -> Option<EllipseGesture> {
        match self {
            Self::ScaleRing => Some(EllipseGesture::Scale),
            Self::MoveArea => Some(EllipseGesture::Move),
            Self::Visual | Self::Inert => None,
        }
    }
}

/// Pixel-space confidence ellipse of one class, with its live drag state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceEllipse {
    pub label: ClassLabel,
    pub center: PixelPoint,
    pub radius_x: f64,
    pub radius_y: f64,
    pub rotation_slope: Option<f64>,
    pub fill: Color,
    pub drag: DragState,
    gesture: Option<EllipseGesture>,
}

impl ConfidenceEllipse {
    #[must_use]
    pub fn from_area(area: &ConfidenceArea, scales: EmbeddingScales, fill: Color) -> Self {
        Self {
            label: area.label.clone(),
            center: scales.to_pixel(area.mean_x, area.mean_y),
            radius_x: scales.x.map(area.conf_x) - scales.x.map(0.0),
            radius_y: scales.y.map(0.0) - scales.y.map(area.conf_y),
            rotation_slope: area.slope,
            fill,
            drag: DragState::default(),
            gesture: None,
        }
    }

    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        rotation_degrees(self.rotation_slope)
    }

    #[must_use]
    pub fn gesture(&self) -> Option<EllipseGesture> {
        self.gesture
    }

    /// Radii as currently displayed, including an in-flight scale gesture.
    #[must_use]
    pub fn live_radii(&self) -> (f64, f64) {
        let scale = match self.gesture {
            Some(EllipseGesture::Scale) => self.drag.radial_scale(self.center),
            _ => 1.0,
        };
        (
            (self.radius_x * scale).max(0.0),
            (self.radius_y * scale).max(0.0),
        )
    }

    #[must_use]
    pub fn layer_radii(&self, layer: EllipseLayer) -> (f64, f64) {
        let (rx, ry) = self.live_radii();
        (
            (rx * layer.size_scale() + layer.size_diff()).max(0.0),
            (ry * layer.size_scale() + layer.size_diff()).max(0.0),
        )
    }

    /// Center and radii inverted to data units.
    #[must_use]
    pub fn to_domain(&self, scales: EmbeddingScales) -> EllipseDomainGeometry {
        let (cx, cy) = scales.to_domain(self.center);
        EllipseDomainGeometry {
            label: self.label.clone(),
            cx,
            cy,
            rx: scales.x.invert(self.radius_x + scales.x.map(0.0)),
            ry: scales.y.invert(scales.y.map(0.0) - self.radius_y),
        }
    }
}

/// Ellipse geometry as sent with an `optimizeWeights` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseDomainGeometry {
    pub label: ClassLabel,
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipseCommit {
    pub gesture: EllipseGesture,
    pub label: ClassLabel,
}

#[derive(Debug, Clone)]
struct EllipseCache {
    scales: EmbeddingScales,
    ellipses: IndexMap<ClassLabel, ConfidenceEllipse>,
}

#[derive(Debug, Clone)]
struct ActiveEllipseDrag {
    label: ClassLabel,
    gesture: EllipseGesture,
    baseline: ConfidenceEllipse,
}

/// Confidence-ellipse cache and gesture controller of the embedding view.
///
/// Ellipses are derived lazily from the current points and then kept
/// across gestures so each drag composes from the last committed state.
/// Any data refresh must call [`EllipseController::invalidate`].
#[derive(Debug, Clone, Default)]
pub struct EllipseController {
    level: ConfidenceLevel,
    cache: Option<EllipseCache>,
    active: Option<ActiveEllipseDrag>,
}

impl EllipseController {
    #[must_use]
    pub fn new(level: ConfidenceLevel) -> Self {
        Self {
            level,
            cache: None,
            active: None,
        }
    }

    #[must_use]
    pub fn level(&self) -> ConfidenceLevel {
        self.level
    }

    /// Derives the ellipses unless a cached set exists.
    pub fn ensure(&mut self, points: &[EmbeddedPoint], area: PixelArea) -> ViewResult<()> {
        if self.cache.is_some() {
            return Ok(());
        }
        let scales = EmbeddingScales::fit(points, area)?;
        let labels = unique_labels(points);
        let ellipses: IndexMap<ClassLabel, ConfidenceEllipse> = class_statistics(points, &labels)
            .values()
            .map(|stats| {
                let conf = ConfidenceArea::from_statistics(stats, self.level);
                let ellipse = ConfidenceEllipse::from_area(&conf, scales, label_color(&stats.label));
                (stats.label.clone(), ellipse)
            })
            .collect();
        debug!(classes = ellipses.len(), level = self.level.percent(), "ellipses derived");
        self.cache = Some(EllipseCache { scales, ellipses });
        Ok(())
    }

    /// Drops the cache and any in-flight gesture.
    pub fn invalidate(&mut self) {
        if self.active.take().is_some() {
            debug!("ellipse gesture dropped by data refresh");
        }
        self.cache = None;
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    #[must_use]
    pub fn scales(&self) -> Option<EmbeddingScales> {
        self.cache.as_ref().map(|cache| cache.scales)
    }

    pub fn ellipses(&self) -> impl Iterator<Item = &ConfidenceEllipse> {
        self.cache
            .iter()
            .flat_map(|cache| cache.ellipses.values())
    }

    #[must_use]
    pub fn ellipse(&self, label: &ClassLabel) -> Option<&ConfidenceEllipse> {
        self.cache.as_ref()?.ellipses.get(label)
    }

    #[must_use]
    pub fn gesture_state(&self, label: &ClassLabel) -> GestureState {
        self.ellipse(label)
            .map_or(GestureState::Idle, |ellipse| ellipse.drag.state())
    }

    /// All ellipses in data units, in label order.
    #[must_use]
    pub fn domain_geometry(&self) -> Vec<EllipseDomainGeometry> {
        let Some(cache) = &self.cache else {
            return Vec::new();
        };
        cache
            .ellipses
            .values()
            .map(|ellipse| ellipse.to_domain(cache.scales))
            .collect()
    }

    pub fn start(
        &mut self,
        label: &ClassLabel,
        gesture: EllipseGesture,
        pointer: PixelPoint,
    ) -> ViewResult<()> {
        if let Some(active) = self.active.take() {
            self.restore(active);
        }
        let ellipse = self.ellipse_mut(label)?;
        let baseline = ellipse.clone();
        ellipse.gesture = Some(gesture);
        ellipse.drag.begin(pointer);
        if gesture == EllipseGesture::Scale {
            ellipse.drag.track(pointer);
        }
        debug!(%label, ?gesture, x = pointer.x, y = pointer.y, "ellipse drag start");
        self.active = Some(ActiveEllipseDrag {
            label: label.clone(),
            gesture,
            baseline,
        });
        Ok(())
    }

    /// Live update; returns `false` when `label` is not being dragged.
    pub fn drag(&mut self, label: &ClassLabel, pointer: PixelPoint) -> ViewResult<bool> {
        let Some(gesture) = self.active_gesture(label) else {
            return Ok(false);
        };
        if !pointer.is_finite() {
            return Ok(true);
        }
        let ellipse = self.ellipse_mut(label)?;
        ellipse.drag.track(pointer);
        if gesture == EllipseGesture::Move {
            ellipse.center = pointer;
        }
        trace!(%label, x = pointer.x, y = pointer.y, "ellipse drag update");
        Ok(true)
    }

    /// Persists the edited geometry as the new baseline.
    pub fn end(
        &mut self,
        label: &ClassLabel,
        pointer: PixelPoint,
    ) -> ViewResult<Option<EllipseCommit>> {
        let Some(gesture) = self.active_gesture(label) else {
            return Ok(None);
        };
        let ellipse = self.ellipse_mut(label)?;
        match gesture {
            EllipseGesture::Move => {
                if ellipse.drag.moved.is_some() && pointer.is_finite() {
                    ellipse.center = pointer;
                }
            }
            EllipseGesture::Scale => {
                if pointer.is_finite() {
                    ellipse.drag.track(pointer);
                }
                let (rx, ry) = ellipse.live_radii();
                ellipse.radius_x = rx;
                ellipse.radius_y = ry;
            }
        }
        ellipse.drag.clear();
        ellipse.gesture = None;
        debug!(
            %label,
            ?gesture,
            cx = ellipse.center.x,
            cy = ellipse.center.y,
            rx = ellipse.radius_x,
            ry = ellipse.radius_y,
            "ellipse drag committed"
        );
        self.active = None;
        Ok(Some(EllipseCommit {
            gesture,
            label: label.clone(),
        }))
    }

    /// Restores the pre-gesture geometry; returns `false` when nothing was active.
    pub fn cancel(&mut self, label: &ClassLabel) -> bool {
        match self.active.take() {
            Some(active) if active.label == *label => {
                self.restore(active);
                debug!(%label, "ellipse drag cancelled");
                true
            }
            other => {
                self.active = other;
                false
            }
        }
    }

    fn active_gesture(&self, label: &ClassLabel) -> Option<EllipseGesture> {
        self.active
            .as_ref()
            .filter(|active| active.label == *label)
            .map(|active| active.gesture)
    }

    fn restore(&mut self, active: ActiveEllipseDrag) {
        if let Some(cache) = self.cache.as_mut() {
            cache.ellipses.insert(active.label, active.baseline);
        }
    }

    fn ellipse_mut(&mut self, label: &ClassLabel) -> ViewResult<&mut ConfidenceEllipse> {
        self.cache
            .as_mut()
            .ok_or_else(|| ViewError::InvalidData("ellipses have not been derived".to_owned()))?
            .ellipses
            .get_mut(label)
            .ok_or_else(|| ViewError::UnknownLabel(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Margins;

    fn controller() -> EllipseController {
        let points = vec![
            EmbeddedPoint::new(0.0, 0.0, 0),
            EmbeddedPoint::new(2.0, 0.0, 0),
            EmbeddedPoint::new(0.0, 2.0, 1),
        ];
        let mut controller = EllipseController::default();
        controller
            .ensure(&points, PixelArea::new(200.0, 200.0, Margins::zero()))
            .expect("ellipses");
        controller
    }

    #[test]
    fn layers_map_to_gestures() {
        assert_eq!(EllipseLayer::ScaleRing.gesture(), Some(EllipseGesture::Scale));
        assert_eq!(EllipseLayer::MoveArea.gesture(), Some(EllipseGesture::Move));
        assert_eq!(EllipseLayer::Inert.gesture(), None);
    }

    #[test]
    fn inert_ring_never_goes_negative() {
        let controller = controller();
        let label = ClassLabel::Id(1);
        let ellipse = controller.ellipse(&label).expect("ellipse");
        assert_eq!(ellipse.live_radii(), (0.0, 0.0));
        assert_eq!(ellipse.layer_radii(EllipseLayer::Inert), (0.0, 0.0));
        assert_eq!(ellipse.layer_radii(EllipseLayer::ScaleRing), (3.0, 3.0));
    }

    #[test]
    fn cancel_restores_moved_center() {
        let mut controller = controller();
        let label = ClassLabel::Id(0);
        let before = controller.ellipse(&label).expect("ellipse").center;
        controller
            .start(&label, EllipseGesture::Move, before)
            .expect("start");
        controller
            .drag(&label, PixelPoint::new(10.0, 10.0))
            .expect("drag");
        assert!(controller.cancel(&label));
        let after = controller.ellipse(&label).expect("ellipse");
        assert_eq!(after.center, before);
        assert_eq!(after.drag.state(), GestureState::Idle);
        assert_eq!(
            controller.end(&label, PixelPoint::new(1.0, 1.0)).expect("end"),
            None
        );
    }
}
