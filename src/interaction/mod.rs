//! Per-widget drag controllers.
//!
//! Every editable entity follows the same gesture machine:
//! `Idle -> Dragging` on start, `Dragging -> Dragging` on each move and
//! `Dragging -> Idle` on end, which commits the edit. `cancel` is the only
//! other transition; it restores the pre-gesture value and commits nothing.

mod component;
mod ellipse;
mod weight_bar;

pub use component::{
    Component, ComponentArena, ComponentCanvasController, ComponentCommit, HandleEnd,
    project_onto_direction,
};
pub use ellipse::{
    ConfidenceEllipse, EllipseCommit, EllipseController, EllipseDomainGeometry, EllipseGesture,
    EllipseLayer,
};
pub use weight_bar::{WeightBarController, WeightCommit, WeightDragMode};

use serde::{Deserialize, Serialize};

use crate::core::PixelPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureState {
    Idle,
    Dragging,
}

/// Transient pointer positions of one entity's gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub down: Option<PixelPoint>,
    pub moved: Option<PixelPoint>,
}

impl DragState {
    pub fn begin(&mut self, pointer: PixelPoint) {
        self.down = Some(pointer);
        self.moved = None;
    }

    pub fn track(&mut self, pointer: PixelPoint) {
        self.moved = Some(pointer);
    }

    pub fn clear(&mut self) {
        self.down = None;
        self.moved = None;
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        if self.down.is_some() {
            GestureState::Dragging
        } else {
            GestureState::Idle
        }
    }

    /// Ratio of the live pointer's distance to `center` over the anchor's.
    ///
    /// Returns `1.0` without a live pointer or when the anchor sits on the
    /// center, so a degenerate gesture never rescales.
    #[must_use]
    pub fn radial_scale(&self, center: PixelPoint) -> f64 {
        let (Some(down), Some(moved)) = (self.down, self.moved) else {
            return 1.0;
        };
        let anchor_distance = down.distance_to(center);
        if anchor_distance == 0.0 {
            return 1.0;
        }
        let scale = moved.distance_to(center) / anchor_distance;
        if scale.is_finite() { scale } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radial_scale_is_identity_until_pointer_moves() {
        let mut state = DragState::default();
        let center = PixelPoint::new(0.0, 0.0);
        assert_eq!(state.radial_scale(center), 1.0);
        state.begin(PixelPoint::new(10.0, 0.0));
        assert_eq!(state.state(), GestureState::Dragging);
        assert_eq!(state.radial_scale(center), 1.0);
        state.track(PixelPoint::new(0.0, 25.0));
        assert!((state.radial_scale(center) - 2.5).abs() < 1e-12);
        state.clear();
        assert_eq!(state.state(), GestureState::Idle);
    }

    #[test]
    fn anchor_on_center_never_rescales() {
        let mut state = DragState::default();
        let center = PixelPoint::new(5.0, 5.0);
        state.begin(center);
        state.track(PixelPoint::new(50.0, 50.0));
        assert_eq!(state.radial_scale(center), 1.0);
    }
}
