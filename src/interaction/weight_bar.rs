use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{ClassLabel, LinearScale, PixelArea, PixelPoint, WeightChannel, WeightEntry};
use crate::error::{ViewError, ViewResult};
use crate::store::ViewStateStore;

use super::{DragState, GestureState};

/// Where on a weight row the gesture started.
///
/// Both modes map the pointer x straight to a clamped value, so they commit
/// identically; the mode only tags the gesture in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightDragMode {
    /// Anywhere along the row: the value jumps to the pointer.
    Row,
    /// The narrow slider handle at the current value.
    Handle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightCommit {
    pub channel: WeightChannel,
    pub label: ClassLabel,
    pub value: f64,
}

#[derive(Debug, Clone, Copy)]
struct ActiveWeightDrag {
    mode: WeightDragMode,
    state: DragState,
    baseline: f64,
    scale: LinearScale,
}

/// Drag controller for one weight bar chart.
///
/// The x-scale is captured at gesture start so a value that shrinks the
/// chart domain mid-drag does not move the ground under the pointer.
#[derive(Debug, Clone)]
pub struct WeightBarController {
    channel: WeightChannel,
    domain_max: f64,
    active: IndexMap<ClassLabel, ActiveWeightDrag>,
}

impl WeightBarController {
    pub fn new(channel: WeightChannel, domain_max: f64) -> ViewResult<Self> {
        let mut controller = Self {
            channel,
            domain_max: 1.0,
            active: IndexMap::new(),
        };
        controller.set_domain_max(domain_max)?;
        Ok(controller)
    }

    #[must_use]
    pub fn channel(&self) -> WeightChannel {
        self.channel
    }

    #[must_use]
    pub fn domain_max(&self) -> f64 {
        self.domain_max
    }

    pub fn set_domain_max(&mut self, domain_max: f64) -> ViewResult<()> {
        if !domain_max.is_finite() || domain_max <= 0.0 {
            return Err(ViewError::InvalidData(format!(
                "weight domain max for {:?} must be finite and > 0",
                self.channel
            )));
        }
        self.domain_max = domain_max;
        Ok(())
    }

    /// `[0, max(domain_max, largest value)]`, so oversized backend values stay visible.
    #[must_use]
    pub fn x_domain(&self, entries: &[WeightEntry]) -> (f64, f64) {
        let largest = entries
            .iter()
            .map(|entry| entry.val)
            .filter(|val| val.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        (0.0, self.domain_max.max(largest))
    }

    pub fn x_scale(&self, entries: &[WeightEntry], area: PixelArea) -> ViewResult<LinearScale> {
        LinearScale::horizontal(self.x_domain(entries), area)
    }

    /// Domain value under `pointer_x`, clamped to `[0, domain_max]`.
    #[must_use]
    pub fn value_at(&self, scale: LinearScale, pointer_x: f64) -> f64 {
        clamped_value(scale, pointer_x, self.domain_max)
    }

    #[must_use]
    pub fn gesture_state(&self, label: &ClassLabel) -> GestureState {
        self.active
            .get(label)
            .map_or(GestureState::Idle, |drag| drag.state.state())
    }

    pub fn start(
        &mut self,
        store: &mut ViewStateStore,
        label: &ClassLabel,
        mode: WeightDragMode,
        pointer_x: f64,
    ) -> ViewResult<()> {
        let view = self.channel.view();
        let area = store.pixel_area(view)?;
        let entries = store.weights(self.channel)?;
        let baseline = entries
            .iter()
            .find(|entry| entry.label == *label)
            .map(|entry| entry.val)
            .ok_or_else(|| ViewError::UnknownLabel(label.to_string()))?;
        let scale = self.x_scale(entries, area)?;

        let mut state = DragState::default();
        state.begin(PixelPoint::new(pointer_x, 0.0));
        self.active.insert(
            label.clone(),
            ActiveWeightDrag {
                mode,
                state,
                baseline,
                scale,
            },
        );
        debug!(channel = ?self.channel, %label, ?mode, pointer_x, "weight drag start");
        self.apply_pointer(store, label, pointer_x)?;
        Ok(())
    }

    /// Live update; returns `false` when `label` is not being dragged.
    pub fn drag(
        &mut self,
        store: &mut ViewStateStore,
        label: &ClassLabel,
        pointer_x: f64,
    ) -> ViewResult<bool> {
        if !self.active.contains_key(label) {
            return Ok(false);
        }
        self.apply_pointer(store, label, pointer_x)?;
        Ok(true)
    }

    /// Commits the value under the release position.
    pub fn end(
        &mut self,
        store: &mut ViewStateStore,
        label: &ClassLabel,
        pointer_x: f64,
    ) -> ViewResult<Option<WeightCommit>> {
        if !self.active.contains_key(label) {
            return Ok(None);
        }
        let value = self.apply_pointer(store, label, pointer_x)?;
        if let Some(drag) = self.active.shift_remove(label) {
            debug!(
                channel = ?self.channel,
                %label,
                mode = ?drag.mode,
                from = drag.baseline,
                to = value,
                "weight drag committed"
            );
        }
        Ok(Some(WeightCommit {
            channel: self.channel,
            label: label.clone(),
            value,
        }))
    }

    /// Restores the pre-gesture value; returns `false` when nothing was active.
    pub fn cancel(&mut self, store: &mut ViewStateStore, label: &ClassLabel) -> ViewResult<bool> {
        let Some(drag) = self.active.shift_remove(label) else {
            return Ok(false);
        };
        if let Some(entry) = store
            .weights_mut(self.channel)?
            .iter_mut()
            .find(|entry| entry.label == *label)
        {
            entry.val = drag.baseline;
        }
        debug!(channel = ?self.channel, %label, "weight drag cancelled");
        Ok(true)
    }

    /// Drops all in-flight gestures, e.g. after the rows were replaced.
    pub fn reset(&mut self) {
        self.active.clear();
    }

    fn apply_pointer(
        &mut self,
        store: &mut ViewStateStore,
        label: &ClassLabel,
        pointer_x: f64,
    ) -> ViewResult<f64> {
        let domain_max = self.domain_max;
        let Some(drag) = self.active.get_mut(label) else {
            return Err(ViewError::InvalidData(format!(
                "no active weight drag for label `{label}`"
            )));
        };
        let entry = store
            .weights_mut(self.channel)?
            .iter_mut()
            .find(|entry| entry.label == *label)
            .ok_or_else(|| ViewError::UnknownLabel(label.to_string()))?;

        if !pointer_x.is_finite() {
            return Ok(entry.val);
        }
        drag.state.track(PixelPoint::new(pointer_x, 0.0));
        entry.val = clamped_value(drag.scale, pointer_x, domain_max);
        trace!(%label, pointer_x, value = entry.val, "weight drag update");
        Ok(entry.val)
    }
}

fn clamped_value(scale: LinearScale, pointer_x: f64, domain_max: f64) -> f64 {
    scale.invert(pointer_x.max(0.0)).clamp(0.0, domain_max)
}
