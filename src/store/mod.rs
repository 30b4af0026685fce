//! Session-wide view state.
//!
//! One [`ViewStateStore`] is the single source of truth for every view's
//! pixel area and data. Controllers mutate rows in place; the protocol
//! adapter refills containers wholesale but keeps them allocated.

mod label_names;
mod view_state;

pub use label_names::{LabelNamePolicy, LabelNameTable};
pub use view_state::{ViewPayload, ViewState};

use indexmap::IndexMap;
use tracing::trace;

use crate::core::{ClassLabel, EmbeddedPoint, PixelArea, ViewId, WeightChannel, WeightEntry};
use crate::error::{ViewError, ViewResult};

/// Lifetime of the "Done" indicator after a save.
pub const SAVE_INDICATOR_MS: u64 = 1000;

#[derive(Debug, Clone, Default)]
pub struct ViewStateStore {
    views: IndexMap<ViewId, ViewState>,
    label_names: LabelNameTable,
    boundary_max: Option<f64>,
    data_names: Vec<String>,
    selected_data_name: Option<String>,
    save_indicator_ms: Option<u64>,
}

impl ViewStateStore {
    #[must_use]
    pub fn new(policy: LabelNamePolicy) -> Self {
        Self {
            label_names: LabelNameTable::new(policy),
            ..Self::default()
        }
    }

    pub fn insert_view(&mut self, view: ViewId, state: ViewState) -> Option<ViewState> {
        trace!(%view, kind = state.payload.kind(), "view registered");
        self.views.insert(view, state)
    }

    pub fn remove_view(&mut self, view: ViewId) -> Option<ViewState> {
        self.views.shift_remove(&view)
    }

    #[must_use]
    pub fn contains(&self, view: ViewId) -> bool {
        self.views.contains_key(&view)
    }

    pub fn view_ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views.keys().copied()
    }

    pub fn view(&self, view: ViewId) -> ViewResult<&ViewState> {
        self.views
            .get(&view)
            .ok_or_else(|| ViewError::UnknownView(view.to_string()))
    }

    pub fn view_mut(&mut self, view: ViewId) -> ViewResult<&mut ViewState> {
        self.views
            .get_mut(&view)
            .ok_or_else(|| ViewError::UnknownView(view.to_string()))
    }

    pub fn pixel_area(&self, view: ViewId) -> ViewResult<PixelArea> {
        Ok(self.view(view)?.pixel_area)
    }

    pub fn set_pixel_area(&mut self, view: ViewId, area: PixelArea) -> ViewResult<()> {
        self.view_mut(view)?.pixel_area = area;
        Ok(())
    }

    pub fn weights(&self, channel: WeightChannel) -> ViewResult<&[WeightEntry]> {
        match &self.view(channel.view())?.payload {
            ViewPayload::Weights(rows) => Ok(rows),
            other => Err(payload_mismatch(channel.view(), "weights", other)),
        }
    }

    pub fn weights_mut(&mut self, channel: WeightChannel) -> ViewResult<&mut Vec<WeightEntry>> {
        let view = channel.view();
        match &mut self.view_mut(view)?.payload {
            ViewPayload::Weights(rows) => Ok(rows),
            other => Err(payload_mismatch(view, "weights", other)),
        }
    }

    pub fn points(&self) -> ViewResult<&[EmbeddedPoint]> {
        match &self.view(ViewId::Embedding)?.payload {
            ViewPayload::Points(points) => Ok(points),
            other => Err(payload_mismatch(ViewId::Embedding, "points", other)),
        }
    }

    pub fn values(&self, view: ViewId) -> ViewResult<&[f64]> {
        match &self.view(view)?.payload {
            ViewPayload::Values(values) => Ok(values),
            other => Err(payload_mismatch(view, "values", other)),
        }
    }

    pub fn feature_names(&self) -> ViewResult<&[String]> {
        match &self.view(ViewId::ComponentFeatureNames)?.payload {
            ViewPayload::Names(names) => Ok(names),
            other => Err(payload_mismatch(ViewId::ComponentFeatureNames, "names", other)),
        }
    }

    /// Clears and repopulates a weight channel, keeping its allocation.
    pub fn refill_weights(
        &mut self,
        channel: WeightChannel,
        rows: impl IntoIterator<Item = WeightEntry>,
    ) -> ViewResult<()> {
        let target = self.weights_mut(channel)?;
        target.clear();
        target.extend(rows);
        Ok(())
    }

    pub fn refill_points(
        &mut self,
        points: impl IntoIterator<Item = EmbeddedPoint>,
    ) -> ViewResult<()> {
        match &mut self.view_mut(ViewId::Embedding)?.payload {
            ViewPayload::Points(target) => {
                target.clear();
                target.extend(points);
                Ok(())
            }
            other => Err(payload_mismatch(ViewId::Embedding, "points", other)),
        }
    }

    pub fn refill_values(
        &mut self,
        view: ViewId,
        values: impl IntoIterator<Item = f64>,
    ) -> ViewResult<()> {
        match &mut self.view_mut(view)?.payload {
            ViewPayload::Values(target) => {
                target.clear();
                target.extend(values);
                Ok(())
            }
            other => Err(payload_mismatch(view, "values", other)),
        }
    }

    pub fn refill_feature_names(
        &mut self,
        names: impl IntoIterator<Item = String>,
    ) -> ViewResult<()> {
        match &mut self.view_mut(ViewId::ComponentFeatureNames)?.payload {
            ViewPayload::Names(target) => {
                target.clear();
                target.extend(names);
                Ok(())
            }
            other => Err(payload_mismatch(ViewId::ComponentFeatureNames, "names", other)),
        }
    }

    #[must_use]
    pub fn label_names(&self) -> &LabelNameTable {
        &self.label_names
    }

    pub fn replace_label_names(&mut self, names: IndexMap<String, String>) {
        self.label_names.replace(names);
    }

    /// Display name of `label` under the configured policy.
    pub fn label_name(&self, label: &ClassLabel) -> ViewResult<String> {
        self.label_names.resolve(label)
    }

    /// Upper bound sent by the backend for the boundary channel.
    #[must_use]
    pub fn boundary_max(&self) -> Option<f64> {
        self.boundary_max
    }

    pub fn set_boundary_max(&mut self, max: f64) -> ViewResult<()> {
        if !max.is_finite() || max <= 0.0 {
            return Err(ViewError::InvalidData(format!(
                "boundary upper bound must be finite and > 0, got {max}"
            )));
        }
        self.boundary_max = Some(max);
        Ok(())
    }

    #[must_use]
    pub fn data_names(&self) -> &[String] {
        &self.data_names
    }

    #[must_use]
    pub fn selected_data_name(&self) -> Option<&str> {
        self.selected_data_name.as_deref()
    }

    /// Replaces the saved-dataset list and selects its first entry.
    pub fn set_data_names(&mut self, names: Vec<String>) {
        self.selected_data_name = names.first().cloned();
        self.data_names = names;
    }

    pub fn select_data_name(&mut self, name: &str) -> ViewResult<()> {
        if !self.data_names.iter().any(|known| known == name) {
            return Err(ViewError::InvalidData(format!("unknown dataset `{name}`")));
        }
        self.selected_data_name = Some(name.to_owned());
        Ok(())
    }

    pub fn show_save_indicator(&mut self) {
        self.save_indicator_ms = Some(SAVE_INDICATOR_MS);
    }

    #[must_use]
    pub fn save_indicator_visible(&self) -> bool {
        self.save_indicator_ms.is_some()
    }

    /// Advances the indicator clock; returns `true` when it just expired.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        let Some(remaining) = self.save_indicator_ms else {
            return false;
        };
        if elapsed_ms >= remaining {
            self.save_indicator_ms = None;
            true
        } else {
            self.save_indicator_ms = Some(remaining - elapsed_ms);
            false
        }
    }
}

fn payload_mismatch(view: ViewId, expected: &str, found: &ViewPayload) -> ViewError {
    ViewError::InvalidData(format!(
        "view {view} holds {} but {expected} were requested",
        found.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Margins;

    fn area() -> PixelArea {
        PixelArea::new(100.0, 50.0, Margins::zero())
    }

    #[test]
    fn refill_keeps_container_and_replaces_rows() {
        let mut store = ViewStateStore::default();
        store.insert_view(
            ViewId::TargetWeight,
            ViewState::new(area(), ViewPayload::Weights(vec![WeightEntry::new(0, 0.1)])),
        );
        let before = store.weights(WeightChannel::Target).expect("rows").as_ptr();
        store
            .refill_weights(WeightChannel::Target, [WeightEntry::new(0, 0.9)])
            .expect("refill");
        let rows = store.weights(WeightChannel::Target).expect("rows");
        assert_eq!(rows, &[WeightEntry::new(0, 0.9)]);
        assert_eq!(rows.as_ptr(), before);
    }

    #[test]
    fn payload_kind_is_checked() {
        let mut store = ViewStateStore::default();
        store.insert_view(
            ViewId::Embedding,
            ViewState::new(area(), ViewPayload::Points(Vec::new())),
        );
        assert!(store.values(ViewId::Embedding).is_err());
        assert!(matches!(
            store.values(ViewId::ComponentX),
            Err(ViewError::UnknownView(_))
        ));
    }

    #[test]
    fn save_indicator_expires_after_its_lifetime() {
        let mut store = ViewStateStore::default();
        store.show_save_indicator();
        assert!(!store.tick(400));
        assert!(store.save_indicator_visible());
        assert!(store.tick(600));
        assert!(!store.save_indicator_visible());
        assert!(!store.tick(1));
    }
}
