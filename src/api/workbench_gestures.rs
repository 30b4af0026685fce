use tracing::{debug, info};

use crate::core::{ClassLabel, ComponentKey, PixelPoint, ViewId, WeightChannel};
use crate::error::{ViewError, ViewResult};
use crate::interaction::{
    ComponentCommit, EllipseCommit, EllipseLayer, HandleEnd, WeightCommit, WeightDragMode,
};
use crate::protocol::{Channel, OutboundRequest};
use crate::render::{Renderer, TransitionPolicy};
use crate::store::{ViewPayload, ViewState};

use super::Workbench;

impl<R: Renderer, C: Channel> Workbench<R, C> {
    pub fn weight_drag_start(
        &mut self,
        channel: WeightChannel,
        label: &ClassLabel,
        mode: WeightDragMode,
        pointer_x: f64,
    ) -> ViewResult<()> {
        let bar = self
            .weight_bars
            .get_mut(&channel)
            .ok_or_else(|| ViewError::UnknownView(channel.view().to_string()))?;
        bar.start(&mut self.store, label, mode, pointer_x)?;
        self.render_view(channel.view(), TransitionPolicy::Immediate)
    }

    /// Live value update; `false` when `label` is not being dragged.
    pub fn weight_drag_move(
        &mut self,
        channel: WeightChannel,
        label: &ClassLabel,
        pointer_x: f64,
    ) -> ViewResult<bool> {
        let bar = self
            .weight_bars
            .get_mut(&channel)
            .ok_or_else(|| ViewError::UnknownView(channel.view().to_string()))?;
        if !bar.drag(&mut self.store, label, pointer_x)? {
            return Ok(false);
        }
        self.render_view(channel.view(), TransitionPolicy::Immediate)?;
        Ok(true)
    }

    /// Commits the value and sends `updateEmb` with the full parameter state.
    pub fn weight_drag_end(
        &mut self,
        channel: WeightChannel,
        label: &ClassLabel,
        pointer_x: f64,
    ) -> ViewResult<Option<WeightCommit>> {
        let bar = self
            .weight_bars
            .get_mut(&channel)
            .ok_or_else(|| ViewError::UnknownView(channel.view().to_string()))?;
        let Some(commit) = bar.end(&mut self.store, label, pointer_x)? else {
            return Ok(None);
        };
        self.render_view(channel.view(), TransitionPolicy::Immediate)?;
        let request = self.adapter.update_embedding_request(&self.store)?;
        self.adapter.send(&mut self.channel, &request)?;
        Ok(Some(commit))
    }

    pub fn weight_drag_cancel(
        &mut self,
        channel: WeightChannel,
        label: &ClassLabel,
    ) -> ViewResult<bool> {
        let bar = self
            .weight_bars
            .get_mut(&channel)
            .ok_or_else(|| ViewError::UnknownView(channel.view().to_string()))?;
        if !bar.cancel(&mut self.store, label)? {
            return Ok(false);
        }
        self.render_view(channel.view(), TransitionPolicy::Immediate)?;
        Ok(true)
    }

    /// Starts the gesture bound to `layer`; the visual fill and the inert
    /// ring start nothing and return `false`.
    pub fn ellipse_drag_start(
        &mut self,
        label: &ClassLabel,
        layer: EllipseLayer,
        pointer: PixelPoint,
    ) -> ViewResult<bool> {
        let Some(gesture) = layer.gesture() else {
            return Ok(false);
        };
        self.ensure_ellipses()?;
        self.ellipses.start(label, gesture, pointer)?;
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(true)
    }

    pub fn ellipse_drag_move(&mut self, label: &ClassLabel, pointer: PixelPoint) -> ViewResult<bool> {
        if !self.ellipses.drag(label, pointer)? {
            return Ok(false);
        }
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(true)
    }

    /// Persists the edited ellipse and sends `optimizeWeights` with every
    /// ellipse in data units.
    pub fn ellipse_drag_end(
        &mut self,
        label: &ClassLabel,
        pointer: PixelPoint,
    ) -> ViewResult<Option<EllipseCommit>> {
        let Some(commit) = self.ellipses.end(label, pointer)? else {
            return Ok(None);
        };
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        let request = self.adapter.optimize_weights_request(
            &self.store,
            commit.gesture,
            commit.label.clone(),
            self.ellipses.domain_geometry(),
        )?;
        self.adapter.send(&mut self.channel, &request)?;
        Ok(Some(commit))
    }

    pub fn ellipse_drag_cancel(&mut self, label: &ClassLabel) -> ViewResult<bool> {
        if !self.ellipses.cancel(label) {
            return Ok(false);
        }
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(true)
    }

    /// Anchors a new component line; its key is consumed even if the
    /// drawing is later cancelled.
    pub fn component_draw_start(&mut self, pointer: PixelPoint) -> ViewResult<ComponentKey> {
        self.ensure_ellipses()?;
        let key = self.canvas.start(pointer)?;
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(key)
    }

    pub fn component_draw_move(&mut self, pointer: PixelPoint) -> ViewResult<bool> {
        if !self.canvas.drag(pointer) {
            return Ok(false);
        }
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(true)
    }

    /// Projects the current axes onto the drawn direction, adds the
    /// component panel and sends `addNewComp`.
    pub fn component_draw_end(&mut self, pointer: PixelPoint) -> ViewResult<Option<ComponentCommit>> {
        self.ensure_ellipses()?;
        let scales = self
            .ellipses
            .scales()
            .ok_or_else(|| ViewError::InvalidData("embedding scales missing".to_owned()))?;
        let comp_x = self.store.values(ViewId::ComponentX)?;
        let comp_y = self.store.values(ViewId::ComponentY)?;
        let commit = match self.canvas.end(pointer, scales, comp_x, comp_y) {
            Ok(Some(commit)) => commit,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
                return Err(err);
            }
        };

        let view = ViewId::Component(commit.key);
        let area = self.store.pixel_area(ViewId::ComponentY)?;
        self.store.insert_view(
            view,
            ViewState::new(area, ViewPayload::Values(commit.vector.clone()))
                .with_subtitle(commit.key.to_string()),
        );
        self.relayout()?;
        self.render_all(TransitionPolicy::Animated)?;

        let request = OutboundRequest::AddNewComponent {
            key: commit.key,
            component: commit.vector.clone(),
        };
        self.adapter.send(&mut self.channel, &request)?;
        info!(
            key = %commit.key,
            live = self.canvas.arena().live_count(),
            "component added"
        );
        Ok(Some(commit))
    }

    pub fn component_draw_cancel(&mut self) -> ViewResult<bool> {
        if !self.canvas.cancel() {
            return Ok(false);
        }
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(true)
    }

    pub fn component_handle_start(
        &mut self,
        key: ComponentKey,
        end: HandleEnd,
        pointer: PixelPoint,
    ) -> ViewResult<()> {
        self.canvas.handle_start(key, end, pointer)?;
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)
    }

    pub fn component_handle_move(&mut self, pointer: PixelPoint) -> ViewResult<bool> {
        if !self.canvas.handle_drag(pointer) {
            return Ok(false);
        }
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(true)
    }

    pub fn component_handle_end(&mut self, pointer: PixelPoint) -> ViewResult<bool> {
        if !self.canvas.handle_end(pointer) {
            return Ok(false);
        }
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(true)
    }

    pub fn component_handle_cancel(&mut self) -> ViewResult<bool> {
        if !self.canvas.handle_cancel() {
            return Ok(false);
        }
        self.render_view(ViewId::Embedding, TransitionPolicy::Immediate)?;
        Ok(true)
    }

    /// Removes a drawn component and its panel; the strip is re-split.
    ///
    /// Removing an already removed component is a no-op returning `false`.
    pub fn remove_component(&mut self, key: ComponentKey) -> ViewResult<bool> {
        if !self.canvas.remove(key)? {
            return Ok(false);
        }
        self.discard_component_view(key)?;
        self.relayout()?;
        self.render_all(TransitionPolicy::Animated)?;
        Ok(true)
    }

    /// Resizes embedding points by one feature's values, or restores the
    /// uniform radius with `None`.
    pub fn highlight_feature(&mut self, feature: Option<usize>) -> ViewResult<()> {
        if let Some(index) = feature {
            let count = self.store.feature_names()?.len();
            if index >= count {
                return Err(ViewError::InvalidData(format!(
                    "feature index {index} out of range for {count} features"
                )));
            }
        }
        if self.highlighted_feature == feature {
            return Ok(());
        }
        self.highlighted_feature = feature;
        debug!(?feature, "feature highlight");
        self.render_view(ViewId::Embedding, TransitionPolicy::Animated)?;
        self.render_view(ViewId::ComponentFeatureNames, TransitionPolicy::Animated)
    }

    /// Sends `saveResult`; the backend answers with the updated list.
    pub fn request_save(&mut self, name: &str) -> ViewResult<()> {
        let name = checked_name(name)?;
        self.adapter
            .send(&mut self.channel, &OutboundRequest::SaveResult { name })
    }

    /// Sends `loadResult`; the backend answers with a full reload.
    pub fn request_load(&mut self, name: &str) -> ViewResult<()> {
        let name = checked_name(name)?;
        if self.store.data_names().iter().any(|known| *known == name) {
            self.store.select_data_name(&name)?;
        }
        self.adapter
            .send(&mut self.channel, &OutboundRequest::LoadResult { name })
    }

    fn ensure_ellipses(&mut self) -> ViewResult<()> {
        let area = self.store.pixel_area(ViewId::Embedding)?;
        let points = self.store.points()?;
        self.ellipses.ensure(points, area)
    }
}

fn checked_name(name: &str) -> ViewResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ViewError::InvalidData(
            "dataset name must not be empty".to_owned(),
        ));
    }
    Ok(name.to_owned())
}
