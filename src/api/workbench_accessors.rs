use crate::core::WeightChannel;
use crate::error::ViewResult;
use crate::interaction::{Component, ComponentArena, EllipseController, WeightBarController};
use crate::protocol::{Channel, ProtocolAdapter};
use crate::render::Renderer;
use crate::store::ViewStateStore;

use super::{Workbench, WorkbenchConfig};

impl<R: Renderer, C: Channel> Workbench<R, C> {
    #[must_use]
    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &ViewStateStore {
        &self.store
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    #[must_use]
    pub fn adapter(&self) -> &ProtocolAdapter {
        &self.adapter
    }

    #[must_use]
    pub fn ellipses(&self) -> &EllipseController {
        &self.ellipses
    }

    #[must_use]
    pub fn components(&self) -> &ComponentArena {
        self.canvas.arena()
    }

    /// The component line currently being drawn.
    #[must_use]
    pub fn drawing_component(&self) -> Option<&Component> {
        self.canvas.drawing()
    }

    pub fn weight_controller(&self, channel: WeightChannel) -> ViewResult<&WeightBarController> {
        self.weight_bar(channel)
    }

    #[must_use]
    pub fn highlighted_feature(&self) -> Option<usize> {
        self.highlighted_feature
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
