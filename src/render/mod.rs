mod null_renderer;
pub mod palette;
mod primitives;
mod reconcile;
mod scene;

pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, EllipsePrimitive, LinePrimitive, RectPrimitive, Shape, Stroke,
    TextHAlign, TextPrimitive,
};
pub use reconcile::{
    DEFAULT_TRANSITION_MS, PatchCounts, PatchOp, Reconciler, ScenePatch, Transition,
    TransitionPolicy,
};
pub use scene::{ElementKey, Scene};

use crate::error::ViewResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive per-view edit scripts (create, animate-to, remove) so
/// drawing code stays isolated from view state and interaction logic.
pub trait Renderer {
    fn apply(&mut self, patch: &ScenePatch) -> ViewResult<()>;
}
