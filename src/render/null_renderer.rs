use indexmap::IndexMap;

use crate::core::ViewId;
use crate::error::{ViewError, ViewResult};
use crate::render::{ElementKey, PatchCounts, PatchOp, Renderer, ScenePatch, Shape};

/// Headless renderer used by tests and replay tooling.
///
/// It validates every patch and keeps a retained copy of each view's
/// elements, so callers can check what a real backend would be showing.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub patches_applied: usize,
    pub last_counts: PatchCounts,
    views: IndexMap<ViewId, IndexMap<ElementKey, Shape>>,
}

impl NullRenderer {
    #[must_use]
    pub fn elements(&self, view: ViewId) -> Option<&IndexMap<ElementKey, Shape>> {
        self.views.get(&view)
    }

    #[must_use]
    pub fn element_count(&self, view: ViewId) -> usize {
        self.views.get(&view).map_or(0, IndexMap::len)
    }

    pub fn views(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views.keys().copied()
    }
}

impl Renderer for NullRenderer {
    fn apply(&mut self, patch: &ScenePatch) -> ViewResult<()> {
        let elements = self.views.entry(patch.view).or_default();
        if patch.clear {
            elements.clear();
        }
        for op in &patch.ops {
            match op {
                PatchOp::Create { key, shape } | PatchOp::Update { key, shape, .. } => {
                    shape.validate()?;
                    elements.insert(key.clone(), shape.clone());
                }
                PatchOp::Remove { key, .. } => {
                    if elements.shift_remove(key).is_none() {
                        return Err(ViewError::InvalidData(format!(
                            "view `{}` has no element {key:?} to remove",
                            patch.view
                        )));
                    }
                }
            }
        }
        if elements.is_empty() {
            self.views.shift_remove(&patch.view);
        }
        self.patches_applied += 1;
        self.last_counts = patch.counts();
        Ok(())
    }
}
