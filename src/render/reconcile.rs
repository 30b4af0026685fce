use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{PixelArea, ViewId};

use super::{ElementKey, Scene, Shape};

pub const DEFAULT_TRANSITION_MS: u32 = 750;

/// How a reconciliation pass presents its changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPolicy {
    /// Clear the view and recreate every element without animation.
    Initial,
    /// Diff against the previous pass and animate updates and exits.
    Animated,
    /// Diff against the previous pass and apply at once (pointer tracking).
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    Create {
        key: ElementKey,
        shape: Shape,
    },
    Update {
        key: ElementKey,
        shape: Shape,
        transition: Option<Transition>,
    },
    /// The element must be gone once `transition` (if any) finishes.
    Remove {
        key: ElementKey,
        transition: Option<Transition>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchCounts {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Ordered edit script that brings a rendered view to a new scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePatch {
    pub view: ViewId,
    pub area: PixelArea,
    /// Drop everything the view currently shows before applying `ops`.
    pub clear: bool,
    pub ops: Vec<PatchOp>,
}

impl ScenePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.clear && self.ops.is_empty()
    }

    #[must_use]
    pub fn counts(&self) -> PatchCounts {
        let mut counts = PatchCounts::default();
        for op in &self.ops {
            match op {
                PatchOp::Create { .. } => counts.entered += 1,
                PatchOp::Update { .. } => counts.updated += 1,
                PatchOp::Remove { .. } => counts.exited += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone)]
struct RenderedView {
    area: PixelArea,
    elements: IndexMap<ElementKey, Shape>,
}

/// Remembers what each view last showed and classifies the next scene
/// into entering, updating and exiting elements.
#[derive(Debug, Clone)]
pub struct Reconciler {
    transition_ms: u32,
    rendered: IndexMap<ViewId, RenderedView>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION_MS)
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(transition_ms: u32) -> Self {
        Self {
            transition_ms,
            rendered: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn rendered(&self, view: ViewId) -> Option<&IndexMap<ElementKey, Shape>> {
        self.rendered.get(&view).map(|rendered| &rendered.elements)
    }

    /// Plot area of the last pass over `view`.
    #[must_use]
    pub fn rendered_area(&self, view: ViewId) -> Option<PixelArea> {
        self.rendered.get(&view).map(|rendered| rendered.area)
    }

    pub fn reconcile(&mut self, scene: Scene, policy: TransitionPolicy) -> ScenePatch {
        let view = scene.view;
        let area = scene.area;
        let next = scene.into_elements();
        let previous = self
            .rendered
            .shift_remove(&view)
            .map(|rendered| rendered.elements);

        let patch = match (policy, previous) {
            (TransitionPolicy::Initial, _) | (_, None) => ScenePatch {
                view,
                area,
                clear: true,
                ops: next
                    .iter()
                    .map(|(key, shape)| PatchOp::Create {
                        key: key.clone(),
                        shape: shape.clone(),
                    })
                    .collect(),
            },
            (policy, Some(previous)) => {
                let transition = (policy == TransitionPolicy::Animated).then_some(Transition {
                    duration_ms: self.transition_ms,
                });
                let mut ops = Vec::new();
                for (key, shape) in &next {
                    match previous.get(key) {
                        None => ops.push(PatchOp::Create {
                            key: key.clone(),
                            shape: shape.clone(),
                        }),
                        Some(old) if old != shape => ops.push(PatchOp::Update {
                            key: key.clone(),
                            shape: shape.clone(),
                            transition,
                        }),
                        Some(_) => {}
                    }
                }
                for key in previous.keys().filter(|key| !next.contains_key(*key)) {
                    ops.push(PatchOp::Remove {
                        key: key.clone(),
                        transition,
                    });
                }
                ScenePatch {
                    view,
                    area,
                    clear: false,
                    ops,
                }
            }
        };

        let counts = patch.counts();
        trace!(
            view = %view,
            clear = patch.clear,
            entered = counts.entered,
            updated = counts.updated,
            exited = counts.exited,
            "reconciled view"
        );
        self.rendered.insert(
            view,
            RenderedView {
                area,
                elements: next,
            },
        );
        patch
    }

    /// Tears down a view that no longer exists; `None` if it was never drawn.
    ///
    /// The patch carries the area of the last pass.
    pub fn retire(&mut self, view: ViewId) -> Option<ScenePatch> {
        let previous = self.rendered.shift_remove(&view)?;
        let transition = Some(Transition {
            duration_ms: self.transition_ms,
        });
        Some(ScenePatch {
            view,
            area: previous.area,
            clear: false,
            ops: previous
                .elements
                .into_keys()
                .map(|key| PatchOp::Remove { key, transition })
                .collect(),
        })
    }

    pub fn reset(&mut self) {
        self.rendered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Margins;
    use crate::render::{CirclePrimitive, Color};

    fn scene_with(radii: &[f64]) -> Scene {
        let mut scene = Scene::new(ViewId::Embedding, PixelArea::new(100.0, 100.0, Margins::zero()));
        for (i, radius) in radii.iter().enumerate() {
            scene.push(
                ElementKey::Point(i),
                Shape::Circle(CirclePrimitive::new(10.0, 10.0, *radius, Color::rgb(0.0, 0.0, 0.0))),
            );
        }
        scene
    }

    #[test]
    fn classifies_enter_update_exit() {
        let mut reconciler = Reconciler::default();
        let first = reconciler.reconcile(scene_with(&[1.0, 2.0, 3.0]), TransitionPolicy::Initial);
        assert!(first.clear);
        assert_eq!(first.counts().entered, 3);

        let second = reconciler.reconcile(scene_with(&[1.0, 5.0]), TransitionPolicy::Animated);
        assert_eq!(
            second.counts(),
            PatchCounts {
                entered: 0,
                updated: 1,
                exited: 1,
            }
        );
        assert!(second.ops.iter().all(|op| match op {
            PatchOp::Update { transition, .. } | PatchOp::Remove { transition, .. } => {
                *transition == Some(Transition { duration_ms: 750 })
            }
            PatchOp::Create { .. } => true,
        }));
        assert_eq!(reconciler.rendered(ViewId::Embedding).map(IndexMap::len), Some(2));
    }

    #[test]
    fn immediate_policy_skips_transitions() {
        let mut reconciler = Reconciler::default();
        reconciler.reconcile(scene_with(&[1.0]), TransitionPolicy::Initial);
        let patch = reconciler.reconcile(scene_with(&[4.0]), TransitionPolicy::Immediate);
        assert!(matches!(
            patch.ops.as_slice(),
            [PatchOp::Update {
                transition: None,
                ..
            }]
        ));
    }
}
