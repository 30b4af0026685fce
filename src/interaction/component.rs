use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{ComponentKey, EmbeddingScales, PixelPoint};
use crate::error::{ViewError, ViewResult};

use super::{DragState, GestureState};

/// Which end of a drawn component a handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleEnd {
    Start,
    End,
}

/// A user-drawn projection axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub key: ComponentKey,
    /// One projected loading per feature; empty until committed.
    pub vector: Vec<f64>,
    pub removed: bool,
    pub committed: bool,
    pub start: PixelPoint,
    pub end: PixelPoint,
}

impl Component {
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.committed && !self.removed
    }

    #[must_use]
    pub fn handle(&self, end: HandleEnd) -> PixelPoint {
        match end {
            HandleEnd::Start => self.start,
            HandleEnd::End => self.end,
        }
    }

    fn handle_mut(&mut self, end: HandleEnd) -> &mut PixelPoint {
        match end {
            HandleEnd::Start => &mut self.start,
            HandleEnd::End => &mut self.end,
        }
    }
}

/// Append-only component slots addressed by 1-based key.
///
/// Slots are never compacted: removal only flags the slot, so a key keeps
/// naming the same component for the whole session.
#[derive(Debug, Clone, Default)]
pub struct ComponentArena {
    slots: Vec<Component>,
}

impl ComponentArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, start: PixelPoint) -> ViewResult<ComponentKey> {
        let key = self.next_key()?;
        self.slots.push(Component {
            key,
            vector: Vec::new(),
            removed: false,
            committed: false,
            start,
            end: start,
        });
        Ok(key)
    }

    /// Key the next allocation will receive.
    pub fn next_key(&self) -> ViewResult<ComponentKey> {
        u32::try_from(self.slots.len() + 1)
            .map(ComponentKey)
            .map_err(|_| ViewError::InvalidData("component key space exhausted".to_owned()))
    }

    #[must_use]
    pub fn get(&self, key: ComponentKey) -> Option<&Component> {
        let index = usize::try_from(key.get()).ok()?.checked_sub(1)?;
        self.slots.get(index)
    }

    #[must_use]
    pub fn get_mut(&mut self, key: ComponentKey) -> Option<&mut Component> {
        let index = usize::try_from(key.get()).ok()?.checked_sub(1)?;
        self.slots.get_mut(index)
    }

    /// Flags the slot removed; returns `false` if it already was.
    pub fn remove(&mut self, key: ComponentKey) -> ViewResult<bool> {
        let component = self
            .get_mut(key)
            .ok_or_else(|| ViewError::UnknownView(format!("component {key}")))?;
        if component.removed {
            return Ok(false);
        }
        component.removed = true;
        Ok(true)
    }

    /// Committed, not removed, in key order.
    pub fn live(&self) -> impl Iterator<Item = &Component> {
        self.slots.iter().filter(|component| component.is_live())
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Every slot ever allocated, removed ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.slots.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Flags every slot removed without freeing keys.
    pub fn retire_all(&mut self) -> usize {
        let mut retired = 0;
        for component in self.slots.iter_mut().filter(|component| !component.removed) {
            component.removed = true;
            retired += 1;
        }
        retired
    }
}

/// Signed projection of every point's `(comp_x, comp_y)` onto `end - start`.
///
/// A zero-length direction projects everything to zero.
pub fn project_onto_direction(
    start: (f64, f64),
    end: (f64, f64),
    comp_x: &[f64],
    comp_y: &[f64],
) -> ViewResult<Vec<f64>> {
    if comp_x.len() != comp_y.len() {
        return Err(ViewError::InvalidData(format!(
            "component axes differ in length: x={}, y={}",
            comp_x.len(),
            comp_y.len()
        )));
    }
    let vec_x = end.0 - start.0;
    let vec_y = end.1 - start.1;
    let magnitude = vec_x.hypot(vec_y);
    if magnitude == 0.0 || !magnitude.is_finite() {
        return Ok(vec![0.0; comp_x.len()]);
    }
    Ok(comp_x
        .iter()
        .zip(comp_y)
        .map(|(x, y)| (vec_x * x + vec_y * y) / magnitude)
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCommit {
    pub key: ComponentKey,
    pub vector: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
struct ActiveHandleDrag {
    key: ComponentKey,
    end: HandleEnd,
    baseline: PixelPoint,
}

/// Drawing canvas over the embedding: new components and their handles.
#[derive(Debug, Clone, Default)]
pub struct ComponentCanvasController {
    arena: ComponentArena,
    drawing: Option<ComponentKey>,
    stroke: DragState,
    handle: Option<ActiveHandleDrag>,
}

impl ComponentCanvasController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn arena(&self) -> &ComponentArena {
        &self.arena
    }

    /// The component being drawn, if any.
    #[must_use]
    pub fn drawing(&self) -> Option<&Component> {
        self.arena.get(self.drawing?)
    }

    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.stroke.state()
    }

    /// Allocates the next key and anchors its line at `pointer`.
    pub fn start(&mut self, pointer: PixelPoint) -> ViewResult<ComponentKey> {
        if self.drawing.is_some() {
            self.cancel();
        }
        let key = self.arena.allocate(pointer)?;
        self.drawing = Some(key);
        self.stroke.begin(pointer);
        debug!(%key, x = pointer.x, y = pointer.y, "component draw start");
        Ok(key)
    }

    /// Stretches the line to `pointer`; returns `false` when not drawing.
    pub fn drag(&mut self, pointer: PixelPoint) -> bool {
        let Some(component) = self.drawing.and_then(|key| self.arena.get_mut(key)) else {
            return false;
        };
        if pointer.is_finite() {
            component.end = pointer;
            self.stroke.track(pointer);
            trace!(key = %component.key, x = pointer.x, y = pointer.y, "component draw update");
        }
        true
    }

    /// Fixes the end point and projects the stored axes onto the drawn direction.
    ///
    /// A length mismatch between `comp_x` and `comp_y` retires the slot and
    /// reports `InvalidData`.
    pub fn end(
        &mut self,
        pointer: PixelPoint,
        scales: EmbeddingScales,
        comp_x: &[f64],
        comp_y: &[f64],
    ) -> ViewResult<Option<ComponentCommit>> {
        let Some(key) = self.drawing.take() else {
            return Ok(None);
        };
        self.stroke.clear();
        let component = self
            .arena
            .get_mut(key)
            .ok_or_else(|| ViewError::UnknownView(format!("component {key}")))?;
        if pointer.is_finite() {
            component.end = pointer;
        }
        let start = scales.to_domain(component.start);
        let end = scales.to_domain(component.end);
        let vector = match project_onto_direction(start, end, comp_x, comp_y) {
            Ok(vector) => vector,
            Err(err) => {
                component.removed = true;
                warn!(%key, error = %err, "component discarded");
                return Err(err);
            }
        };
        component.vector = vector.clone();
        component.committed = true;
        debug!(%key, values = vector.len(), "component committed");
        Ok(Some(ComponentCommit { key, vector }))
    }

    /// Abandons the line being drawn; its key stays consumed.
    pub fn cancel(&mut self) -> bool {
        let Some(key) = self.drawing.take() else {
            return false;
        };
        self.stroke.clear();
        if let Some(component) = self.arena.get_mut(key) {
            component.removed = true;
        }
        debug!(%key, "component draw cancelled");
        true
    }

    pub fn handle_start(
        &mut self,
        key: ComponentKey,
        end: HandleEnd,
        pointer: PixelPoint,
    ) -> ViewResult<()> {
        let component = self
            .arena
            .get_mut(key)
            .filter(|component| component.is_live())
            .ok_or_else(|| ViewError::UnknownView(format!("component {key}")))?;
        let baseline = component.handle(end);
        if pointer.is_finite() {
            *component.handle_mut(end) = pointer;
        }
        self.handle = Some(ActiveHandleDrag { key, end, baseline });
        debug!(%key, ?end, "component handle drag start");
        Ok(())
    }

    pub fn handle_drag(&mut self, pointer: PixelPoint) -> bool {
        let Some(active) = self.handle else {
            return false;
        };
        if !pointer.is_finite() {
            return true;
        }
        if let Some(component) = self.arena.get_mut(active.key) {
            *component.handle_mut(active.end) = pointer;
        }
        true
    }

    /// Handles only move the drawn line; the projected values are kept.
    pub fn handle_end(&mut self, pointer: PixelPoint) -> bool {
        if !self.handle_drag(pointer) {
            return false;
        }
        if let Some(active) = self.handle.take() {
            debug!(key = %active.key, end = ?active.end, "component handle drag end");
        }
        true
    }

    pub fn handle_cancel(&mut self) -> bool {
        let Some(active) = self.handle.take() else {
            return false;
        };
        if let Some(component) = self.arena.get_mut(active.key) {
            *component.handle_mut(active.end) = active.baseline;
        }
        true
    }

    /// Soft-deletes a component; its key is never handed out again.
    pub fn remove(&mut self, key: ComponentKey) -> ViewResult<bool> {
        if self.handle.is_some_and(|active| active.key == key) {
            self.handle = None;
        }
        let removed = self.arena.remove(key)?;
        if removed {
            debug!(%key, live = self.arena.live_count(), "component removed");
        }
        Ok(removed)
    }

    /// Retires every component, e.g. when a new dataset is loaded.
    pub fn retire_all(&mut self) -> usize {
        self.drawing = None;
        self.handle = None;
        self.stroke.clear();
        self.arena.retire_all()
    }
}
