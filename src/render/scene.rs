use indexmap::IndexMap;

use crate::core::{ClassLabel, ComponentKey, PixelArea, ViewId};
use crate::error::ViewResult;
use crate::interaction::{EllipseLayer, HandleEnd};

use super::Shape;

/// Stable identity of a visual element inside one view.
///
/// Data-bound elements are keyed the way their rows are joined: points and
/// bars by position, ellipses by label, drawn components by key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Subtitle,
    SubtitleBadge,
    Background,
    AxisLine,
    AxisTick(usize),
    RowLabel(usize),
    Bar(usize),
    BarHitArea(usize),
    BarHandle(usize),
    Point(usize),
    Ellipse {
        layer: EllipseLayer,
        label: ClassLabel,
    },
    LegendSwatch(usize),
    LegendText(usize),
    DrawCanvas,
    ComponentLine(ComponentKey),
    ComponentBadge(ComponentKey),
    ComponentBadgeText(ComponentKey),
    ComponentHandle {
        key: ComponentKey,
        end: HandleEnd,
    },
}

/// Target state of one view: every element it should show, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub view: ViewId,
    pub area: PixelArea,
    elements: IndexMap<ElementKey, Shape>,
}

impl Scene {
    #[must_use]
    pub fn new(view: ViewId, area: PixelArea) -> Self {
        Self {
            view,
            area,
            elements: IndexMap::new(),
        }
    }

    /// Adds or replaces the element under `key`.
    pub fn push(&mut self, key: ElementKey, shape: Shape) {
        self.elements.insert(key, shape);
    }

    #[must_use]
    pub fn get(&self, key: &ElementKey) -> Option<&Shape> {
        self.elements.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementKey, &Shape)> {
        self.elements.iter()
    }

    pub fn validate(&self) -> ViewResult<()> {
        for shape in self.elements.values() {
            shape.validate()?;
        }
        Ok(())
    }

    pub(crate) fn into_elements(self) -> IndexMap<ElementKey, Shape> {
        self.elements
    }
}
