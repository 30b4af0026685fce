use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ViewError, ViewResult};

/// Margins reserved around a view's plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::zero()
    }
}

/// Outer size of a host container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Drawable plot area of one view: container size minus margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelArea {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl PixelArea {
    #[must_use]
    pub const fn new(width: f64, height: f64, margins: Margins) -> Self {
        Self {
            width,
            height,
            margins,
        }
    }

    /// Derives the plot area from a container; negative extents collapse to zero.
    pub fn from_container(container: ContainerSize, margins: Margins) -> ViewResult<Self> {
        if !container.width.is_finite() || !container.height.is_finite() {
            return Err(ViewError::InvalidPixelArea {
                width: container.width,
                height: container.height,
            });
        }
        let width = (container.width - margins.left - margins.right).max(0.0);
        let height = (container.height - margins.top - margins.bottom).max(0.0);
        Ok(Self::new(width, height, margins))
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn ensure_valid(self) -> ViewResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ViewError::InvalidPixelArea {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Same margins, height capped at `max_height`.
    #[must_use]
    pub fn with_max_height(mut self, max_height: f64) -> Self {
        if max_height < self.height {
            self.height = max_height.max(0.0);
        }
        self
    }
}

/// Pointer or shape position in a view's plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Class identifier as sent by the optimizer.
///
/// Embedding points and per-class weights use integer ids; parameter rows
/// such as the trade-off bound use string ids (`"alpha"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Id(i64),
    Name(String),
}

impl ClassLabel {
    #[must_use]
    pub fn as_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }

    /// Key used by the label-name table (JSON object keys are strings).
    #[must_use]
    pub fn lookup_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ClassLabel {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

impl From<i32> for ClassLabel {
    fn from(value: i32) -> Self {
        Self::Id(i64::from(value))
    }
}

impl From<&str> for ClassLabel {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

/// One embedded sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedPoint {
    pub x: f64,
    pub y: f64,
    pub label: ClassLabel,
    #[serde(rename = "feat_vals", default)]
    pub feature_values: Vec<f64>,
}

impl EmbeddedPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, label: impl Into<ClassLabel>) -> Self {
        Self {
            x,
            y,
            label: label.into(),
            feature_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_feature_values(mut self, feature_values: Vec<f64>) -> Self {
        self.feature_values = feature_values;
        self
    }
}

/// One adjustable weight row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub label: ClassLabel,
    pub val: f64,
}

impl WeightEntry {
    #[must_use]
    pub fn new(label: impl Into<ClassLabel>, val: f64) -> Self {
        Self {
            label: label.into(),
            val,
        }
    }
}
