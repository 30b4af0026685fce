use serde::{Deserialize, Serialize};

use crate::core::{ConfidenceLevel, ContainerSize, Margins};
use crate::error::{ViewError, ViewResult};
use crate::render::DEFAULT_TRANSITION_MS;
use crate::store::LabelNamePolicy;

/// Margins of every view family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewMargins {
    #[serde(default = "default_weight_margins")]
    pub weights: Margins,
    #[serde(default = "default_embedding_margins")]
    pub embedding: Margins,
    #[serde(default = "default_component_margins")]
    pub components: Margins,
    /// Right margin of the x-axis component panel differs from the others.
    #[serde(default = "default_component_x_margins")]
    pub component_x: Margins,
    #[serde(default = "default_feature_name_margins")]
    pub feature_names: Margins,
}

impl Default for ViewMargins {
    fn default() -> Self {
        Self {
            weights: default_weight_margins(),
            embedding: default_embedding_margins(),
            components: default_component_margins(),
            component_x: default_component_x_margins(),
            feature_names: default_feature_name_margins(),
        }
    }
}

/// Outer sizes of the host containers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerLayout {
    /// Size of each of the four weight charts.
    pub weight_chart: ContainerSize,
    pub embedding: ContainerSize,
    /// The whole component strip; panels split its width.
    pub component_strip: ContainerSize,
}

impl Default for ContainerLayout {
    fn default() -> Self {
        Self {
            weight_chart: ContainerSize::new(300.0, 160.0),
            embedding: ContainerSize::new(600.0, 600.0),
            component_strip: ContainerSize::new(400.0, 600.0),
        }
    }
}

/// Workbench bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchConfig {
    #[serde(default)]
    pub containers: ContainerLayout,
    #[serde(default)]
    pub margins: ViewMargins,
    #[serde(default = "default_confidence_percent")]
    pub confidence_percent: f64,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u32,
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
    #[serde(default = "default_max_bar_height")]
    pub max_bar_height: f64,
    #[serde(default = "default_handle_width")]
    pub handle_width: f64,
    #[serde(default = "default_component_row_height")]
    pub component_row_height: f64,
    #[serde(default = "default_min_point_radius")]
    pub min_point_radius: f64,
    #[serde(default = "default_max_point_radius")]
    pub max_point_radius: f64,
    /// Cap of the per-class weight channels.
    #[serde(default = "default_weight_max")]
    pub weight_max: f64,
    /// Boundary cap until the backend sends `max_upper_bound`.
    #[serde(default = "default_boundary_max")]
    pub boundary_max: f64,
    #[serde(default)]
    pub label_name_policy: LabelNamePolicy,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            containers: ContainerLayout::default(),
            margins: ViewMargins::default(),
            confidence_percent: default_confidence_percent(),
            transition_ms: default_transition_ms(),
            band_padding: default_band_padding(),
            max_bar_height: default_max_bar_height(),
            handle_width: default_handle_width(),
            component_row_height: default_component_row_height(),
            min_point_radius: default_min_point_radius(),
            max_point_radius: default_max_point_radius(),
            weight_max: default_weight_max(),
            boundary_max: default_boundary_max(),
            label_name_policy: LabelNamePolicy::default(),
        }
    }
}

impl WorkbenchConfig {
    #[must_use]
    pub fn with_containers(mut self, containers: ContainerLayout) -> Self {
        self.containers = containers;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: ViewMargins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_confidence_percent(mut self, percent: f64) -> Self {
        self.confidence_percent = percent;
        self
    }

    #[must_use]
    pub fn with_transition_ms(mut self, transition_ms: u32) -> Self {
        self.transition_ms = transition_ms;
        self
    }

    #[must_use]
    pub fn with_point_radius_range(mut self, min: f64, max: f64) -> Self {
        self.min_point_radius = min;
        self.max_point_radius = max;
        self
    }

    #[must_use]
    pub fn with_boundary_max(mut self, boundary_max: f64) -> Self {
        self.boundary_max = boundary_max;
        self
    }

    #[must_use]
    pub fn with_label_name_policy(mut self, policy: LabelNamePolicy) -> Self {
        self.label_name_policy = policy;
        self
    }

    pub fn confidence_level(self) -> ViewResult<ConfidenceLevel> {
        ConfidenceLevel::new(self.confidence_percent)
    }

    pub fn validate(self) -> ViewResult<Self> {
        self.confidence_level()?;
        ensure_positive("band padding", self.band_padding, true)?;
        if self.band_padding >= 1.0 {
            return Err(ViewError::InvalidData(
                "band padding must be < 1".to_owned(),
            ));
        }
        ensure_positive("max bar height", self.max_bar_height, false)?;
        ensure_positive("handle width", self.handle_width, false)?;
        ensure_positive("component row height", self.component_row_height, false)?;
        ensure_positive("min point radius", self.min_point_radius, true)?;
        ensure_positive("max point radius", self.max_point_radius, false)?;
        if self.min_point_radius > self.max_point_radius {
            return Err(ViewError::InvalidData(
                "min point radius must not exceed max point radius".to_owned(),
            ));
        }
        ensure_positive("weight max", self.weight_max, false)?;
        ensure_positive("boundary max", self.boundary_max, false)?;
        for (name, size) in [
            ("weight chart", self.containers.weight_chart),
            ("embedding", self.containers.embedding),
            ("component strip", self.containers.component_strip),
        ] {
            ensure_positive(name, size.width, false)?;
            ensure_positive(name, size.height, false)?;
        }
        Ok(self)
    }

    pub fn to_json_pretty(self) -> ViewResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ViewError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ViewResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ViewError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn ensure_positive(name: &str, value: f64, allow_zero: bool) -> ViewResult<()> {
    let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if ok {
        Ok(())
    } else {
        Err(ViewError::InvalidData(format!(
            "{name} must be finite and {}, got {value}",
            if allow_zero { ">= 0" } else { "> 0" }
        )))
    }
}

fn default_weight_margins() -> Margins {
    Margins::new(25.0, 30.0, 25.0, 60.0)
}

fn default_embedding_margins() -> Margins {
    Margins::new(50.0, 50.0, 50.0, 50.0)
}

fn default_component_margins() -> Margins {
    Margins::new(25.0, 2.0, 40.0, 10.0)
}

fn default_component_x_margins() -> Margins {
    Margins::new(25.0, 5.0, 40.0, 10.0)
}

fn default_feature_name_margins() -> Margins {
    Margins::new(25.0, 0.0, 40.0, 0.0)
}

fn default_confidence_percent() -> f64 {
    50.0
}

fn default_transition_ms() -> u32 {
    DEFAULT_TRANSITION_MS
}

fn default_band_padding() -> f64 {
    0.3
}

fn default_max_bar_height() -> f64 {
    20.0
}

fn default_handle_width() -> f64 {
    3.0
}

fn default_component_row_height() -> f64 {
    30.0
}

fn default_min_point_radius() -> f64 {
    2.0
}

fn default_max_point_radius() -> f64 {
    6.0
}

fn default_weight_max() -> f64 {
    1.0
}

fn default_boundary_max() -> f64 {
    10.0
}
