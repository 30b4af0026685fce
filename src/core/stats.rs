use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::types::{ClassLabel, EmbeddedPoint};
use crate::error::{ViewError, ViewResult};

/// Positional summary of one class in data space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStatistics {
    pub label: ClassLabel,
    pub count: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub mean_x: f64,
    pub mean_y: f64,
    pub var_x: f64,
    pub var_y: f64,
    pub cov_xy: f64,
    pub sd_x: f64,
    pub sd_y: f64,
}

impl ClassStatistics {
    fn empty(label: ClassLabel) -> Self {
        Self {
            label,
            count: 0,
            sum_x: 0.0,
            sum_y: 0.0,
            mean_x: 0.0,
            mean_y: 0.0,
            var_x: 0.0,
            var_y: 0.0,
            cov_xy: 0.0,
            sd_x: 0.0,
            sd_y: 0.0,
        }
    }
}

/// Distinct labels in first-appearance order.
#[must_use]
pub fn unique_labels(points: &[EmbeddedPoint]) -> Vec<ClassLabel> {
    points
        .iter()
        .map(|point| point.label.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Two-pass population statistics per label.
///
/// Labels without points keep zeroed statistics; points whose label is not
/// listed are ignored.
#[must_use]
pub fn class_statistics(
    points: &[EmbeddedPoint],
    labels: &[ClassLabel],
) -> IndexMap<ClassLabel, ClassStatistics> {
    let mut stats: IndexMap<ClassLabel, ClassStatistics> = labels
        .iter()
        .map(|label| (label.clone(), ClassStatistics::empty(label.clone())))
        .collect();

    for point in points {
        if let Some(entry) = stats.get_mut(&point.label) {
            entry.count += 1;
            entry.sum_x += point.x;
            entry.sum_y += point.y;
        }
    }

    for entry in stats.values_mut().filter(|entry| entry.count > 0) {
        let n = entry.count as f64;
        entry.mean_x = entry.sum_x / n;
        entry.mean_y = entry.sum_y / n;
    }

    for point in points {
        if let Some(entry) = stats.get_mut(&point.label) {
            let dx = point.x - entry.mean_x;
            let dy = point.y - entry.mean_y;
            entry.var_x += dx * dx;
            entry.var_y += dy * dy;
            entry.cov_xy += dx * dy;
        }
    }

    for entry in stats.values_mut().filter(|entry| entry.count > 0) {
        let n = entry.count as f64;
        entry.var_x /= n;
        entry.var_y /= n;
        entry.cov_xy /= n;
        entry.sd_x = entry.var_x.max(0.0).sqrt();
        entry.sd_y = entry.var_y.max(0.0).sqrt();
    }

    stats
}

/// Confidence level in percent, strictly between 0 and 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    pub fn new(percent: f64) -> ViewResult<Self> {
        if !percent.is_finite() || percent <= 0.0 || percent >= 100.0 {
            return Err(ViewError::InvalidData(
                "confidence level must be in (0, 100) percent".to_owned(),
            ));
        }
        Ok(Self(percent))
    }

    #[must_use]
    pub fn percent(self) -> f64 {
        self.0
    }

    /// Chi-square quantile with two degrees of freedom.
    #[must_use]
    pub fn chi_square(self) -> f64 {
        -2.0 * (1.0 - self.0 / 100.0).ln()
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self(50.0)
    }
}

/// Confidence ellipse of one class in data units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceArea {
    pub label: ClassLabel,
    pub mean_x: f64,
    pub mean_y: f64,
    pub conf_x: f64,
    pub conf_y: f64,
    /// `None` when the covariance is zero and the ellipse is axis-aligned.
    pub slope: Option<f64>,
}

impl ConfidenceArea {
    #[must_use]
    pub fn from_statistics(stats: &ClassStatistics, level: ConfidenceLevel) -> Self {
        let scale = level.chi_square().sqrt();
        Self {
            label: stats.label.clone(),
            mean_x: stats.mean_x,
            mean_y: stats.mean_y,
            conf_x: scale * stats.sd_x,
            conf_y: scale * stats.sd_y,
            slope: rotation_slope(stats.var_x, stats.var_y, stats.cov_xy),
        }
    }

    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        rotation_degrees(self.slope)
    }
}

#[must_use]
pub fn rotation_slope(var_x: f64, var_y: f64, cov_xy: f64) -> Option<f64> {
    if cov_xy == 0.0 {
        return None;
    }
    let slope = ((var_x - var_y).powi(2) + 4.0 * cov_xy.powi(2)).sqrt() / cov_xy;
    slope.is_finite().then_some(slope)
}

/// Display angle in `(-90, 90]` degrees; axis-aligned without a slope.
#[must_use]
pub fn rotation_degrees(slope: Option<f64>) -> f64 {
    let Some(slope) = slope else {
        return 0.0;
    };
    let angle = 90.0 - slope.atan2(1.0).to_degrees();
    if angle > 90.0 { angle - 180.0 } else { angle }
}
