use crate::core::types::PixelArea;
use crate::error::{ViewError, ViewResult};

/// Discrete scale with one band per row index.
///
/// `padding` is applied both between bands and at the outer edges as a
/// fraction of the step, and the bands are centered in the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> ViewResult<Self> {
        if !(0.0..1.0).contains(&padding) {
            return Err(ViewError::InvalidData(
                "band padding must be in [0, 1)".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ViewError::InvalidData(
                "band range must be finite".to_owned(),
            ));
        }

        let (low, high) = if range.0 <= range.1 {
            (range.0, range.1)
        } else {
            (range.1, range.0)
        };
        let extent = high - low;
        let n = count as f64;
        let step = extent / (n - padding + 2.0 * padding).max(1.0);
        let start = low + (extent - step * (n - padding)) * 0.5;

        Ok(Self {
            count,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        })
    }

    /// Rows stacked top to bottom across the plot height.
    pub fn rows(count: usize, area: PixelArea, padding: f64) -> ViewResult<Self> {
        Self::new(count, (0.0, area.height), padding)
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    #[must_use]
    pub fn bandwidth(self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(self) -> f64 {
        self.step
    }

    /// Leading edge of band `index`, or `None` when out of range.
    #[must_use]
    pub fn position(self, index: usize) -> Option<f64> {
        (index < self.count).then(|| self.start + self.step * index as f64)
    }

    /// Band whose center is nearest to `pixel`, clamped to the valid rows.
    #[must_use]
    pub fn invert(self, pixel: f64) -> Option<usize> {
        if self.count == 0 || !pixel.is_finite() {
            return None;
        }
        if self.step == 0.0 {
            return Some(0);
        }
        let relative = (pixel - self.start - self.bandwidth * 0.5) / self.step;
        let index = relative.round().clamp(0.0, (self.count - 1) as f64);
        Some(index as usize)
    }

    /// Top of a centered bar of at most `max_height` inside band `index`.
    #[must_use]
    pub fn centered_bar(self, index: usize, max_height: f64) -> Option<(f64, f64)> {
        let top = self.position(index)?;
        let height = max_height.min(self.bandwidth);
        Some((top + (self.bandwidth - height) * 0.5, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_centered_with_outer_padding() {
        let scale = BandScale::new(3, (0.0, 100.0), 0.3).expect("band scale");
        let step = 100.0 / 3.3;
        assert!((scale.step() - step).abs() < 1e-9);
        assert!((scale.position(0).expect("row 0") - step * 0.3).abs() < 1e-9);
        assert!((scale.bandwidth() - step * 0.7).abs() < 1e-9);
        assert_eq!(scale.position(3), None);
    }

    #[test]
    fn empty_scale_inverts_to_none() {
        let scale = BandScale::new(0, (0.0, 100.0), 0.3).expect("band scale");
        assert_eq!(scale.invert(10.0), None);
    }
}
