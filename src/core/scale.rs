use crate::core::types::{EmbeddedPoint, PixelArea, PixelPoint};
use crate::error::{ViewError, ViewResult};

/// Continuous linear mapping between a data domain and a pixel range.
///
/// Either end of the domain or range may be the larger one, which is how
/// vertical axes that grow upward are expressed. A zero-extent domain maps
/// every value onto `range_start`; a zero-extent range inverts every pixel
/// onto `domain_start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ViewResult<Self> {
        for (name, value) in [
            ("domain start", domain.0),
            ("domain end", domain.1),
            ("range start", range.0),
            ("range end", range.1),
        ] {
            if !value.is_finite() {
                return Err(ViewError::InvalidData(format!(
                    "scale {name} must be finite"
                )));
            }
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    /// Left-to-right axis across the plot width.
    pub fn horizontal(domain: (f64, f64), area: PixelArea) -> ViewResult<Self> {
        Self::new(domain, (0.0, area.width))
    }

    /// Vertical axis; with `goes_up` the domain start sits at the bottom edge.
    pub fn vertical(domain: (f64, f64), area: PixelArea, goes_up: bool) -> ViewResult<Self> {
        if goes_up {
            Self::new(domain, (area.height, 0.0))
        } else {
            Self::new(domain, (0.0, area.height))
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return self.range_start;
        }
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Pixel length of a domain-space distance measured from zero.
    #[must_use]
    pub fn span_from_zero(self, value: f64) -> f64 {
        self.map(value) - self.map(0.0)
    }

    /// Evenly spaced tick values including both domain ends.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.domain_start],
            _ => {
                let step = (self.domain_end - self.domain_start) / (count - 1) as f64;
                (0..count)
                    .map(|i| self.domain_start + step * i as f64)
                    .collect()
            }
        }
    }
}

/// x/y scales of the embedding plot.
///
/// Both axes share the larger of the two data spans, centered on each
/// axis's extent, so the scatterplot keeps its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingScales {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl EmbeddingScales {
    pub fn fit(points: &[EmbeddedPoint], area: PixelArea) -> ViewResult<Self> {
        let (x_domain, y_domain) = square_domains(points);
        Ok(Self {
            x: LinearScale::horizontal(x_domain, area)?,
            y: LinearScale::vertical(y_domain, area, true)?,
        })
    }

    #[must_use]
    pub fn to_pixel(self, x: f64, y: f64) -> PixelPoint {
        PixelPoint::new(self.x.map(x), self.y.map(y))
    }

    #[must_use]
    pub fn to_domain(self, pixel: PixelPoint) -> (f64, f64) {
        (self.x.invert(pixel.x), self.y.invert(pixel.y))
    }
}

fn square_domains(points: &[EmbeddedPoint]) -> ((f64, f64), (f64, f64)) {
    let finite = points
        .iter()
        .filter(|point| point.x.is_finite() && point.y.is_finite());
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for point in finite {
        bounds = Some(match bounds {
            None => (point.x, point.x, point.y, point.y),
            Some((x_min, x_max, y_min, y_max)) => (
                x_min.min(point.x),
                x_max.max(point.x),
                y_min.min(point.y),
                y_max.max(point.y),
            ),
        });
    }
    let Some((x_min, x_max, y_min, y_max)) = bounds else {
        return ((0.0, 0.0), (0.0, 0.0));
    };
    let span = (x_max - x_min).max(y_max - y_min);
    (
        ((x_max + x_min - span) * 0.5, (x_max + x_min + span) * 0.5),
        ((y_max + y_min - span) * 0.5, (y_max + y_min + span) * 0.5),
    )
}
