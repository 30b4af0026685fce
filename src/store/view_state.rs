use crate::core::{EmbeddedPoint, PixelArea, WeightEntry};

/// Data shown by one view; the variant is fixed by the view kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPayload {
    Weights(Vec<WeightEntry>),
    Points(Vec<EmbeddedPoint>),
    Values(Vec<f64>),
    Names(Vec<String>),
}

impl ViewPayload {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Weights(_) => "weights",
            Self::Points(_) => "points",
            Self::Values(_) => "values",
            Self::Names(_) => "names",
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Weights(rows) => rows.len(),
            Self::Points(points) => points.len(),
            Self::Values(values) => values.len(),
            Self::Names(names) => names.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub pixel_area: PixelArea,
    pub payload: ViewPayload,
    pub subtitle: String,
}

impl ViewState {
    #[must_use]
    pub fn new(pixel_area: PixelArea, payload: ViewPayload) -> Self {
        Self {
            pixel_area,
            payload,
            subtitle: String::new(),
        }
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }
}
