pub mod band_scale;
pub mod scale;
pub mod stats;
pub mod types;
pub mod view_id;

pub use band_scale::BandScale;
pub use scale::{EmbeddingScales, LinearScale};
pub use stats::{
    ClassStatistics, ConfidenceArea, ConfidenceLevel, class_statistics, rotation_degrees,
    rotation_slope, unique_labels,
};
pub use types::{
    ClassLabel, ContainerSize, EmbeddedPoint, Margins, PixelArea, PixelPoint, WeightEntry,
};
pub use view_id::{ComponentKey, ViewId, WeightChannel};
