use crate::core::{ContainerSize, PixelArea};
use crate::error::ViewResult;

use super::WorkbenchConfig;

/// Plot areas of every view family for one container layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkbenchLayout {
    pub weight: PixelArea,
    pub embedding: PixelArea,
    pub component_x: PixelArea,
    /// `comp_y` and every drawn component.
    pub component: PixelArea,
    pub feature_names: PixelArea,
}

impl WorkbenchLayout {
    /// Splits the component strip into `live_components + 2` equal columns.
    ///
    /// Panels shrink to `rows * row_height` when the strip is taller than
    /// the rows need.
    pub fn resolve(
        config: &WorkbenchConfig,
        live_components: usize,
        rows: usize,
    ) -> ViewResult<Self> {
        let containers = config.containers;
        let margins = config.margins;
        let strip = containers.component_strip;
        let panel = ContainerSize::new(strip.width / (live_components + 2) as f64, strip.height);
        let max_height = rows as f64 * config.component_row_height;

        Ok(Self {
            weight: PixelArea::from_container(containers.weight_chart, margins.weights)?,
            embedding: PixelArea::from_container(containers.embedding, margins.embedding)?,
            component_x: PixelArea::from_container(panel, margins.component_x)?
                .with_max_height(max_height),
            component: PixelArea::from_container(panel, margins.components)?
                .with_max_height(max_height),
            feature_names: PixelArea::from_container(panel, margins.feature_names)?
                .with_max_height(max_height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_columns_narrow_as_components_are_added() {
        let config = WorkbenchConfig::default();
        let none = WorkbenchLayout::resolve(&config, 0, 4).expect("layout");
        let two = WorkbenchLayout::resolve(&config, 2, 4).expect("layout");
        assert!((none.component.width - (200.0 - 12.0)).abs() < 1e-9);
        assert!((two.component.width - (100.0 - 12.0)).abs() < 1e-9);
        assert!((none.component.height - 120.0).abs() < 1e-9);
        assert!((none.embedding.width - 500.0).abs() < 1e-9);
    }
}
