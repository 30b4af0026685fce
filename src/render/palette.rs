use crate::core::ClassLabel;

use super::Color;

const CATEGORY_COLORS: [Color; 10] = [
    Color::rgb(0.306, 0.475, 0.655),
    Color::rgb(0.949, 0.557, 0.169),
    Color::rgb(0.882, 0.341, 0.349),
    Color::rgb(0.463, 0.718, 0.698),
    Color::rgb(0.349, 0.631, 0.310),
    Color::rgb(0.929, 0.788, 0.282),
    Color::rgb(0.690, 0.478, 0.631),
    Color::rgb(1.000, 0.616, 0.655),
    Color::rgb(0.612, 0.459, 0.373),
    Color::rgb(0.729, 0.690, 0.675),
];

/// Fill for rows whose label is not a class id.
pub const NEUTRAL: Color = Color::rgb(0.2, 0.2, 0.2);
pub const OUTLINE: Color = Color::rgb(0.267, 0.267, 0.267);
pub const GUIDE: Color = Color::rgb(0.533, 0.533, 0.533);
pub const COMPONENT_BAR: Color = Color::rgb(0.4, 0.4, 0.4);
pub const PANEL_BACKGROUND: Color = Color::rgb(0.953, 0.953, 0.953);
pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
pub const TRANSPARENT: Color = Color::rgba(1.0, 1.0, 1.0, 0.0);

/// Category color for a label; non-class labels get the neutral fill.
#[must_use]
pub fn label_color(label: &ClassLabel) -> Color {
    match label.as_id() {
        Some(id) if id >= 0 => CATEGORY_COLORS[(id as usize) % CATEGORY_COLORS.len()],
        _ => NEUTRAL,
    }
}
