use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: vehicle type → Color32
// ---------------------------------------------------------------------------

/// Maps each distinct vehicle type to a stable colour for the scatter plot
/// and its legend.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CategoryColors {
    /// Build a colour map from the dataset's sorted distinct types.
    pub fn new(vehicle_types: &[String]) -> Self {
        let palette = generate_palette(vehicle_types.len());
        let mapping: BTreeMap<String, Color32> = vehicle_types
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        CategoryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a vehicle type.
    pub fn color_for(&self, vehicle_type: &str) -> Color32 {
        self.mapping
            .get(vehicle_type)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_category_gets_default_color() {
        let colors = CategoryColors::new(&["sedan".to_string(), "suv".to_string()]);
        assert_ne!(colors.color_for("sedan"), colors.color_for("suv"));
        assert_eq!(colors.color_for("hovercraft"), Color32::GRAY);
    }
}
