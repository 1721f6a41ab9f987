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
// Color mapping: series name → Color32
// ---------------------------------------------------------------------------

/// Maps series names to distinct colours, shared by the viewer and the PNG
/// renderer so both draw a series the same way.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given series names, in order.
    pub fn new(names: &[String]) -> Self {
        let palette = generate_palette(names.len());
        let mapping: BTreeMap<String, Color32> = names
            .iter()
            .zip(palette.into_iter())
            .map(|(n, c)| (n.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a series name.
    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping
            .get(name)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// The same colour as an rgb triple, for the plotters backend.
    pub fn rgb8(&self, name: &str) -> (u8, u8, u8) {
        let c = self.color_for(name);
        (c.r(), c.g(), c.b())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_produces_distinct_colors() {
        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_names_fall_back_to_gray() {
        let map = ColorMap::new(&["a".to_string()]);
        assert_ne!(map.color_for("a"), Color32::GRAY);
        assert_eq!(map.color_for("missing"), Color32::GRAY);
    }
}
