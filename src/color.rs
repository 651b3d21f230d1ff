use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::Value;

// ---------------------------------------------------------------------------
// Sequential palette generator
// ---------------------------------------------------------------------------

/// `n` colours running from dark purple through teal to yellow, the way the
/// viridis map does, by sweeping hue down while raising lightness.
pub fn sequential_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
            let hue = 280.0 - t * 225.0;
            let lightness = 0.30 + t * 0.30;
            let hsl = Hsl::new(hue, 0.70, lightness);
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
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of one column (e.g. ratings) to palette colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from categories given in ascending order.
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a Value>) -> Self {
        let categories: Vec<&Value> = categories.into_iter().collect();
        let palette = sequential_palette(categories.len());
        let mapping = categories
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_gets_lighter() {
        let colors = sequential_palette(5);
        assert_eq!(colors.len(), 5);
        let luma = |c: &Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(luma(&colors[0]) < luma(&colors[4]));
        assert!(sequential_palette(0).is_empty());
    }

    #[test]
    fn unknown_category_is_gray() {
        let ratings = [Value::Integer(4), Value::Integer(5)];
        let cm = ColorMap::new(&ratings);
        assert_ne!(cm.color_for(&Value::Integer(4)), cm.color_for(&Value::Integer(5)));
        assert_eq!(cm.color_for(&Value::Integer(1)), Color32::GRAY);
    }
}
