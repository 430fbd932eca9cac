use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Fill for grade bars.
pub const GRADE_COLOR: Color32 = Color32::from_rgb(255, 127, 80);
/// Fill for histogram bins.
pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(135, 206, 235);
/// Stroke for the density curve drawn over a histogram.
pub const DENSITY_COLOR: Color32 = Color32::from_rgb(30, 100, 170);

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
            // sweep green → violet, like a viridis-style bar chart
            let hue = 120.0 + (i as f32 / n as f32) * 180.0;
            let hsl = Hsl::new(hue, 0.55, 0.45);
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
// Color mapping: bar label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (subject names) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map over the given labels, in order.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.as_ref().to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
