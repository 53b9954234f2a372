use std::collections::{BTreeMap, BTreeSet};

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
            let hsl = Hsl::new(hue, 0.7, 0.55);
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
// Category colours: cuisine / weather name → Color32
// ---------------------------------------------------------------------------

/// Stable colour per category, assigned in sorted order.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CategoryColors {
    pub fn new(categories: &BTreeSet<String>) -> Self {
        let mapping = categories
            .iter()
            .cloned()
            .zip(generate_palette(categories.len()))
            .collect();
        CategoryColors { mapping }
    }

    /// Colour for a category; grey for names outside the original set.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping.get(category).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Rating bands for map markers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    /// rating ≥ 4
    High,
    /// 3 ≤ rating < 4
    Medium,
    /// everything else, including NaN
    Low,
}

impl RatingBand {
    pub const ALL: [RatingBand; 3] = [RatingBand::High, RatingBand::Medium, RatingBand::Low];

    pub fn of(rating: f64) -> Self {
        if rating >= 4.0 {
            RatingBand::High
        } else if rating >= 3.0 {
            RatingBand::Medium
        } else {
            RatingBand::Low
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            RatingBand::High => Color32::from_rgb(46, 160, 67),
            RatingBand::Medium => Color32::from_rgb(240, 140, 0),
            RatingBand::Low => Color32::from_rgb(215, 48, 39),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingBand::High => "Rating ≥ 4",
            RatingBand::Medium => "Rating 3–4",
            RatingBand::Low => "Rating < 3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        let unique: BTreeSet<[u8; 4]> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn categories_keep_their_colour() {
        let cats: BTreeSet<String> = ["Indian", "Chinese", "Italian"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let colors = CategoryColors::new(&cats);
        assert_eq!(colors.color_for("Indian"), colors.color_for("Indian"));
        assert_ne!(colors.color_for("Indian"), colors.color_for("Chinese"));
        assert_eq!(colors.color_for("Mexican"), Color32::GRAY);
    }

    #[test]
    fn rating_band_boundaries() {
        assert_eq!(RatingBand::of(5.0), RatingBand::High);
        assert_eq!(RatingBand::of(4.0), RatingBand::High);
        assert_eq!(RatingBand::of(3.99), RatingBand::Medium);
        assert_eq!(RatingBand::of(3.0), RatingBand::Medium);
        assert_eq!(RatingBand::of(2.99), RatingBand::Low);
        assert_eq!(RatingBand::of(f64::NAN), RatingBand::Low);
    }
}
