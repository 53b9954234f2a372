use eframe::egui::{self, Color32, RichText, Ui};

use crate::predictor::delta_vs_baseline;
use crate::state::{AppState, DISTANCE_RANGE, TIME_RANGE};

/// Sliders for time and distance, and the model's rating for them.
pub fn rating_predictor(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Rating Predictor");
    ui.add_space(6.0);

    ui.columns(2, |cols| {
        cols[0].label("Expected delivery time (minutes):");
        cols[0].add(
            egui::Slider::new(&mut state.predict_time, TIME_RANGE.0..=TIME_RANGE.1).step_by(1.0),
        );
        cols[1].label("Distance (km):");
        cols[1].add(
            egui::Slider::new(&mut state.predict_distance, DISTANCE_RANGE.0..=DISTANCE_RANGE.1)
                .step_by(1.0),
        );
    });

    ui.add_space(12.0);

    let predicted = state.prediction();
    let delta = delta_vs_baseline(predicted);
    ui.label("Predicted Rating");
    ui.label(RichText::new(format!("{predicted:.1}/5")).size(32.0).strong());
    let (arrow, color) = if delta >= 0.0 {
        ("⬆", Color32::from_rgb(46, 160, 67))
    } else {
        ("⬇", Color32::from_rgb(215, 48, 39))
    };
    ui.label(RichText::new(format!("{arrow} {delta:.1} vs average")).color(color));

    ui.add_space(12.0);
    let model = &state.model;
    let mut caption = format!("Model equation: {}", model.equation());
    if let Some(r2) = model.r_squared {
        caption.push_str(&format!("   (R² = {r2:.2}, n = {})", model.samples));
    }
    ui.label(RichText::new(caption).small().weak());
}
