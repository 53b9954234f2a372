use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::DEFAULT_EXPORT_NAME;
use crate::state::{AppState, Facet};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let cuisines = state.dataset.cuisines.clone();
            facet_section(ui, state, Facet::Cuisine, "Cuisines", &cuisines);

            ui.add_space(6.0);
            ui.strong("Minimum rating");
            // Whole stars, unless the data reaches below 1 at a fractional rating.
            let floor = state.rating_floor;
            let step = if floor.fract() == 0.0 { 1.0 } else { 0.1 };
            let mut min_rating = state.criteria.min_rating;
            ui.add(egui::Slider::new(&mut min_rating, floor..=5.0).step_by(step));
            state.set_min_rating(min_rating);
            ui.add_space(6.0);

            let weather = state.dataset.weather_conditions.clone();
            facet_section(ui, state, Facet::Weather, "Weather conditions", &weather);
        });
}

/// Collapsible multi-select for one categorical column.
fn facet_section(
    ui: &mut Ui,
    state: &mut AppState,
    facet: Facet,
    title: &str,
    all_values: &BTreeSet<String>,
) {
    let selected = match facet {
        Facet::Cuisine => &state.criteria.allowed_cuisines,
        Facet::Weather => &state.criteria.allowed_weather,
    };
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(facet);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(facet);
                }
            });

            for value in all_values {
                let mut checked = match facet {
                    Facet::Cuisine => state.criteria.allowed_cuisines.contains(value),
                    Facet::Weather => state.criteria.allowed_weather.contains(value),
                };
                let mut text = RichText::new(value);
                if facet == Facet::Cuisine {
                    text = text.color(state.cuisine_colors.color_for(value));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.set_allowed(facet, value, checked);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export filtered CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} deliveries loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));
        if let (Some(lo), Some(hi)) = (state.dataset.min_rating, state.dataset.max_rating) {
            ui.separator();
            ui.label(format!("ratings {lo}–{hi}"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a destination and export the current filtered view there.
pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        // Outcome lands in the status line.
        let _ = state.export_visible(&path);
    }
}
