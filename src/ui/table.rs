use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::COLUMNS;
use crate::state::AppState;
use crate::ui::panels::save_file_dialog;

const ROW_HEIGHT: f32 = 18.0;

/// Filtered records as a table, with a download button.
pub fn raw_data(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Raw Data");
        if ui.button("📥 Download Filtered Data as CSV").clicked() {
            save_file_dialog(state);
        }
    });
    ui.separator();

    if state.visible_indices.is_empty() {
        ui.label("No deliveries match the current filters.");
    }

    let records = &state.dataset.records;
    let indices = &state.visible_indices;

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(140.0))
            .columns(Column::auto().at_least(80.0), COLUMNS.len() - 1)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for name in COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                    let rec = &records[indices[row.index()]];
                    let cells = [
                        rec.restaurant.clone(),
                        rec.cuisine_type.clone(),
                        rec.weather_condition.clone(),
                        rec.rating.to_string(),
                        rec.delivery_time_mins.to_string(),
                        rec.distance_km.to_string(),
                        format!("{:.4}", rec.latitude),
                        format!("{:.4}", rec.longitude),
                    ];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
