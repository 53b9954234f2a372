use eframe::egui::Ui;
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, Points};

use crate::color::RatingBand;
use crate::data::model::DeliveryRecord;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Restaurant map (central panel, Map tab)
// ---------------------------------------------------------------------------

/// Plot visible deliveries at (longitude, latitude), coloured by rating band.
pub fn restaurant_map(ui: &mut Ui, state: &AppState) {
    ui.heading("Restaurant Locations");

    let [center_lat, center_lon] = state.config.map_center;
    let span = state.config.map_span_deg;
    let records: Vec<&DeliveryRecord> = state.visible_records().collect();

    Plot::new("restaurant_map")
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .include_x(center_lon - span)
        .include_x(center_lon + span)
        .include_y(center_lat - span)
        .include_y(center_lat + span)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |_name, point| hover_label(&records, point))
        .show(ui, |plot_ui| {
            for band in RatingBand::ALL {
                let points: Vec<[f64; 2]> = state
                    .visible_records()
                    .filter(|r| RatingBand::of(r.rating) == band)
                    .map(|r| [r.longitude, r.latitude])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(band.label())
                        .color(band.color())
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0),
                );
            }
        });
}

/// Tooltip text for the delivery nearest to the cursor.
fn hover_label(records: &[&DeliveryRecord], point: &PlotPoint) -> String {
    nearest(records, point.x, point.y)
        .map(|r| {
            format!(
                "{} | {}/5\nCuisine: {}\nDistance: {} km\nTime: {} mins\nWeather: {}",
                r.restaurant,
                r.rating,
                r.cuisine_type,
                r.distance_km,
                r.delivery_time_mins,
                r.weather_condition
            )
        })
        .unwrap_or_default()
}

fn nearest<'a>(records: &[&'a DeliveryRecord], lon: f64, lat: f64) -> Option<&'a DeliveryRecord> {
    records
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (a.longitude - lon).powi(2) + (a.latitude - lat).powi(2);
            let db = (b.longitude - lon).powi(2) + (b.latitude - lat).powi(2);
            da.total_cmp(&db)
        })
}
