use std::collections::BTreeSet;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, Points};

use crate::color::CategoryColors;
use crate::data::model::DeliveryRecord;
use crate::data::stats::{BoxSummary, group_summaries};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;
/// Horizontal room the boxes of one category slot share.
const SLOT_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Trends tab
// ---------------------------------------------------------------------------

/// Scatter and box charts over the filtered view.
pub fn trends(ui: &mut Ui, state: &AppState) {
    ui.columns(2, |cols| {
        cols[0].strong("Delivery Time vs Rating");
        time_vs_rating(&mut cols[0], state);

        cols[1].strong("Rating by Cuisine");
        let groups = group_summaries(
            &state.dataset.records,
            &state.visible_indices,
            |r| (r.cuisine_type.as_str(), r.weather_condition.as_str()),
            |r| r.rating,
        );
        split_box_chart(
            &mut cols[1],
            "rating_by_cuisine",
            "Rating",
            &groups,
            &state.dataset.weather_conditions,
            &state.weather_colors,
        );
    });

    ui.add_space(8.0);
    ui.strong("Weather Impact on Delivery Time");
    let groups = group_summaries(
        &state.dataset.records,
        &state.visible_indices,
        |r| r.weather_condition.as_str(),
        |r| r.delivery_time_mins,
    );
    box_chart(ui, "time_by_weather", "Delivery time (mins)", &groups, &state.weather_colors);
}

/// Points per cuisine plus that cuisine's LOWESS trend.
fn time_vs_rating(ui: &mut Ui, state: &AppState) {
    Plot::new("time_vs_rating")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Delivery time (mins)")
        .y_axis_label("Rating")
        .show(ui, |plot_ui| {
            for cuisine in &state.criteria.allowed_cuisines {
                let points: Vec<[f64; 2]> = state
                    .visible_records()
                    .filter(|r| &r.cuisine_type == cuisine)
                    .map(|r: &DeliveryRecord| [r.delivery_time_mins, r.rating])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(points)
                        .name(cuisine)
                        .color(state.cuisine_colors.color_for(cuisine))
                        .radius(3.5),
                );
            }

            for (cuisine, trend) in &state.trend_lines {
                if trend.len() < 2 {
                    continue;
                }
                // Same legend name, so the line toggles with its points.
                plot_ui.line(
                    Line::new(trend.clone())
                        .name(cuisine)
                        .color(state.cuisine_colors.color_for(cuisine))
                        .width(2.0),
                );
            }
        });
}

/// One box per category, placed at x = 0, 1, 2, … and labelled by name.
fn box_chart(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    groups: &[(&str, BoxSummary)],
    colors: &CategoryColors,
) {
    let names: Vec<String> = groups.iter().map(|(name, _)| name.to_string()).collect();

    let boxes: Vec<BoxElem> = groups
        .iter()
        .enumerate()
        .map(|(i, (name, s))| {
            styled_box(i as f64, SLOT_WIDTH * 0.75, s, name, colors.color_for(name))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| category_label(&names, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
        });
}

/// Boxes keyed by `(category, series)`: one slot per category, with each
/// series' box at a fixed offset inside it and coloured per series.
///
/// `series` fixes the offsets, so a series keeps its place when filtered out.
fn split_box_chart(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    groups: &[((&str, &str), BoxSummary)],
    series: &BTreeSet<String>,
    colors: &CategoryColors,
) {
    // Groups arrive sorted by category, so slots follow the same order.
    let mut names: Vec<String> = Vec::new();
    for ((category, _), _) in groups {
        if names.last().map(String::as_str) != Some(*category) {
            names.push(category.to_string());
        }
    }

    let plots: Vec<BoxPlot> = series
        .iter()
        .enumerate()
        .filter_map(|(j, name)| {
            let (offset, width) = series_offset(j, series.len());
            let color = colors.color_for(name);
            let boxes: Vec<BoxElem> = groups
                .iter()
                .filter(|((_, s), _)| *s == name.as_str())
                .filter_map(|((category, _), summary)| {
                    let slot = names.iter().position(|n| n.as_str() == *category)?;
                    let label = format!("{category} / {name}");
                    Some(styled_box(slot as f64 + offset, width, summary, &label, color))
                })
                .collect();
            (!boxes.is_empty()).then(|| BoxPlot::new(boxes).name(name))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| category_label(&names, mark.value))
        .show(ui, |plot_ui| {
            for plot in plots {
                plot_ui.box_plot(plot);
            }
        });
}

fn styled_box(x: f64, width: f64, s: &BoxSummary, name: &str, color: Color32) -> BoxElem {
    BoxElem::new(x, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
        .name(format!("{name} (n={})", s.count))
        .box_width(width)
        .fill(color.gamma_multiply(0.4))
        .stroke(Stroke::new(1.5, color))
}

/// Offset from the slot centre and box width for series `index` of `count`.
fn series_offset(index: usize, count: usize) -> (f64, f64) {
    let band = SLOT_WIDTH / count.max(1) as f64;
    let offset = (index as f64 + 0.5) * band - SLOT_WIDTH / 2.0;
    (offset, band * 0.85)
}

/// Axis label for a category slot; blank between slots.
fn category_label(names: &[String], value: f64) -> String {
    let slot = value.round();
    if (value - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    names.get(slot as usize).cloned().unwrap_or_default()
}
