use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{charts, map, panels, predict, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DeliveryDashboardApp {
    pub state: AppState,
}

impl DeliveryDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DeliveryDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("🍔 Food Delivery Performance Dashboard");
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.state.tab, tab, tab.title());
                }
            });
            ui.separator();

            match self.state.tab {
                Tab::Map => map::restaurant_map(ui, &self.state),
                Tab::Trends => {
                    egui::ScrollArea::vertical().show(ui, |ui| charts::trends(ui, &self.state));
                }
                Tab::Predict => predict::rating_predictor(ui, &mut self.state),
                Tab::RawData => table::raw_data(ui, &mut self.state),
            }
        });
    }
}
