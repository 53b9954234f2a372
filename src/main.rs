mod app;
mod color;
mod config;
mod data;
mod error;
mod predictor;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use app::DeliveryDashboardApp;
use config::{ConfigSources, DashboardConfig};
use eframe::egui;
use predictor::RatingModel;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let state = startup().inspect_err(|e| log::error!("Startup failed: {e:#}"))?;
    let config = &state.config;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Food Delivery Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(DeliveryDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}

/// Load config, dataset and model. Without data and a fitted model there is
/// nothing to show, so any failure here aborts.
fn startup() -> Result<AppState> {
    let config = DashboardConfig::resolve(&ConfigSources::from_env())
        .context("loading dashboard configuration")?;
    let dataset = data::loader::load_shared(&config.data_path)
        .context("loading delivery dataset")?;
    let model = RatingModel::train(&dataset.records).context("fitting rating model")?;
    Ok(AppState::new(dataset, Arc::new(model), config))
}
