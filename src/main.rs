//! Crime Dashboard - Crime Records Explorer
//!
//! Loads `crimes.csv`, filters it by year, state and crime type, and shows
//! aggregated charts plus a short trend report.

mod charts;
mod config;
mod data;
mod gui;
mod pipeline;
mod stats;

use config::DashboardConfig;
use eframe::egui;
use gui::CrimeDashboardApp;

fn main() -> eframe::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = DashboardConfig::default();
    log::info!("Starting dashboard with {}", config.data_path.display());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title(&config.window_title),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(CrimeDashboardApp::new(cc, config)))),
    )
}
