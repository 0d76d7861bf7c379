mod app;
mod color;
mod config;
mod data;
mod error;
mod pipeline;
mod state;
mod ui;

use std::path::PathBuf;

use app::DashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

/// Usage: `mood-media-dashboard [DATA_FILE] [CONFIG_JSON]`
fn main() -> eframe::Result {
    env_logger::init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let data_path = args.next();
    let config_path = args.next();

    let mut config = match DashboardConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}; falling back to default configuration");
            DashboardConfig::default()
        }
    };
    if let Some(path) = data_path {
        config.source.location = path;
    }

    let state = AppState::new(config);
    for advisory in state.dashboard.advisories() {
        log::warn!("{advisory}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Depression vs. Digital Media",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
}
