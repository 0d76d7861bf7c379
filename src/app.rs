use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + chart selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: chart note ----
        egui::TopBottomPanel::bottom("chart_note").show(ctx, |ui| {
            panels::chart_note(ui, &self.state);
        });

        // ---- Central panel: heading + chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::header(ui, &self.state);
            ui.separator();
            plot::chart_plot(ui, &self.state);
        });
    }
}
