use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, ChartView};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar and the chart selector.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export chart…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Select Chart:");
        egui::ComboBox::from_id_salt("chart_view")
            .selected_text(state.view.label())
            .show_ui(ui, |ui: &mut Ui| {
                for view in ChartView::ALL {
                    ui.selectable_value(&mut state.view, view, view.label());
                }
            });

        ui.separator();
        ui.label(format!("Source: {}", state.source.display()));

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Heading for the selected chart plus any advisories about degraded data.
pub fn header(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(state.title());
    });
    for advisory in state.dashboard.advisories() {
        ui.label(RichText::new(advisory).color(Color32::from_rgb(230, 126, 34)));
    }
}

// ---------------------------------------------------------------------------
// Bottom note
// ---------------------------------------------------------------------------

/// Explanatory note (and footer, if any) under the selected chart.
pub fn chart_note(ui: &mut Ui, state: &AppState) {
    let Ok(chart) = state.current_chart() else {
        return;
    };
    ui.vertical_centered(|ui: &mut Ui| {
        if let Some(footer) = &chart.footer {
            ui.small(footer);
        }
        ui.label(RichText::new(&chart.note).small());
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open depression indicator data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_source(path);
        if let Some(e) = &state.dashboard.source_error {
            log::error!("Failed to load {}: {e}", state.source.display());
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart as JSON")
        .add_filter("JSON", &["json"])
        .set_file_name("chart.json")
        .save_file();

    if let Some(path) = file {
        match state.export_chart(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export chart: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
