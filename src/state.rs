use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::data::loader::load_rows;
use crate::error::PipelineError;
use crate::pipeline::assemble::ChartSpec;
use crate::pipeline::{build_dashboard, Dashboard};

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    Combined,
    Normalized,
}

impl ChartView {
    pub const ALL: [ChartView; 2] = [ChartView::Combined, ChartView::Normalized];

    /// Entry shown in the chart selector.
    pub fn label(self) -> &'static str {
        match self {
            ChartView::Combined => "Combined Line Chart",
            ChartView::Normalized => "Normalized Comparison Chart",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Location the depression rows were last read from.
    pub source: PathBuf,

    /// Charts built from the current source and config.
    pub dashboard: Dashboard,

    /// Which chart the user selected.
    pub view: ChartView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build state by reading the configured source location.
    pub fn new(config: DashboardConfig) -> Self {
        let source = config.source.location.clone();
        let dashboard = build_dashboard(load_rows(&source), &config);
        Self {
            config,
            source,
            dashboard,
            view: ChartView::Combined,
            status_message: None,
        }
    }

    /// Re-read the depression rows from `path` and rebuild every chart.
    pub fn load_source(&mut self, path: PathBuf) {
        self.dashboard = build_dashboard(load_rows(&path), &self.config);
        self.source = path;
        self.status_message = None;
    }

    /// The chart for the selected view, or why it cannot be drawn.
    pub fn current_chart(&self) -> Result<&ChartSpec, &PipelineError> {
        match self.view {
            ChartView::Combined => Ok(&self.dashboard.combined),
            ChartView::Normalized => self.dashboard.normalized.as_ref(),
        }
    }

    /// Heading for the selected view, also shown when its chart is missing.
    pub fn title(&self) -> &str {
        let presentation = &self.config.presentation;
        match self.view {
            ChartView::Combined => &presentation.combined_title,
            ChartView::Normalized => &presentation.normalized_title,
        }
    }

    /// Write the selected chart as pretty JSON.
    pub fn export_chart(&self, path: &Path) -> Result<()> {
        let chart = self
            .current_chart()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("nothing to export")?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, chart).context("writing chart JSON")?;
        log::info!("Exported {:?} chart to {}", self.view, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::LabeledSeries;
    use crate::pipeline::assemble::ChartKind;

    fn csv_file() -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            f,
            "Year,Strata,Percent\n2018,Total,12.5\n2019,Total,13.2\n2020,Total,18.6\n"
        )
        .unwrap();
        f
    }

    fn config_for(path: &Path) -> DashboardConfig {
        let mut config = DashboardConfig::default();
        config.source.location = path.to_path_buf();
        config
    }

    #[test]
    fn starts_on_combined_view() {
        let f = csv_file();
        let state = AppState::new(config_for(f.path()));
        assert_eq!(state.view, ChartView::Combined);
        assert_eq!(state.current_chart().unwrap().kind, ChartKind::Line);
        assert_eq!(state.title(), "Depression Rates vs. Digital Media Usage Over Time");
        assert!(state.dashboard.advisories().is_empty());
    }

    #[test]
    fn switching_view_selects_normalized_chart() {
        let f = csv_file();
        let mut state = AppState::new(config_for(f.path()));
        state.view = ChartView::Normalized;
        let chart = state.current_chart().unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.axis, vec!["2018", "2019", "2020"]);
        assert!(state.title().starts_with("Normalized Comparison"));
    }

    #[test]
    fn missing_source_degrades_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(&dir.path().join("absent.csv"));
        config.fallback = LabeledSeries::from_pairs([("2019", 1.0), ("2020", 2.0)]);
        let mut state = AppState::new(config);

        assert!(state.dashboard.source_error.is_some());
        assert_eq!(state.dashboard.advisories().len(), 1);

        let f = csv_file();
        state.load_source(f.path().to_path_buf());
        assert!(state.dashboard.source_error.is_none());
        assert_eq!(state.source, f.path());
    }

    #[test]
    fn export_writes_chart_json() {
        let f = csv_file();
        let state = AppState::new(config_for(f.path()));
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("chart.json");

        state.export_chart(&out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let expected = serde_json::to_string_pretty(state.current_chart().unwrap()).unwrap();
        assert_eq!(text, expected);
        let chart: ChartSpec = serde_json::from_str(&text).unwrap();
        assert_eq!(chart.series.len(), 2);
    }

    #[test]
    fn export_without_chart_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(config_for(&dir.path().join("absent.csv")));
        state.view = ChartView::Normalized;
        assert!(state.export_chart(&dir.path().join("out.json")).is_err());
    }
}
