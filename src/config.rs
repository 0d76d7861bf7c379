use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::data::digital_media::StaticTable;
use crate::data::filter::Projection;
use crate::data::model::LabeledSeries;

/// Series identity of the extracted depression series.
pub const DEPRESSION: &str = "depression";
/// Series identity of the embedded digital media series.
pub const DIGITAL_MEDIA: &str = "digital-media";

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Everything the dashboard needs besides the raw source data.
///
/// Loaded from JSON; every field falls back to its default so a partial file
/// only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    /// Substituted for the depression series when the source is unusable.
    pub fallback: LabeledSeries,
    pub digital_media: StaticTable,
    pub presentation: PresentationConfig,
}

impl DashboardConfig {
    /// Read a JSON config file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Where the depression table lives and how to project it into a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub location: PathBuf,
    pub filter_column: String,
    pub filter_value: String,
    pub label_column: String,
    pub data_column: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: PathBuf::from("adult-depression-lghc-indicator-24.csv"),
            filter_column: "Strata".into(),
            filter_value: "Total".into(),
            label_column: "Year".into(),
            data_column: "Percent".into(),
        }
    }
}

impl SourceConfig {
    pub fn projection(&self) -> Projection<'_> {
        Projection {
            filter_column: &self.filter_column,
            filter_value: &self.filter_value,
            label_column: &self.label_column,
            data_column: &self.data_column,
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Display metadata per series identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// Legend label in the combined view.
    pub label: String,
    /// Legend label in the normalized view.
    pub normalized_label: String,
    /// Title of the axis this series binds to in the combined view.
    pub axis_title: String,
    /// `None` picks a colour from the generated palette.
    #[serde(default)]
    pub color: Option<Rgb>,
}

/// Titles, labels and unit suffixes attached by the chart assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub combined_title: String,
    pub normalized_title: String,
    pub axis_label: String,
    pub normalized_axis_title: String,
    pub normalized_footer: String,
    pub combined_note: String,
    pub normalized_note: String,
    pub series: BTreeMap<String, SeriesStyle>,
    /// Series identity → suffix appended to values in tooltips.
    pub units: BTreeMap<String, String>,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        let series = BTreeMap::from([
            (
                DEPRESSION.to_string(),
                SeriesStyle {
                    label: "Depression (%)".into(),
                    normalized_label: "Depression (normalized)".into(),
                    axis_title: "Depression Rate (%)".into(),
                    color: None,
                },
            ),
            (
                DIGITAL_MEDIA.to_string(),
                SeriesStyle {
                    label: "Digital Media Usage (hours/day)".into(),
                    normalized_label: "Digital Media Usage (normalized)".into(),
                    axis_title: "Digital Media Usage (hours/day)".into(),
                    color: None,
                },
            ),
        ]);
        let units = BTreeMap::from([
            (DEPRESSION.to_string(), "%".to_string()),
            (DIGITAL_MEDIA.to_string(), " hours/day".to_string()),
        ]);

        Self {
            combined_title: "Depression Rates vs. Digital Media Usage Over Time".into(),
            normalized_title: "Normalized Comparison: Depression vs. Digital Media Usage".into(),
            axis_label: "Year".into(),
            normalized_axis_title: "Normalized Values (%)".into(),
            normalized_footer: "Values normalized to 0-100% scale for comparison".into(),
            combined_note: "This chart uses dual Y-axes to compare two different metrics. \
                            The left Y-axis shows depression percentage, while the right \
                            Y-axis shows digital media consumption in hours per day."
                .into(),
            normalized_note: "Both datasets have been normalized to a 0-100% scale to allow \
                              direct comparison of trends regardless of their different \
                              units and ranges."
                .into(),
            series,
            units,
        }
    }
}

impl PresentationConfig {
    pub fn unit(&self, series: &str) -> &str {
        self.units.get(series).map(String::as_str).unwrap_or("")
    }

    pub fn style(&self, series: &str) -> Option<&SeriesStyle> {
        self.series.get(series)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn no_path_gives_defaults() {
        let config = DashboardConfig::load(None).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.source.filter_value, "Total");
        assert_eq!(config.presentation.unit(DEPRESSION), "%");
        assert_eq!(config.presentation.unit(DIGITAL_MEDIA), " hours/day");
        assert_eq!(config.presentation.unit("unknown"), "");
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{
                "source": {{ "filter_value": "Male" }},
                "fallback": [{{ "label": "2019", "value": 14.0 }}]
            }}"#
        )
        .unwrap();

        let config = DashboardConfig::load(Some(f.path())).unwrap();
        assert_eq!(config.source.filter_value, "Male");
        assert_eq!(config.source.filter_column, "Strata");
        assert_eq!(config.fallback.lookup("2019"), Some(14.0));
        assert_eq!(config.digital_media, StaticTable::default());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        let err = DashboardConfig::load(Some(f.path())).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }
}
