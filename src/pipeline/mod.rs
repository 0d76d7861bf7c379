//! Reconciliation pipeline: two labeled series → render-ready charts.
//!
//! ```text
//!   rows ──filter──▶ depression ─┐
//!                                ├─ reconcile ──────────────▶ assemble_combined   (union, dual axis)
//!   digital media table ─────────┘
//!                                └─ normalize_comparison ───▶ assemble_normalized (intersection, 0-100)
//! ```
//!
//! Every stage is a pure function of its inputs; rebuilding with the same
//! rows and config yields identical charts.

pub mod assemble;
pub mod normalize;
pub mod reconcile;

use crate::config::{DashboardConfig, PresentationConfig, DEPRESSION, DIGITAL_MEDIA};
use crate::data::filter::extract;
use crate::data::model::{LabeledSeries, Row};
use crate::error::PipelineError;

use assemble::{assemble_combined, assemble_normalized, ChartSpec};
use normalize::normalize_comparison;
use reconcile::reconcile;

/// Both chart views plus whatever degraded them.
#[derive(Debug)]
pub struct Dashboard {
    pub combined: ChartSpec,
    /// `Err(EmptyIntersection)` when the series share no label.
    pub normalized: Result<ChartSpec, PipelineError>,
    /// Set when the depression series is the configured fallback.
    pub source_error: Option<PipelineError>,
    /// Labels of series that are constant over the shared labels and so
    /// normalize to all zeros.
    pub constant_series: Vec<String>,
}

impl Dashboard {
    /// User-facing messages for every degraded part of the dashboard.
    pub fn advisories(&self) -> Vec<String> {
        let errors = self
            .source_error
            .iter()
            .chain(self.normalized.as_ref().err())
            .map(PipelineError::advisory);
        let constant = self.constant_series.iter().map(|label| {
            format!("{label} values are constant over the shared years; normalized to 0.")
        });
        errors.chain(constant).collect()
    }
}

/// Run the whole pipeline over the outcome of reading the depression source.
pub fn build_dashboard(
    source: Result<Vec<Row>, PipelineError>,
    config: &DashboardConfig,
) -> Dashboard {
    let (depression, source_error) = resolve_depression(source, config);
    let media = config.digital_media.to_series();
    Dashboard {
        source_error,
        ..build_charts(&depression, &media, &config.presentation)
    }
}

/// Extract the depression series, substituting the fallback when the source
/// could not be read or yields no matching rows.
pub fn resolve_depression(
    source: Result<Vec<Row>, PipelineError>,
    config: &DashboardConfig,
) -> (LabeledSeries, Option<PipelineError>) {
    let extracted = source.and_then(|rows| {
        let series = extract(&rows, config.source.projection());
        if series.is_empty() {
            Err(PipelineError::ParseMalformed(format!(
                "no rows where {} is {:?}",
                config.source.filter_column, config.source.filter_value
            )))
        } else {
            Ok(series)
        }
    });

    match extracted {
        Ok(series) => (series, None),
        Err(e) => {
            log::warn!("{e}; substituting fallback series ({} points)", config.fallback.len());
            (config.fallback.clone(), Some(e))
        }
    }
}

/// Build the combined and normalized charts for a depression/media pair.
/// The result carries no source error.
pub fn build_charts(
    depression: &LabeledSeries,
    media: &LabeledSeries,
    presentation: &PresentationConfig,
) -> Dashboard {
    let names = [DEPRESSION, DIGITAL_MEDIA];
    let reconciled = reconcile(depression, DEPRESSION, media, DIGITAL_MEDIA);
    let combined = assemble_combined(&reconciled, presentation);

    let mut constant_series = Vec::new();
    let normalized = normalize_comparison(depression, media).map(|cmp| {
        for (name, part) in names.iter().zip([&cmp.a, &cmp.b]) {
            if part.constant {
                constant_series.push(
                    presentation
                        .style(name)
                        .map(|s| s.label.clone())
                        .unwrap_or_else(|| name.to_string()),
                );
            }
        }
        assemble_normalized(&cmp, names, presentation)
    });

    Dashboard {
        combined,
        normalized,
        source_error: None,
        constant_series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    const CSV: &str = "Year,Strata,Strata Name,Percent\n\
                       2012,Total,Total,13.0\n\
                       2012,Sex,Male,9.9\n\
                       2013,Total,Total,n/a\n\
                       2014,Total,Total,15.1\n\
                       2022,Total,Total,19.4\n";

    fn missing_source() -> Result<Vec<Row>, PipelineError> {
        Err(PipelineError::SourceUnavailable {
            location: "missing.csv".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }

    #[test]
    fn full_pipeline_over_csv() {
        let config = DashboardConfig::default();
        let dash = build_dashboard(Ok(parse_csv(CSV)), &config);

        assert!(dash.source_error.is_none());
        assert!(dash.advisories().is_empty());

        let combined = &dash.combined;
        assert_eq!(combined.axis.first().map(String::as_str), Some("2012"));
        assert_eq!(combined.axis.last().map(String::as_str), Some("2022"));
        assert_eq!(combined.axis.len(), 10);
        // 2013 was unparsable and counts as 0
        assert_eq!(combined.series[0].values[1], Some(0.0));
        assert_eq!(combined.series[1].values[9], None);

        let normalized = dash.normalized.as_ref().unwrap();
        assert_eq!(normalized.axis, vec!["2012", "2013", "2014"]);
        assert_eq!(normalized.series[0].original_values, Some(vec![13.0, 0.0, 15.1]));
        assert_eq!(normalized.series[0].values[2], Some(100.0));
        assert_eq!(normalized.series[0].values[1], Some(0.0));
    }

    #[test]
    fn unavailable_source_uses_fallback() {
        let config = DashboardConfig {
            fallback: LabeledSeries::from_pairs([("2019", 15.0), ("2020", 16.0)]),
            ..Default::default()
        };
        let dash = build_dashboard(missing_source(), &config);

        assert!(matches!(
            dash.source_error,
            Some(PipelineError::SourceUnavailable { .. })
        ));
        assert_eq!(dash.advisories().len(), 1);
        assert_eq!(dash.combined.series[0].values.iter().flatten().count(), 2);
        assert!(dash.normalized.is_ok());
    }

    #[test]
    fn empty_fallback_still_yields_combined_view() {
        let dash = build_dashboard(missing_source(), &DashboardConfig::default());

        assert_eq!(dash.combined.axis.len(), 9);
        assert!(dash.combined.series[0].values.iter().all(Option::is_none));
        assert!(dash.combined.series[1].values.iter().all(Option::is_some));
        assert!(matches!(dash.normalized, Err(PipelineError::EmptyIntersection)));
        assert_eq!(dash.advisories().len(), 2);
    }

    #[test]
    fn no_matching_rows_is_malformed() {
        let rows = parse_csv("Year,Strata,Percent\n2019,Male,9.0\n");
        let (series, err) = resolve_depression(Ok(rows), &DashboardConfig::default());
        assert!(series.is_empty());
        assert!(matches!(err, Some(PipelineError::ParseMalformed(_))));
    }

    #[test]
    fn disjoint_series_only_lose_the_normalized_view() {
        let a = LabeledSeries::from_pairs([("1990", 1.0), ("1991", 2.0)]);
        let b = LabeledSeries::from_pairs([("2000", 3.0)]);
        let dash = build_charts(&a, &b, &PresentationConfig::default());
        let combined = &dash.combined;

        assert!(matches!(dash.normalized, Err(PipelineError::EmptyIntersection)));
        assert_eq!(combined.axis, vec!["1990", "1991", "2000"]);
        assert_eq!(combined.series[0].values, vec![Some(1.0), Some(2.0), None]);
        assert_eq!(combined.series[1].values, vec![None, None, Some(3.0)]);
    }

    #[test]
    fn constant_depression_gets_an_advisory() {
        let csv = "Year,Strata,Percent\n2018,Total,15.0\n2019,Total,15.0\n2020,Total,15.0\n";
        let dash = build_dashboard(Ok(parse_csv(csv)), &DashboardConfig::default());

        let normalized = dash.normalized.as_ref().unwrap();
        assert_eq!(normalized.series[0].values, vec![Some(0.0); 3]);
        assert_eq!(dash.constant_series, vec!["Depression (%)"]);
        assert_eq!(
            dash.advisories(),
            vec!["Depression (%) values are constant over the shared years; normalized to 0."]
        );
    }

    #[test]
    fn rebuilding_is_bit_identical() {
        let config = DashboardConfig::default();
        let first = build_dashboard(Ok(parse_csv(CSV)), &config);
        let second = build_dashboard(Ok(parse_csv(CSV)), &config);

        assert_eq!(first.combined, second.combined);
        assert_eq!(
            serde_json::to_string(&first.combined).unwrap(),
            serde_json::to_string(&second.combined).unwrap()
        );
        let (a, b) = (first.normalized.unwrap(), second.normalized.unwrap());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
