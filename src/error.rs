use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline error taxonomy
// ---------------------------------------------------------------------------

/// Conditions the dashboard pipeline reports instead of crashing.
///
/// `SourceUnavailable` and `ParseMalformed` are recovered from by
/// substituting the configured fallback series. `EmptyIntersection` only
/// prevents the normalized view; the combined view is still produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("data source {location} unavailable: {source}")]
    SourceUnavailable {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source data: {0}")]
    ParseMalformed(String),

    #[error("no overlapping labels between the two series")]
    EmptyIntersection,
}

impl PipelineError {
    /// Human-readable message shown in the UI next to the chart.
    pub fn advisory(&self) -> String {
        match self {
            PipelineError::SourceUnavailable { location, .. } => {
                format!("Could not load depression data from {location}; showing fallback data.")
            }
            PipelineError::ParseMalformed(detail) => {
                format!("Depression data could not be read ({detail}); showing fallback data.")
            }
            PipelineError::EmptyIntersection => {
                "No overlapping years between the two datasets.".to_string()
            }
        }
    }
}
