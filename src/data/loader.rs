use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Row;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the rows of a tabular data source.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` (and anything unrecognised) – header row + records
/// * `.json`    – `[{ "Year": "2019", "Strata": "Total", ... }, ...]`
/// * `.parquet` – any flat schema, every cell rendered as text
///
/// A source that cannot be opened is `SourceUnavailable`; one that opens but
/// yields no records is `ParseMalformed`.
pub fn load_rows(path: &Path) -> Result<Vec<Row>, PipelineError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "parquet" | "pq" => {
            let file = std::fs::File::open(path).map_err(|e| unavailable(path, e))?;
            load_parquet(file).map_err(malformed)?
        }
        "json" => {
            let text = read_text(path)?;
            load_json(&text).map_err(malformed)?
        }
        _ => parse_csv(&read_text(path)?),
    };

    if rows.is_empty() {
        return Err(PipelineError::ParseMalformed(format!(
            "{} contains no records",
            path.display()
        )));
    }
    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Text that exists but is not UTF-8 is malformed, not unavailable.
fn read_text(path: &Path) -> Result<String, PipelineError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => {
            PipelineError::ParseMalformed(format!("{} is not UTF-8 text: {e}", path.display()))
        }
        _ => unavailable(path, e),
    })
}

fn unavailable(path: &Path, source: std::io::Error) -> PipelineError {
    PipelineError::SourceUnavailable {
        location: path.display().to_string(),
        source,
    }
}

fn malformed(e: anyhow::Error) -> PipelineError {
    PipelineError::ParseMalformed(format!("{e:#}"))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Turn delimited text into rows keyed by the header line.
///
/// Best effort: ragged lines map only the fields they have (extra fields are
/// dropped), unreadable lines are skipped, and a missing header yields no rows.
pub fn parse_csv(text: &str) -> Vec<Row> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|h| h.to_string()).collect(),
        Err(e) => {
            log::warn!("CSV header unreadable: {e}");
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping CSV row {row_no}: {e}");
                continue;
            }
        };
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }
    rows
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON: a top-level array of flat objects. Scalars are
/// stringified, nulls are treated as missing cells.
fn load_json(text: &str) -> Result<Vec<Row>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<Row> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .filter_map(|(key, val)| json_cell(val).map(|v| (key.clone(), v)))
                .collect())
        })
        .collect()
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn load_parquet(file: std::fs::File) -> Result<Vec<Row>> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut record = Row::new();
            for (field, col) in schema.fields().iter().zip(batch.columns()) {
                if col.is_null(row) {
                    continue;
                }
                let text = array_value_to_string(col.as_ref(), row)
                    .with_context(|| format!("Row {row}: rendering '{}'", field.name()))?;
                record.insert(field.name().clone(), text);
            }
            rows.push(record);
        }
    }
    Ok(rows)
}
