use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// (strata, strata name, offset from the total rate in percentage points)
const STRATA: [(&str, &str, f64); 5] = [
    ("Total", "Total", 0.0),
    ("Sex", "Male", -3.8),
    ("Sex", "Female", 3.6),
    ("Age", "18-34", 2.9),
    ("Age", "65+", -4.1),
];

/// Smooth upward trend with a step in 2020, loosely shaped like the
/// published adult depression indicator.
fn total_rate(year: i64) -> f64 {
    let base = 11.0 + 0.35 * (year - 2012) as f64;
    let step = if year >= 2020 { 3.0 } else { 0.0 };
    ((base + step) * 10.0).round() / 10.0
}

struct Record {
    year: i64,
    strata: &'static str,
    strata_name: &'static str,
    percent: f64,
}

fn main() {
    let records: Vec<Record> = (2012..=2021)
        .flat_map(|year| {
            STRATA.iter().map(move |&(strata, strata_name, offset)| Record {
                year,
                strata,
                strata_name,
                percent: ((total_rate(year) + offset) * 10.0).round() / 10.0,
            })
        })
        .collect();

    // ---- CSV ----
    let csv_path = "adult-depression-lghc-indicator-24.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record(["Year", "Strata", "Strata Name", "Percent"])
        .expect("Failed to write CSV header");
    for r in &records {
        writer
            .write_record([
                r.year.to_string(),
                r.strata.to_string(),
                r.strata_name.to_string(),
                r.percent.to_string(),
            ])
            .expect("Failed to write CSV record");
    }
    writer.flush().expect("Failed to flush CSV file");

    // ---- Parquet ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("Year", DataType::Int64, false),
        Field::new("Strata", DataType::Utf8, false),
        Field::new("Strata Name", DataType::Utf8, false),
        Field::new("Percent", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.strata))),
            Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.strata_name))),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.percent))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "adult-depression-lghc-indicator-24.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} records ({} strata x {} years) to {csv_path} and {parquet_path}",
        records.len(),
        STRATA.len(),
        records.len() / STRATA.len()
    );
}
