/// Data layer: core types, loading, and series extraction.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read source → Vec<Row>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Strata == Total, project (Year, Percent) → LabeledSeries
///   └──────────┘
///
///   digital_media: embedded yearly table → LabeledSeries
/// ```

pub mod digital_media;
pub mod filter;
pub mod loader;
pub mod model;
