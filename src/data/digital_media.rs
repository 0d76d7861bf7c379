use serde::{Deserialize, Serialize};

use super::model::LabeledSeries;

/// Fixed yearly digital media usage (hours/day), embedded as configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticTable {
    pub years: Vec<String>,
    pub values: Vec<f64>,
}

impl Default for StaticTable {
    fn default() -> Self {
        Self {
            years: (2012..=2020).map(|y| y.to_string()).collect(),
            values: vec![4.3, 4.9, 5.3, 5.9, 6.3, 6.5, 6.9, 7.3, 8.1],
        }
    }
}

impl StaticTable {
    /// Pair years with values; a length mismatch truncates to the shorter side.
    pub fn to_series(&self) -> LabeledSeries {
        if self.years.len() != self.values.len() {
            log::warn!(
                "digital media table has {} years but {} values; truncating",
                self.years.len(),
                self.values.len()
            );
        }
        LabeledSeries::from_pairs(
            self.years
                .iter()
                .zip(&self.values)
                .map(|(year, &value)| (year.as_str(), value)),
        )
    }
}
