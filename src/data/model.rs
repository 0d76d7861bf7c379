use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Row – one record of the source table
// ---------------------------------------------------------------------------

/// One parsed source line: column name → raw cell text.
///
/// Columns missing from a ragged line are simply absent.
pub type Row = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// LabeledSeries – ordered (label, value) pairs
// ---------------------------------------------------------------------------

/// A single `(label, value)` observation, e.g. `("2019", 13.2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub label: String,
    pub value: f64,
}

/// One measured quantity over time, in source order.
///
/// Labels are not required to be unique; lookups use the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabeledSeries {
    points: Vec<LabeledPoint>,
}

impl LabeledSeries {
    /// Build a series from `(label, value)` pairs.
    pub fn from_pairs<L: Into<String>>(pairs: impl IntoIterator<Item = (L, f64)>) -> Self {
        pairs
            .into_iter()
            .map(|(label, value)| LabeledPoint {
                label: label.into(),
                value,
            })
            .collect()
    }

    #[cfg(test)]
    pub fn points(&self) -> &[LabeledPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Labels in source order, duplicates included.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.label.as_str())
    }

    /// Value of the first point carrying `label`.
    pub fn lookup(&self, label: &str) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.value)
    }

    /// First-match index: label → value, later duplicates ignored.
    pub fn first_match_index(&self) -> HashMap<&str, f64> {
        let mut index = HashMap::with_capacity(self.points.len());
        for p in &self.points {
            index.entry(p.label.as_str()).or_insert(p.value);
        }
        index
    }
}

impl FromIterator<LabeledPoint> for LabeledSeries {
    fn from_iter<I: IntoIterator<Item = LabeledPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReconciledDataset – union-aligned series
// ---------------------------------------------------------------------------

/// A named value sequence aligned 1:1 with a shared label axis.
/// `None` marks a label the source series did not contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Two series merged onto the sorted union of their labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledDataset {
    pub axis: Vec<String>,
    pub series: Vec<NamedSeries>,
}

// ---------------------------------------------------------------------------
// NormalizedComparison – intersection-aligned, min-max scaled
// ---------------------------------------------------------------------------

/// One series restricted to the shared axis, scaled into `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    pub normalized: Vec<f64>,
    pub original: Vec<f64>,
    /// Every original value is equal, so `normalized` is all zeros.
    pub constant: bool,
}

/// Both series restricted to the labels they share, each scaled on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedComparison {
    pub axis: Vec<String>,
    pub a: NormalizedSeries,
    pub b: NormalizedSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_uses_first_occurrence() {
        let s = LabeledSeries::from_pairs([("2019", 1.0), ("2020", 2.0), ("2019", 3.0)]);
        assert_eq!(s.lookup("2019"), Some(1.0));
        assert_eq!(s.first_match_index().get("2019"), Some(&1.0));
        assert_eq!(s.lookup("2021"), None);
    }

    #[test]
    fn series_serializes_as_plain_array() {
        let s = LabeledSeries::from_pairs([("2018", 12.5)]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"[{"label":"2018","value":12.5}]"#);
        let back: LabeledSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
