use std::collections::BTreeSet;

use crate::data::model::{LabeledSeries, NamedSeries, ReconciledDataset};

/// Align two series onto the sorted union of their labels.
///
/// Each output series holds the first value its source has for every axis
/// label, or `None` where the source lacks that label. Labels sort as plain
/// strings, which is chronological for four-digit years.
pub fn reconcile(
    a: &LabeledSeries,
    name_a: &str,
    b: &LabeledSeries,
    name_b: &str,
) -> ReconciledDataset {
    let axis: Vec<String> = a
        .labels()
        .chain(b.labels())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let series = [(a, name_a), (b, name_b)]
        .into_iter()
        .map(|(source, name)| align(source, name, &axis))
        .collect();

    ReconciledDataset { axis, series }
}

fn align(source: &LabeledSeries, name: &str, axis: &[String]) -> NamedSeries {
    let index = source.first_match_index();
    NamedSeries {
        name: name.to_string(),
        values: axis
            .iter()
            .map(|label| index.get(label.as_str()).copied())
            .collect(),
    }
}
