use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::{generate_palette, Rgb};
use crate::config::PresentationConfig;
use crate::data::model::{NormalizedComparison, NormalizedSeries, ReconciledDataset};

// ---------------------------------------------------------------------------
// ChartSpec – render-ready bundle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Vertical axis a series is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisId {
    Left,
    Right,
}

/// One vertical axis. Open bounds scale to the data bound to the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub id: AxisId,
    pub title: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub draw_grid: bool,
}

/// A named series plus the display metadata the renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Series identity, e.g. `"depression"`.
    pub name: String,
    pub label: String,
    /// Aligned 1:1 with [`ChartSpec::axis`]; `None` is a gap.
    pub values: Vec<Option<f64>>,
    /// Pre-normalization values, present only in the normalized view.
    pub original_values: Option<Vec<f64>>,
    pub unit: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub axis_label: String,
    pub axis: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub y_axes: Vec<AxisSpec>,
    pub y_axis_assignment: BTreeMap<String, AxisId>,
    pub footer: Option<String>,
    pub note: String,
}

impl ChartSpec {
    pub fn axis_spec(&self, id: AxisId) -> Option<&AxisSpec> {
        self.y_axes.iter().find(|a| a.id == id)
    }

    /// Axis the named series is bound to; unassigned series use the left axis.
    pub fn axis_of(&self, series: &str) -> AxisId {
        self.y_axis_assignment
            .get(series)
            .copied()
            .unwrap_or(AxisId::Left)
    }

    /// Tooltip text for one point, `None` for gaps and out-of-range indices.
    pub fn tooltip(&self, series: usize, index: usize) -> Option<String> {
        let s = self.series.get(series)?;
        let value = (*s.values.get(index)?)?;
        match &s.original_values {
            Some(original) => {
                let orig = original.get(index)?;
                Some(format!(
                    "{}: {value:.1}% (normalized) - Original: {orig:.1}{}",
                    s.label, s.unit
                ))
            }
            None => Some(format!("{}: {value}{}", s.label, s.unit)),
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Dual-axis line chart over the union axis. The first series binds to the
/// left axis, every other series to the right one, which draws no grid.
pub fn assemble_combined(
    dataset: &ReconciledDataset,
    presentation: &PresentationConfig,
) -> ChartSpec {
    let colors = series_colors(presentation, dataset.series.iter().map(|s| s.name.as_str()));

    let mut series = Vec::with_capacity(dataset.series.len());
    let mut y_axes = Vec::new();
    let mut y_axis_assignment = BTreeMap::new();

    for (i, (named, color)) in dataset.series.iter().zip(colors).enumerate() {
        let style = presentation.style(&named.name);
        let axis = if i == 0 { AxisId::Left } else { AxisId::Right };

        if !y_axes.iter().any(|a: &AxisSpec| a.id == axis) {
            y_axes.push(AxisSpec {
                id: axis,
                title: style
                    .map(|s| s.axis_title.clone())
                    .unwrap_or_else(|| named.name.clone()),
                min: Some(0.0),
                max: None,
                draw_grid: axis == AxisId::Left,
            });
        }
        y_axis_assignment.insert(named.name.clone(), axis);

        series.push(ChartSeries {
            name: named.name.clone(),
            label: style
                .map(|s| s.label.clone())
                .unwrap_or_else(|| named.name.clone()),
            values: named.values.clone(),
            original_values: None,
            unit: presentation.unit(&named.name).to_string(),
            color,
        });
    }

    ChartSpec {
        kind: ChartKind::Line,
        title: presentation.combined_title.clone(),
        axis_label: presentation.axis_label.clone(),
        axis: dataset.axis.clone(),
        series,
        y_axes,
        y_axis_assignment,
        footer: None,
        note: presentation.combined_note.clone(),
    }
}

/// Grouped bar chart over the intersection axis, one shared axis fixed to
/// `[0, 100]`. `names` are the identities of `comparison.a` and `.b`.
pub fn assemble_normalized(
    comparison: &NormalizedComparison,
    names: [&str; 2],
    presentation: &PresentationConfig,
) -> ChartSpec {
    let colors = series_colors(presentation, names.iter().copied());
    let parts: [&NormalizedSeries; 2] = [&comparison.a, &comparison.b];

    let series: Vec<ChartSeries> = names
        .iter()
        .zip(parts)
        .zip(colors)
        .map(|((&name, part), color)| ChartSeries {
            name: name.to_string(),
            label: presentation
                .style(name)
                .map(|s| s.normalized_label.clone())
                .unwrap_or_else(|| name.to_string()),
            values: part.normalized.iter().copied().map(Some).collect(),
            original_values: Some(part.original.clone()),
            unit: presentation.unit(name).to_string(),
            color,
        })
        .collect();

    let y_axis_assignment = names
        .iter()
        .map(|&name| (name.to_string(), AxisId::Left))
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        title: presentation.normalized_title.clone(),
        axis_label: presentation.axis_label.clone(),
        axis: comparison.axis.clone(),
        series,
        y_axes: vec![AxisSpec {
            id: AxisId::Left,
            title: presentation.normalized_axis_title.clone(),
            min: Some(0.0),
            max: Some(100.0),
            draw_grid: true,
        }],
        y_axis_assignment,
        footer: Some(presentation.normalized_footer.clone()),
        note: presentation.normalized_note.clone(),
    }
}

/// Configured colour per series, generated palette where none is set.
fn series_colors<'a>(
    presentation: &PresentationConfig,
    names: impl ExactSizeIterator<Item = &'a str>,
) -> Vec<Rgb> {
    let palette = generate_palette(names.len());
    names
        .zip(palette)
        .map(|(name, generated)| {
            presentation
                .style(name)
                .and_then(|s| s.color)
                .unwrap_or(generated)
        })
        .collect()
}
