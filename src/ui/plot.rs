use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    AxisHints, Bar, BarChart, GridMark, HPlacement, Legend, Line, Plot, PlotPoint, PlotPoints,
    Points,
};

use crate::color::Rgb;
use crate::pipeline::assemble::{AxisId, ChartKind, ChartSpec};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected chart in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState) {
    let chart = match state.current_chart() {
        Ok(chart) => chart,
        Err(e) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(e.advisory());
            });
            return;
        }
    };

    match chart.kind {
        ChartKind::Line => line_chart(ui, chart),
        ChartKind::Bar => bar_chart(ui, chart),
    }
}

/// Dual-axis line chart. Right-axis series are drawn in left-axis
/// coordinates; the right axis relabels the same grid marks, so it adds no
/// gridlines of its own.
fn line_chart(ui: &mut Ui, chart: &ChartSpec) {
    let Some(primary) = AxisRange::resolve(chart, AxisId::Left) else {
        return;
    };
    let secondary = AxisRange::resolve(chart, AxisId::Right)
        .map(|secondary| SecondaryMap { primary, secondary });

    let mut y_axes = vec![AxisHints::new_y().label(axis_title(chart, AxisId::Left))];
    if let Some(map) = secondary {
        y_axes.push(
            AxisHints::new_y()
                .label(axis_title(chart, AxisId::Right))
                .placement(HPlacement::Right)
                .formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                    tick_label(map.from_plot(mark.value))
                }),
        );
    }

    let axis = chart.axis.clone();
    let hover = chart.clone();

    Plot::new("combined_chart")
        .legend(Legend::default())
        .x_axis_label(chart.axis_label.clone())
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&axis, mark.value)
        })
        .custom_y_axes(y_axes)
        .include_x(-0.5)
        .include_x(chart.axis.len() as f64 - 0.5)
        .include_y(primary.min)
        .include_y(primary.max)
        .label_formatter(move |name: &str, point: &PlotPoint| {
            let index = point.x.round().max(0.0) as usize;
            hover
                .series
                .iter()
                .position(|s| s.label == name)
                .and_then(|si| hover.tooltip(si, index))
                .map(|tip| format!("{}\n{tip}", category_label(&hover.axis, point.x.round())))
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for s in &chart.series {
                let color = to_color32(s.color);
                let plotted: Vec<Option<f64>> = match (chart.axis_of(&s.name), secondary) {
                    (AxisId::Right, Some(map)) => {
                        s.values.iter().map(|v| v.map(|v| map.to_plot(v))).collect()
                    }
                    _ => s.values.clone(),
                };

                for run in segments(&plotted) {
                    let line_points: PlotPoints = run.iter().copied().collect();
                    plot_ui.line(Line::new(line_points).name(&s.label).color(color).width(2.0));

                    let markers: PlotPoints = run.into_iter().collect();
                    plot_ui.points(Points::new(markers).name(&s.label).color(color).radius(3.0));
                }
            }
        });
}

/// Grouped bars on one shared axis.
fn bar_chart(ui: &mut Ui, chart: &ChartSpec) {
    let n = chart.series.len().max(1) as f64;
    let width = 0.8 / n;
    let axis = chart.axis.clone();

    let mut plot = Plot::new("normalized_chart")
        .legend(Legend::default())
        .x_axis_label(chart.axis_label.clone())
        .y_axis_label(axis_title(chart, AxisId::Left))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&axis, mark.value)
        })
        .include_x(-0.5)
        .include_x(chart.axis.len() as f64 - 0.5);
    if let Some(range) = AxisRange::resolve(chart, AxisId::Left) {
        plot = plot.include_y(range.min).include_y(range.max);
    }

    plot.show(ui, |plot_ui| {
        for (si, s) in chart.series.iter().enumerate() {
            let offset = (si as f64 - (n - 1.0) / 2.0) * width;
            let bars: Vec<Bar> = s
                .values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| {
                    let v = (*v)?;
                    let bar = Bar::new(i as f64 + offset, v).width(width);
                    Some(match chart.tooltip(si, i) {
                        Some(tip) => bar.name(tip),
                        None => bar,
                    })
                })
                .collect();

            plot_ui.bar_chart(BarChart::new(bars).name(&s.label).color(to_color32(s.color)));
        }
    });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

fn axis_title(chart: &ChartSpec, id: AxisId) -> String {
    chart
        .axis_spec(id)
        .map(|a| a.title.clone())
        .unwrap_or_default()
}

/// Axis label for an integer category position, blank between categories.
fn category_label(axis: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    axis.get(i as usize).cloned().unwrap_or_default()
}

fn tick_label(v: f64) -> String {
    format!("{}", (v * 100.0).round() / 100.0)
}

/// Runs of consecutive present values as `[index, value]` points.
/// A gap ends the run, so lines are never drawn across missing labels.
fn segments(values: &[Option<f64>]) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, v) in values.iter().enumerate() {
        match v {
            Some(v) => current.push([i as f64, *v]),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Resolved vertical range of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisRange {
    min: f64,
    max: f64,
}

impl AxisRange {
    /// Configured bounds; open ends close over the data bound to `id`.
    fn resolve(chart: &ChartSpec, id: AxisId) -> Option<Self> {
        let spec = chart.axis_spec(id)?;
        let (lo, hi) = chart
            .series
            .iter()
            .filter(|s| chart.axis_of(&s.name) == id)
            .flat_map(|s| s.values.iter().flatten().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        let min = spec.min.unwrap_or(if lo.is_finite() { lo } else { 0.0 });
        let max = spec.max.unwrap_or(if hi.is_finite() { hi } else { min + 1.0 });
        Some(Self {
            min,
            max: if max > min { max } else { min + 1.0 },
        })
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Linear map between the secondary axis domain and plot (primary) space.
#[derive(Debug, Clone, Copy)]
struct SecondaryMap {
    primary: AxisRange,
    secondary: AxisRange,
}

impl SecondaryMap {
    fn to_plot(&self, v: f64) -> f64 {
        self.primary.min + (v - self.secondary.min) / self.secondary.span() * self.primary.span()
    }

    fn from_plot(&self, y: f64) -> f64 {
        self.secondary.min + (y - self.primary.min) / self.primary.span() * self.secondary.span()
    }
}
