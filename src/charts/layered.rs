//! Figures that combine several trace types on one canvas.
//!
//! plotlars builds one trace kind per plot, so histograms with a density curve
//! and bar+line charts on two y axes are assembled with plotly directly.

use crate::types::chart_style::ChartStyle;
use plotly::color::Rgb;
use plotly::common::{AxisSide, Font, Line, Marker, Mode, Title};
use plotly::histogram::HistNorm;
use plotly::layout::{Axis, Legend};
use plotly::{Bar, Histogram, Layout, Plot, Scatter};
use polars::prelude::*;

/// Grid points of a density curve.
pub(crate) const DENSITY_POINTS: usize = 200;

/// Bandwidths added on both sides of the data range of a density curve.
const DENSITY_CUT: f64 = 3.0;

/// Axis labels of a layered figure.
pub(crate) struct Labels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

/// A density curve sampled on an even grid.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DensityCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Gaussian kernel density estimate of the present values, with Scott's bandwidth.
///
/// `None` when fewer than two values are present or all of them are equal.
pub(crate) fn gaussian_kde(
    values: &Float64Chunked,
    points: usize,
) -> PolarsResult<Option<DensityCurve>> {
    let present: Vec<f64> = values.into_iter().flatten().collect();
    let n = present.len();
    let (Some(std), Some(min), Some(max)) = (values.std(1), values.min(), values.max()) else {
        return Ok(None);
    };
    if n < 2 || std <= 0.0 || points < 2 {
        return Ok(None);
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let start = min - DENSITY_CUT * bandwidth;
    let step = (max - min + 2.0 * DENSITY_CUT * bandwidth) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let x: Vec<f64> = (0..points).map(|i| start + step * i as f64).collect();
    let y = x
        .iter()
        .map(|at| {
            let sum: f64 = present
                .iter()
                .map(|v| (-0.5 * ((at - v) / bandwidth).powi(2)).exp())
                .sum();
            sum * norm
        })
        .collect();
    Ok(Some(DensityCurve { x, y }))
}

fn rgb(color: plotlars::Rgb) -> Rgb {
    Rgb::new(color.0, color.1, color.2)
}

fn title(style: ChartStyle, text: &str, size: usize) -> Title {
    Title::with_text(text).font(Font::new().size(size).color(rgb(style.text_color())))
}

fn axis(style: ChartStyle, text: &str) -> Axis {
    Axis::new()
        .title(title(style, text, 14))
        .show_grid(style.show_grid())
        .color(rgb(style.text_color()))
}

fn layout(style: ChartStyle, labels: &Labels) -> Layout {
    Layout::new()
        .title(title(style, labels.title, 18))
        .x_axis(axis(style, labels.x))
        .y_axis(axis(style, labels.y))
        .legend(Legend::new().x(0.05).y(0.95))
}

/// Histogram normalized to a probability density, with `density` drawn over it.
pub(crate) fn density_histogram(
    values: Vec<f64>,
    density: Option<DensityCurve>,
    style: ChartStyle,
    labels: &Labels,
) -> Plot {
    let palette = style.palette();
    let mut plot = Plot::new();
    plot.add_trace(
        Histogram::new(values)
            .name("Observed")
            .hist_norm(HistNorm::ProbabilityDensity)
            .opacity(0.75)
            .marker(Marker::new().color(rgb(palette[0]))),
    );
    if let Some(curve) = density {
        plot.add_trace(
            Scatter::new(curve.x, curve.y)
                .name("Density")
                .mode(Mode::Lines)
                .line(Line::new().color(rgb(palette[3])).width(2.0)),
        );
    }
    plot.set_layout(layout(style, labels));
    plot
}

/// Histogram of raw counts over `bins` bins.
pub(crate) fn count_histogram(
    values: Vec<f64>,
    bins: usize,
    color_index: usize,
    style: ChartStyle,
    labels: &Labels,
) -> Plot {
    let palette = style.palette();
    let color = palette[color_index % palette.len()];
    let mut plot = Plot::new();
    plot.add_trace(
        Histogram::new(values)
            .name(labels.x)
            .n_bins_x(bins)
            .marker(Marker::new().color(rgb(color))),
    );
    plot.set_layout(layout(style, labels).show_legend(false));
    plot
}

/// Bars on a right-hand axis under a line on the left axis, sharing a category x axis.
pub(crate) fn bars_under_line(
    categories: Vec<String>,
    line: (&str, Vec<Option<f64>>),
    bars: (&str, Vec<f64>),
    bar_axis_title: &str,
    style: ChartStyle,
    labels: &Labels,
) -> Plot {
    let palette = style.palette();
    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(categories.clone(), bars.1)
            .name(bars.0)
            .y_axis("y2")
            .opacity(0.6)
            .marker(Marker::new().color(rgb(palette[1]))),
    );
    plot.add_trace(
        Scatter::new(categories, line.1)
            .name(line.0)
            .mode(Mode::LinesMarkers)
            .line(Line::new().color(rgb(palette[0])).width(2.5)),
    );
    plot.set_layout(
        layout(style, labels).y_axis2(
            axis(style, bar_axis_title)
                .overlaying("y")
                .side(AxisSide::Right)
                .show_grid(false),
        ),
    );
    plot
}
