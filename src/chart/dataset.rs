//! Chart dataset assembly
//!
//! Turns numeric series plus the shared hour labels into renderable datasets:
//! every value rounded to one decimal, paired with its synthesized timestamp,
//! and tagged with the series' own label, unit and style.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::axis::TimeAxis;
use super::ChartError;

/// Border width of every line series
pub const LINE_BORDER_WIDTH: u16 = 1;

/// How one series is drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SeriesStyle {
    /// Line series; an empty dash pattern draws a solid line
    Line { color: String, dash: Vec<u16> },
    /// Bar series
    Bar { fill: String },
}

impl SeriesStyle {
    pub fn line(color: impl Into<String>) -> Self {
        SeriesStyle::Line {
            color: color.into(),
            dash: Vec::new(),
        }
    }

    pub fn dashed(color: impl Into<String>, dash: Vec<u16>) -> Self {
        SeriesStyle::Line {
            color: color.into(),
            dash,
        }
    }

    pub fn bar(fill: impl Into<String>) -> Self {
        SeriesStyle::Bar { fill: fill.into() }
    }

    /// The color the series is painted with
    pub fn color(&self) -> &str {
        match self {
            SeriesStyle::Line { color, .. } => color,
            SeriesStyle::Bar { fill } => fill,
        }
    }
}

/// Display metadata for one series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesDescriptor {
    pub label: String,
    pub unit: String,
    pub style: SeriesStyle,
}

impl SeriesDescriptor {
    pub fn new(label: impl Into<String>, unit: impl Into<String>, style: SeriesStyle) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
            style,
        }
    }
}

/// A series of values together with how to display it
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub descriptor: SeriesDescriptor,
    /// One value per hour label; missing trailing values are allowed
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(descriptor: SeriesDescriptor, values: Vec<Option<f64>>) -> Self {
        Self { descriptor, values }
    }
}

/// One point of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: NaiveDateTime,
    /// Rounded value, `None` where the series has no value for this hour
    pub y: Option<f64>,
}

/// A styled, time-tagged, rounded series ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub unit: String,
    pub style: SeriesStyle,
    pub border_width: u16,
    pub points: Vec<ChartPoint>,
}

/// Builds one dataset per series, in input order.
///
/// Each series is paired index-by-index with `labels`; a series shorter than
/// the labels yields points without a value for the remaining hours.
pub fn assemble_datasets(
    series: &[Series],
    labels: &[String],
    axis: &TimeAxis,
) -> Result<Vec<ChartDataset>, ChartError> {
    let timestamps = labels
        .iter()
        .map(|label| axis.timestamp(label))
        .collect::<Result<Vec<_>, _>>()?;

    let datasets = series
        .iter()
        .map(|series| {
            let points = timestamps
                .iter()
                .enumerate()
                .map(|(i, &x)| ChartPoint {
                    x,
                    y: series.values.get(i).copied().flatten().map(round_one_decimal),
                })
                .collect();

            let descriptor = &series.descriptor;
            ChartDataset {
                label: descriptor.label.clone(),
                unit: descriptor.unit.clone(),
                style: descriptor.style.clone(),
                border_width: match descriptor.style {
                    SeriesStyle::Line { .. } => LINE_BORDER_WIDTH,
                    SeriesStyle::Bar { .. } => 0,
                },
                points,
            }
        })
        .collect();

    Ok(datasets)
}

/// Rounds to one decimal place, half away from zero.
///
/// The value is scaled by ten before rounding, so `7.849 -> 7.8`,
/// `-0.05 -> -0.1` and `-0.04 -> -0.0`. Non-finite values pass through.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 10.0).round() / 10.0
}

/// Formats a point value for display; negative zero shows as `0`
pub fn format_value(value: f64) -> String {
    format!("{}", value + 0.0)
}

/// Tooltip text for one point: `"<label>: <value><unit>"`.
///
/// Resolved from the datasets at display time; `None` if either index is out of
/// range or the point has no value.
pub fn tooltip_label(
    datasets: &[ChartDataset],
    dataset_index: usize,
    point_index: usize,
) -> Option<String> {
    let dataset = datasets.get(dataset_index)?;
    let value = dataset.points.get(point_index)?.y?;
    Some(format!(
        "{}: {}{}",
        dataset.label,
        format_value(value),
        dataset.unit
    ))
}
