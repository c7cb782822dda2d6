//! The charts shown for a selected day

use serde::Serialize;

use super::axis::{hour_labels, TimeAxis};
use super::dataset::{assemble_datasets, ChartDataset, Series, SeriesDescriptor, SeriesStyle};
use super::ChartError;
use crate::data::DailyWeatherData;

/// Title of the shared x-axis
pub const X_AXIS_TITLE: &str = "Time (HH:mm)";

/// Which of a day's hourly charts to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Temperature,
    Precipitation,
    Wind,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::Temperature,
        ChartKind::Precipitation,
        ChartKind::Wind,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Temperature => "Temperature",
            ChartKind::Precipitation => "Precipitation",
            ChartKind::Wind => "Wind",
        }
    }

    /// The chart after this one, wrapping around
    pub fn next(self) -> Self {
        match self {
            ChartKind::Temperature => ChartKind::Precipitation,
            ChartKind::Precipitation => ChartKind::Wind,
            ChartKind::Wind => ChartKind::Temperature,
        }
    }

    /// Series of `day` this chart plots, in draw order
    pub fn series(self, day: &DailyWeatherData) -> Vec<Series> {
        match self {
            ChartKind::Temperature => vec![
                Series::new(
                    SeriesDescriptor::new("Temperature", "°C", SeriesStyle::line("#e4572e")),
                    day.hourly_temp.clone(),
                ),
                Series::new(
                    SeriesDescriptor::new(
                        "Feels like",
                        "°C",
                        SeriesStyle::dashed("#f3a712", vec![5, 5]),
                    ),
                    day.hourly_app_temp.clone(),
                ),
            ],
            ChartKind::Precipitation => vec![Series::new(
                SeriesDescriptor::new(
                    "Precipitation probability",
                    "%",
                    SeriesStyle::bar("#4ea8de"),
                ),
                day.hourly_prec_prob.clone(),
            )],
            ChartKind::Wind => vec![Series::new(
                SeriesDescriptor::new("Wind speed", "km/h", SeriesStyle::line("#76c893")),
                day.hourly_wind_speed.clone(),
            )],
        }
    }
}

/// A complete chart: datasets plus axis titles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub date: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub datasets: Vec<ChartDataset>,
}

/// Builds the `kind` chart for one day on the shared hour label domain
pub fn build_chart(
    day: &DailyWeatherData,
    kind: ChartKind,
    axis: &TimeAxis,
) -> Result<ChartSpec, ChartError> {
    let datasets = assemble_datasets(&kind.series(day), hour_labels(), axis)?;
    Ok(ChartSpec {
        kind,
        date: day.date.clone(),
        x_axis_title: X_AXIS_TITLE.to_string(),
        y_axis_title: y_axis_title(&datasets),
        datasets,
    })
}

/// Builds every chart for one day
pub fn build_day_charts(
    day: &DailyWeatherData,
    axis: &TimeAxis,
) -> Result<Vec<ChartSpec>, ChartError> {
    ChartKind::ALL
        .iter()
        .map(|&kind| build_chart(day, kind, axis))
        .collect()
}

/// Y-axis title from the first dataset: `"<label> (<unit>)"`
pub fn y_axis_title(datasets: &[ChartDataset]) -> String {
    datasets
        .first()
        .map(|d| format!("{} ({})", d.label, d.unit))
        .unwrap_or_default()
}
