//! Chart-ready datasets
//!
//! Reshapes a day's hourly arrays into datasets on a shared intra-day time axis.
//! Renderers only consume [`ChartSpec`]/[`ChartDataset`] and never see the
//! payload or the daily records.

pub mod axis;
pub mod dataset;
pub mod presets;

pub use axis::{hour_labels, TimeAxis};
pub use dataset::{
    assemble_datasets, round_one_decimal, tooltip_label, ChartDataset, ChartPoint, Series,
    SeriesDescriptor, SeriesStyle,
};
pub use presets::{build_chart, build_day_charts, ChartKind, ChartSpec};

use thiserror::Error;

/// Errors raised while building chart datasets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// A label is not of the form `HH:MM` with integer parts
    #[error("Invalid hour label: '{0}'")]
    InvalidHourLabel(String),
}
