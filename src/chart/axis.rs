//! Intra-day time axis
//!
//! Every hourly chart shares the same x-axis domain: the 24 labels
//! `"00:00"` .. `"23:00"`. [`TimeAxis`] turns such a label into a concrete
//! timestamp on an explicit anchor date, so the axis is reproducible in tests
//! and never depends on the wall clock by itself.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use super::ChartError;
use crate::data::HOURS_PER_DAY;

static HOUR_LABELS: LazyLock<Vec<String>> = LazyLock::new(|| {
    (0..HOURS_PER_DAY)
        .map(|hour| format!("{:02}:00", hour))
        .collect()
});

/// The shared hour label domain, `"00:00"` through `"23:00"`
pub fn hour_labels() -> &'static [String] {
    &HOUR_LABELS
}

/// Maps `HH:MM` labels onto timestamps of one anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    anchor: NaiveDate,
}

impl TimeAxis {
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    /// Axis anchored on the local calendar date
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Converts an `HH:MM` label into a timestamp on the anchor date.
    ///
    /// Hour and minute are only checked for being integers; values past the end
    /// of a day roll over into the following days. Seconds and sub-seconds are
    /// always zero.
    pub fn timestamp(&self, label: &str) -> Result<NaiveDateTime, ChartError> {
        let invalid = || ChartError::InvalidHourLabel(label.to_string());

        let mut parts = label.split(':');
        let hours: i64 = parts
            .next()
            .and_then(|h| h.trim().parse().ok())
            .ok_or_else(invalid)?;
        let minutes: i64 = parts
            .next()
            .and_then(|m| m.trim().parse().ok())
            .ok_or_else(invalid)?;

        let offset = TimeDelta::try_hours(hours)
            .zip(TimeDelta::try_minutes(minutes))
            .and_then(|(h, m)| h.checked_add(&m))
            .ok_or_else(invalid)?;

        self.anchor
            .and_time(NaiveTime::MIN)
            .checked_add_signed(offset)
            .ok_or_else(invalid)
    }

    /// Position of `timestamp` on the axis, in hours since the anchor's midnight
    pub fn position(&self, timestamp: NaiveDateTime) -> f64 {
        let since = timestamp - self.anchor.and_time(NaiveTime::MIN);
        since.num_seconds() as f64 / 3600.0
    }
}
