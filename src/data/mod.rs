//! Core data models for Skyview
//!
//! This module contains the records produced from a weather response and the
//! pipeline that builds them: payload normalization, daily slicing and the
//! current-conditions snapshot.

pub mod current;
pub mod daily;
pub mod payload;
pub mod weather;

pub use current::extract_current;
pub use daily::build_daily_records;
pub use payload::{Field, NormalizedPayload, RawField, RawPayload};
pub use weather::{WeatherClient, WeatherError, WeatherQuery, WeatherReport};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Number of hourly entries belonging to one calendar day
pub const HOURS_PER_DAY: usize = 24;

/// Payload field names sent by the weather backend
pub mod fields {
    pub const DATES: &str = "dates";

    pub const DAILY_WEATHER_CODE: &str = "dailyWeatherCode";
    pub const DAILY_MAX_TEMP: &str = "dailyMaxTemp";
    pub const DAILY_MIN_TEMP: &str = "dailyMinTemp";
    pub const DAILY_SUNRISE: &str = "dailySunrise";
    pub const DAILY_SUNSET: &str = "dailySunset";
    pub const DAILY_UV_INDEX: &str = "dailyUVIndex";

    pub const HOURLY_TEMP: &str = "hourlyTemp";
    pub const HOURLY_APP_TEMP: &str = "hourlyAppTemp";
    pub const HOURLY_PREC_PROB: &str = "hourlyPrecProb";
    pub const HOURLY_WEATHER_CODE: &str = "hourlyWeatherCode";
    pub const HOURLY_WIND_SPEED: &str = "hourlyWindSpeed";

    pub const CURRENT_TEMP: &str = "currentTemp";
    pub const CURRENT_APP_TEMP: &str = "currentAppTemp";
    pub const CURRENT_WEATHER_CODE: &str = "currentWeatherCode";
    pub const CURRENT_WIND_SPEED: &str = "currentWindSpeed";

    pub const DAILY: [&str; 6] = [
        DAILY_WEATHER_CODE,
        DAILY_MAX_TEMP,
        DAILY_MIN_TEMP,
        DAILY_SUNRISE,
        DAILY_SUNSET,
        DAILY_UV_INDEX,
    ];

    pub const HOURLY: [&str; 5] = [
        HOURLY_TEMP,
        HOURLY_APP_TEMP,
        HOURLY_PREC_PROB,
        HOURLY_WEATHER_CODE,
        HOURLY_WIND_SPEED,
    ];

    pub const CURRENT: [&str; 4] = [
        CURRENT_TEMP,
        CURRENT_APP_TEMP,
        CURRENT_WEATHER_CODE,
        CURRENT_WIND_SPEED,
    ];
}

/// How the record builders react to a payload whose shape doesn't line up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Short or missing fields degrade to short or absent data
    #[default]
    Lenient,
    /// Short or missing fields are reported as [`StructuralMismatch`]
    Strict,
}

impl Strictness {
    pub fn from_flag(strict: bool) -> Self {
        if strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }
}

/// A payload shape problem, only raised in [`Strictness::Strict`] mode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralMismatch {
    /// A sequence field does not have the length implied by `dates`
    #[error("field '{field}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A required field is absent or has the wrong shape
    #[error("missing field '{0}'")]
    MissingField(String),
}

/// One calendar day: daily scalars plus the day's 24-hour window.
///
/// Hourly vectors hold up to [`HOURS_PER_DAY`] entries; trailing days of a
/// short payload may carry fewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeatherData {
    /// Date token as sent by the backend (e.g. "2024-07-15")
    pub date: String,
    pub hourly_temp: Vec<Option<f64>>,
    pub hourly_app_temp: Vec<Option<f64>>,
    /// Precipitation probability in percent
    pub hourly_prec_prob: Vec<Option<f64>>,
    pub hourly_weather_code: Vec<Option<u8>>,
    pub hourly_wind_speed: Vec<Option<f64>>,
    pub daily_weather_code: Option<u8>,
    pub daily_max_temp: Option<f64>,
    pub daily_min_temp: Option<f64>,
    /// Sunrise token as sent by the backend
    pub daily_sunrise: Option<String>,
    /// Sunset token as sent by the backend
    pub daily_sunset: Option<String>,
    pub daily_uv_index: Option<f64>,
}

/// Current conditions, independent of the daily list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherData {
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub weather_code: Option<u8>,
    pub wind_speed: Option<f64>,
}

impl CurrentWeatherData {
    pub fn condition(&self) -> Option<WeatherCondition> {
        self.weather_code.map(weather_code_to_condition)
    }
}

/// Types of weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Showers,
    Thunderstorm,
    Snow,
    Fog,
}

impl WeatherCondition {
    pub fn label(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Showers => "Freezing rain",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Fog => "Fog",
        }
    }
}

/// Map WMO weather code to WeatherCondition enum
///
/// Weather codes from WMO (World Meteorological Organization):
/// - 0: Clear sky
/// - 1-3: Partly cloudy
/// - 45, 48: Fog
/// - 51-55: Drizzle
/// - 56-57: Freezing drizzle
/// - 61-65: Rain
/// - 66-67: Freezing rain
/// - 71-77: Snow
/// - 80-82: Rain showers
/// - 85-86: Snow showers
/// - 95-99: Thunderstorm
pub fn weather_code_to_condition(code: u8) -> WeatherCondition {
    match code {
        0 => WeatherCondition::Clear,
        1..=3 => WeatherCondition::PartlyCloudy,
        45 | 48 => WeatherCondition::Fog,
        51..=55 | 61..=65 | 80..=82 => WeatherCondition::Rain,
        56..=57 | 66..=67 => WeatherCondition::Showers,
        71..=77 | 85..=86 => WeatherCondition::Snow,
        95..=99 => WeatherCondition::Thunderstorm,
        _ => WeatherCondition::Cloudy, // Default for unknown codes
    }
}

/// Reads a JSON number; anything else is treated as absent
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Reads a JSON number as a WMO code (0-255)
pub(crate) fn as_code(value: &Value) -> Option<u8> {
    let code = value.as_f64()?;
    (code.fract() == 0.0 && (0.0..=255.0).contains(&code)).then_some(code as u8)
}

/// Reads a JSON value as a display token: strings verbatim, numbers and booleans
/// in their JSON text form, `null` and containers as absent
pub(crate) fn as_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
