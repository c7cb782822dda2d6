//! Weather backend client
//!
//! This module fetches the raw payload from the weather backend and turns it
//! into a [`WeatherReport`]: the normalized daily records plus the current
//! conditions snapshot.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::payload::RawPayload;
use super::{
    build_daily_records, extract_current, CurrentWeatherData, DailyWeatherData, Strictness,
    StructuralMismatch,
};

/// Backend used when neither the config file nor the CLI names one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Path of the weather endpoint, relative to the base URL
const WEATHER_PATH: &str = "weather";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request could not complete
    #[error("Failed to fetch weather data")]
    RequestFailed(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Failed to fetch weather data")]
    Status(StatusCode),

    /// Response body is not valid JSON
    #[error("Failed to decode weather data")]
    ParseError(#[from] serde_json::Error),

    /// Response body is JSON but not an object
    #[error("Failed to decode weather data")]
    InvalidPayload(String),

    /// Payload shape is inconsistent (strict mode only)
    #[error("Inconsistent weather data: {0}")]
    Structural(#[from] StructuralMismatch),
}

/// Parameters of one weather request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherQuery {
    pub latitude: String,
    pub longitude: String,
    /// Date token the backend anchors the forecast window on
    #[serde(rename = "selectedDate")]
    pub selected_date: String,
    /// Display name of the place; not sent to the backend
    #[serde(skip)]
    pub location: String,
}

/// Everything derived from one successful response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeatherData,
    pub days: Vec<DailyWeatherData>,
}

impl WeatherReport {
    /// Normalizes the payload and builds the daily records and current snapshot
    pub fn from_payload(raw: RawPayload, strictness: Strictness) -> Result<Self, WeatherError> {
        let payload = raw.normalize();
        let days = build_daily_records(&payload, strictness)?;
        let current = extract_current(&payload, strictness)?;
        tracing::debug!(days = days.len(), "built weather report");
        Ok(Self { current, days })
    }

    /// Decodes a response body and builds the report from it
    pub fn from_json_str(body: &str, strictness: Strictness) -> Result<Self, WeatherError> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_payload(RawPayload::from_value(value)?, strictness)
    }

    /// Returns the record for the given date token, if present
    pub fn day(&self, date: &str) -> Option<&DailyWeatherData> {
        self.days.iter().find(|day| day.date == date)
    }
}

/// Client for the weather backend
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    strictness: Strictness,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherClient {
    /// Create a new WeatherClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            strictness: Strictness::Lenient,
        }
    }

    /// Create a new WeatherClient whose requests time out after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new().with_client(client))
    }

    /// Replace the underlying HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Point the client at another backend
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Choose how payload shape problems are handled
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Full URL of the weather endpoint, without query parameters
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), WEATHER_PATH)
    }

    /// Fetch and build the weather report for `query`
    ///
    /// # Returns
    /// * `Ok(WeatherReport)` - Records built from the response
    /// * `Err(WeatherError)` - If the request, status, decoding or (strict) shape check fails
    pub async fn fetch_report(&self, query: &WeatherQuery) -> Result<WeatherReport, WeatherError> {
        let url = self.endpoint();
        tracing::info!(
            %url,
            latitude = %query.latitude,
            longitude = %query.longitude,
            date = %query.selected_date,
            "requesting weather data"
        );

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "weather backend returned an error status");
            return Err(WeatherError::Status(status));
        }

        let text = response.text().await?;
        WeatherReport::from_json_str(&text, self.strictness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample response mixing flat arrays and keyed sub-objects
    const VALID_RESPONSE: &str = r#"{
        "currentTemp": 22.5,
        "currentAppTemp": 23.8,
        "currentWeatherCode": 2,
        "currentWindSpeed": 12.5,
        "dates": {"0": "2024-07-15"},
        "dailyWeatherCode": [2],
        "dailyMaxTemp": {"0": 24.8},
        "dailyMinTemp": [14.0],
        "dailySunrise": ["05:30"],
        "dailySunset": ["21:15"],
        "dailyUVIndex": [7.5],
        "hourlyTemp": [
            15.2, 14.8, 14.5, 14.2, 14.0, 14.5, 16.0, 18.5,
            20.0, 21.5, 22.5, 23.5, 24.0, 24.5, 24.8, 24.5,
            24.0, 23.0, 21.5, 20.0, 18.5, 17.5, 16.5, 15.8
        ],
        "hourlyAppTemp": [
            15.0, 14.5, 14.0, 13.8, 13.5, 14.0, 15.8, 18.9,
            20.5, 22.0, 23.2, 24.4, 25.0, 25.5, 25.9, 25.4,
            24.8, 23.6, 21.9, 20.2, 18.5, 17.4, 16.3, 15.5
        ],
        "hourlyPrecProb": [
            0, 0, 0, 0, 0, 5, 5, 5,
            10, 10, 10, 15, 15, 10, 10, 10,
            5, 5, 0, 0, 0, 0, 0, 0
        ],
        "hourlyWeatherCode": [
            0, 0, 0, 0, 0, 1, 1, 1,
            2, 2, 2, 3, 3, 2, 2, 2,
            1, 1, 0, 0, 0, 0, 0, 0
        ],
        "hourlyWindSpeed": [
            5.2, 4.8, 4.5, 4.2, 4.0, 5.5, 7.0, 9.5,
            11.0, 12.5, 13.5, 14.5, 15.0, 15.5, 15.8, 15.5,
            15.0, 14.0, 12.5, 11.0, 9.5, 8.5, 7.5, 6.8
        ]
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let report = WeatherReport::from_json_str(VALID_RESPONSE, Strictness::Strict)
            .expect("Failed to build report");

        assert!((report.current.temperature.unwrap() - 22.5).abs() < 0.01);
        assert!((report.current.apparent_temperature.unwrap() - 23.8).abs() < 0.01);
        assert_eq!(report.current.weather_code, Some(2));
        assert_eq!(report.days.len(), 1);

        let day = &report.days[0];
        assert_eq!(day.date, "2024-07-15");
        assert_eq!(day.daily_max_temp, Some(24.8));
        assert_eq!(day.daily_sunset.as_deref(), Some("21:15"));
        assert_eq!(day.hourly_temp.len(), 24);
        assert_eq!(day.hourly_temp[14], Some(24.8));
        assert_eq!(day.hourly_weather_code[11], Some(3));
    }

    #[test]
    fn test_day_lookup_by_date() {
        let report = WeatherReport::from_json_str(VALID_RESPONSE, Strictness::Lenient).unwrap();
        assert!(report.day("2024-07-15").is_some());
        assert!(report.day("2024-07-16").is_none());
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = WeatherReport::from_json_str("{ invalid json }", Strictness::Lenient);
        assert!(matches!(result, Err(WeatherError::ParseError(_))));
    }

    #[test]
    fn test_non_object_body_is_invalid_payload() {
        let result = WeatherReport::from_json_str("[1, 2, 3]", Strictness::Lenient);
        assert!(matches!(result, Err(WeatherError::InvalidPayload(_))));
    }

    #[test]
    fn test_empty_object_is_an_empty_report_when_lenient() {
        let report = WeatherReport::from_json_str("{}", Strictness::Lenient).unwrap();
        assert!(report.days.is_empty());
        assert_eq!(report.current, CurrentWeatherData::default());
    }

    #[test]
    fn test_strict_mode_surfaces_structural_error() {
        let body = r#"{"dates": ["2024-01-01"], "hourlyTemp": [1, 2, 3]}"#;
        let result = WeatherReport::from_json_str(body, Strictness::Strict);
        match result {
            Err(WeatherError::Structural(err)) => {
                assert!(err.to_string().contains("missing field"));
            }
            other => panic!("Expected Structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            WeatherError::Status(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            "Failed to fetch weather data"
        );
        assert_eq!(
            WeatherError::InvalidPayload("x".to_string()).to_string(),
            "Failed to decode weather data"
        );
        let mismatch = StructuralMismatch::LengthMismatch {
            field: "hourlyTemp".to_string(),
            expected: 48,
            actual: 30,
        };
        assert_eq!(
            WeatherError::from(mismatch).to_string(),
            "Inconsistent weather data: field 'hourlyTemp' has 30 entries, expected 48"
        );
    }

    #[test]
    fn test_weather_client_default() {
        let client = WeatherClient::default();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.strictness(), Strictness::Lenient);
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = WeatherClient::new().with_base_url("http://example.test:8080/");
        assert_eq!(client.endpoint(), "http://example.test:8080/weather");

        let client = WeatherClient::new().with_base_url("http://example.test/api");
        assert_eq!(client.endpoint(), "http://example.test/api/weather");
    }

    #[test]
    fn test_with_timeout_builds_client() {
        let client = WeatherClient::with_timeout(Duration::from_secs(3))
            .expect("client should build")
            .with_strictness(Strictness::Strict);
        assert_eq!(client.strictness(), Strictness::Strict);
    }
}
