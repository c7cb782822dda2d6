//! Command-line interface parsing for Skyview
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the initial weather query.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use thiserror::Error;

use crate::data::WeatherQuery;

/// Date format of the `--date` argument and of the `selectedDate` query parameter
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The date is not a valid YYYY-MM-DD calendar date
    #[error("Invalid date: '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A coordinate is not a number within its valid range
    #[error("Invalid {name}: '{value}'. Expected a number between -{limit} and {limit}")]
    InvalidCoordinate {
        name: &'static str,
        value: String,
        limit: u8,
    },
}

/// Skyview - hourly weather charts for a point location
#[derive(Parser, Debug)]
#[command(name = "skyview")]
#[command(about = "Hourly weather charts for a point location")]
#[command(version)]
pub struct Cli {
    /// Latitude in degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: String,

    /// Longitude in degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: String,

    /// Forecast date (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Display name of the location, defaults to "latitude,longitude"
    #[arg(long)]
    pub location: Option<String>,

    /// Print the report and the day's chart datasets as JSON instead of starting the UI
    #[arg(long)]
    pub json: bool,

    /// Treat inconsistent payload shapes as errors
    #[arg(long)]
    pub strict: bool,

    /// Base URL of the weather backend
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Log filter, e.g. "info" or "skyview=debug"
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Path to a config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// The first query to run
    pub query: WeatherQuery,
    /// Print JSON and exit instead of running the UI
    pub json: bool,
}

/// Parses a `--date` argument.
///
/// # Returns
/// * `Ok(NaiveDate)` if the string is a valid YYYY-MM-DD date
/// * `Err(CliError::InvalidDate)` otherwise
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Checks that a coordinate argument is a number within `[-limit, limit]`
pub fn parse_coordinate_arg(name: &'static str, s: &str, limit: u8) -> Result<f64, CliError> {
    let invalid = || CliError::InvalidCoordinate {
        name,
        value: s.to_string(),
        limit,
    };
    let value: f64 = s.trim().parse().map_err(|_| invalid())?;
    let limit = f64::from(limit);
    if !(-limit..=limit).contains(&value) {
        return Err(invalid());
    }
    Ok(value)
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// `today` is used when no `--date` is given.
    pub fn from_cli(cli: &Cli, today: NaiveDate) -> Result<Self, CliError> {
        parse_coordinate_arg("latitude", &cli.latitude, 90)?;
        parse_coordinate_arg("longitude", &cli.longitude, 180)?;

        let date = match &cli.date {
            Some(date) => parse_date_arg(date)?,
            None => today,
        };

        let latitude = cli.latitude.trim().to_string();
        let longitude = cli.longitude.trim().to_string();
        let location = cli
            .location
            .clone()
            .unwrap_or_else(|| format!("{},{}", latitude, longitude));

        Ok(StartupConfig {
            query: WeatherQuery {
                latitude,
                longitude,
                selected_date: date.format(DATE_FORMAT).to_string(),
                location,
            },
            json: cli.json,
        })
    }
}
