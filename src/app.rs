//! Application state management for Skyview
//!
//! This module contains the fetch-cycle state machine, keyboard handling and
//! the selection state (day, chart, hour cursor) of the dashboard.
//!
//! Every fetch gets a generation number. Requesting a new fetch bumps the
//! generation, so a response that belongs to a superseded request is dropped
//! instead of overwriting the state of the newer one.

use chrono::{DateTime, Duration, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};

use crate::chart::{build_chart, ChartError, ChartKind, ChartSpec, TimeAxis};
use crate::cli::{parse_date_arg, DATE_FORMAT};
use crate::data::{DailyWeatherData, WeatherError, WeatherQuery, WeatherReport, HOURS_PER_DAY};

/// State of the current fetch cycle
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    /// Nothing requested yet
    Idle,
    /// A request is in flight; any previous data has been discarded
    Loading,
    /// The latest request succeeded
    Success(WeatherReport),
    /// The latest request failed; holds the user-facing message
    Error(String),
}

/// Identifies one fetch request and the query it was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: WeatherQuery,
}

/// Main application struct managing state and data
pub struct App {
    /// Parameters of the current fetch cycle
    pub query: WeatherQuery,
    /// Current fetch state
    pub state: FetchState,
    /// Index of the selected day in the report
    pub selected_day: usize,
    /// Chart shown for the selected day
    pub chart_kind: ChartKind,
    /// Hour whose values are shown below the chart
    pub hour_cursor: usize,
    /// Time axis the charts are drawn on
    pub axis: TimeAxis,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Timestamp of the last successful fetch
    pub last_update: Option<DateTime<Local>>,
    /// Generation of the newest request
    generation: u64,
    /// Set when a fetch was requested but not yet handed out
    pending_fetch: bool,
}

impl App {
    /// Creates a new App for `query`, with the first fetch already requested
    pub fn new(query: WeatherQuery) -> Self {
        let mut app = Self {
            query,
            state: FetchState::Idle,
            selected_day: 0,
            chart_kind: ChartKind::Temperature,
            hour_cursor: 0,
            axis: TimeAxis::today(),
            should_quit: false,
            show_help: false,
            last_update: None,
            generation: 0,
            pending_fetch: false,
        };
        app.request_fetch();
        app
    }

    /// Generation of the newest request
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Restarts the fetch cycle: invalidates any in-flight request, drops the
    /// displayed data and moves to `Loading`
    pub fn request_fetch(&mut self) {
        self.generation += 1;
        self.state = FetchState::Loading;
        self.pending_fetch = true;
        tracing::debug!(generation = self.generation, "fetch requested");
    }

    /// Hands out the pending fetch, if any, exactly once
    pub fn take_pending_fetch(&mut self) -> Option<FetchTicket> {
        if !self.pending_fetch {
            return None;
        }
        self.pending_fetch = false;
        Some(FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Replaces the query parameters and restarts the fetch cycle
    pub fn set_query(&mut self, query: WeatherQuery) {
        self.query = query;
        self.request_fetch();
    }

    /// Applies the outcome of a fetch.
    ///
    /// Returns `false` and leaves the state untouched if the ticket belongs to a
    /// superseded request. `today` anchors the chart time axis.
    pub fn apply_fetch_result(
        &mut self,
        ticket: &FetchTicket,
        result: Result<WeatherReport, WeatherError>,
        today: NaiveDate,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded weather response"
            );
            return false;
        }

        match result {
            Ok(report) => {
                tracing::info!(generation = ticket.generation, days = report.days.len(), "weather data loaded");
                self.selected_day = report
                    .days
                    .iter()
                    .position(|day| day.date == ticket.query.selected_date)
                    .unwrap_or(0);
                self.axis = TimeAxis::new(today);
                self.last_update = Some(Local::now());
                self.state = FetchState::Success(report);
            }
            Err(err) => {
                tracing::error!(generation = ticket.generation, error = ?err, "weather fetch failed");
                self.state = FetchState::Error(err.to_string());
            }
        }

        true
    }

    /// The report of the latest successful fetch
    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.state {
            FetchState::Success(report) => Some(report),
            _ => None,
        }
    }

    /// Message of the latest failed fetch
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            FetchState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// The currently selected day
    pub fn selected_day(&self) -> Option<&DailyWeatherData> {
        self.report()?.days.get(self.selected_day)
    }

    /// The chart for the selected day and chart kind
    pub fn current_chart(&self) -> Option<Result<ChartSpec, ChartError>> {
        let day = self.selected_day()?;
        Some(build_chart(day, self.chart_kind, &self.axis))
    }

    /// Moves the selected date by `days` and refetches.
    ///
    /// An unparsable date restarts from the axis anchor date.
    pub fn shift_date(&mut self, days: i64) {
        let current = parse_date_arg(&self.query.selected_date).unwrap_or(self.axis.anchor());
        let Some(date) = current.checked_add_signed(Duration::days(days)) else {
            return;
        };
        let mut query = self.query.clone();
        query.selected_date = date.format(DATE_FORMAT).to_string();
        self.set_query(query);
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`/`Esc`: Quit (or close help)
    /// - `r`: Refetch
    /// - `[` / `]`: Previous / next date (refetches)
    /// - `Tab`/`n`, `BackTab`/`p`: Next / previous day of the report
    /// - `c`: Cycle chart
    /// - `Left`/`h`, `Right`/`l`: Move the hour cursor
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                self.request_fetch();
            }
            KeyCode::Char('[') => {
                self.shift_date(-1);
            }
            KeyCode::Char(']') => {
                self.shift_date(1);
            }
            KeyCode::Tab | KeyCode::Char('n') => {
                self.move_day(1);
            }
            KeyCode::BackTab | KeyCode::Char('p') => {
                self.move_day(-1);
            }
            KeyCode::Char('c') => {
                self.chart_kind = self.chart_kind.next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.hour_cursor = (self.hour_cursor + HOURS_PER_DAY - 1) % HOURS_PER_DAY;
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.hour_cursor = (self.hour_cursor + 1) % HOURS_PER_DAY;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Moves the day selection, wrapping around the report's days
    fn move_day(&mut self, delta: isize) {
        let count = self.report().map(|r| r.days.len()).unwrap_or(0);
        if count == 0 {
            return;
        }
        self.selected_day = (self.selected_day as isize + delta).rem_euclid(count as isize) as usize;
    }
}
