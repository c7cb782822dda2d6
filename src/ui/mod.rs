//! UI rendering module for Skyview
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard;
pub mod help_overlay;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, FetchState};

pub use help_overlay::render as render_help_overlay;

/// Renders the UI based on the current fetch state
pub fn render(frame: &mut Frame, app: &App) {
    match &app.state {
        FetchState::Idle | FetchState::Loading => render_loading(frame, app),
        FetchState::Error(message) => render_error(frame, app, message),
        FetchState::Success(report) => dashboard::render(frame, app, report),
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Vertically centered band of `height` rows
fn center_band(area: Rect, height: u16) -> Rect {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(height),
            Constraint::Percentage(45),
        ])
        .split(area)[1]
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut Frame, app: &App) {
    let text = format!(
        "Loading weather for {} on {}...",
        app.query.location, app.query.selected_date
    );
    let loading_text = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, center_band(frame.area(), 3));
}

/// Renders the error message of a failed fetch
fn render_error(frame: &mut Frame, app: &App, message: &str) {
    let lines = vec![
        Line::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::from(format!("{} · {}", app.query.location, app.query.selected_date)),
        Line::styled(
            "r retry  [/] change date  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let error_text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(error_text, center_band(frame.area(), 3));
}
