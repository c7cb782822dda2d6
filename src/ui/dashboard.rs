//! Dashboard screen rendering
//!
//! Renders current conditions, the list of days and the selected chart with a
//! readout of the values under the hour cursor.

use std::str::FromStr;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::widgets::HourlySparkline;
use crate::app::App;
use crate::chart::dataset::format_value;
use crate::chart::{
    hour_labels, round_one_decimal, tooltip_label, ChartDataset, ChartSpec, SeriesStyle, TimeAxis,
};
use crate::cli::parse_date_arg;
use crate::data::{
    weather_code_to_condition, DailyWeatherData, WeatherCondition, WeatherReport,
};

/// Days listed at once; the list scrolls past this
const MAX_DAY_ROWS: usize = 7;

/// Weather condition to icon mapping
fn weather_icon(condition: WeatherCondition) -> &'static str {
    match condition {
        WeatherCondition::Clear => "\u{2600}",        // ☀
        WeatherCondition::PartlyCloudy => "\u{26C5}", // ⛅
        WeatherCondition::Cloudy => "\u{2601}",       // ☁
        WeatherCondition::Rain => "\u{1F327}",        // 🌧
        WeatherCondition::Showers => "\u{1F326}",     // 🌦
        WeatherCondition::Thunderstorm => "\u{26C8}", // ⛈
        WeatherCondition::Snow => "\u{2744}",         // ❄
        WeatherCondition::Fog => "\u{1F32B}",         // 🌫
    }
}

/// Color for temperature (warmer = more red, cooler = more blue)
fn temperature_color(temp: f64) -> Color {
    if temp >= 30.0 {
        Color::Red
    } else if temp >= 25.0 {
        Color::LightRed
    } else if temp >= 20.0 {
        Color::Yellow
    } else if temp >= 15.0 {
        Color::Green
    } else if temp >= 10.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// Formats an optional measurement, `--` when absent
fn measure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", format_value(round_one_decimal(v)), unit),
        None => "--".to_string(),
    }
}

/// Parses a `#rrggbb` series color for the terminal
fn series_color(style: &SeriesStyle) -> Color {
    Color::from_str(style.color()).unwrap_or(Color::White)
}

/// Splits a dataset into runs of consecutive points that have a value, so
/// missing hours show as gaps instead of being bridged
pub fn plot_runs(dataset: &ChartDataset, axis: &TimeAxis) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for point in &dataset.points {
        match point.y {
            Some(y) if y.is_finite() => current.push((axis.position(point.x), y)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Y bounds covering every value, padded; bar charts always include zero
pub fn y_bounds(datasets: &[ChartDataset]) -> [f64; 2] {
    let values = datasets
        .iter()
        .flat_map(|d| d.points.iter().filter_map(|p| p.y))
        .filter(|y| y.is_finite());

    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
        (lo.min(y), hi.max(y))
    });
    if lo > hi {
        return [0.0, 1.0];
    }
    if datasets
        .iter()
        .any(|d| matches!(d.style, SeriesStyle::Bar { .. }))
    {
        lo = lo.min(0.0);
    }

    let pad = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
    hi += pad;
    if lo < 0.0 || datasets.iter().all(|d| matches!(d.style, SeriesStyle::Line { .. })) {
        lo -= pad;
    }
    [lo, hi]
}

/// Renders the dashboard for a loaded report
pub fn render(frame: &mut Frame, app: &App, report: &WeatherReport) {
    let area = frame.area();
    let day_rows = report.days.len().clamp(1, MAX_DAY_ROWS) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Current conditions
            Constraint::Length(day_rows + 2), // Days
            Constraint::Min(8),               // Chart
            Constraint::Length(5),            // Readout
            Constraint::Length(1),            // Footer
        ])
        .split(area);

    render_current(frame, app, report, chunks[0]);
    render_days(frame, app, report, chunks[1]);

    match app.current_chart() {
        Some(Ok(chart)) => {
            render_chart(frame, app, &chart, chunks[2]);
            render_readout(frame, app, &chart, chunks[3]);
        }
        Some(Err(err)) => {
            let message = Paragraph::new(format!("Chart unavailable: {}", err))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[2]);
        }
        None => {
            let message = Paragraph::new("No days in this report")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[2]);
        }
    }

    render_footer(frame, chunks[4]);
}

fn render_current(frame: &mut Frame, app: &App, report: &WeatherReport, area: Rect) {
    let current = &report.current;

    let mut title = format!(" {} · {} ", app.query.location, app.query.selected_date);
    if let Some(updated) = app.last_update {
        title.push_str(&format!("· updated {} ", updated.format("%H:%M")));
    }

    let temp_style = current
        .temperature
        .map(|t| Style::default().fg(temperature_color(t)))
        .unwrap_or_default();

    let mut spans = vec![
        Span::styled("Now ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(measure(current.temperature, "°C"), temp_style),
        Span::raw(format!(
            " (feels {})",
            measure(current.apparent_temperature, "°C")
        )),
    ];
    if let Some(condition) = current.condition() {
        spans.push(Span::raw(format!(
            "  {} {}",
            weather_icon(condition),
            condition.label()
        )));
    }
    spans.push(Span::raw(format!(
        "  Wind {}",
        measure(current.wind_speed, " km/h")
    )));

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// One line of the day list, without the sparkline
fn day_summary(day: &DailyWeatherData) -> String {
    let weekday = parse_date_arg(&day.date)
        .map(|d| d.format("%a ").to_string())
        .unwrap_or_default();

    let condition = day
        .daily_weather_code
        .map(weather_code_to_condition)
        .map(|c| format!("{} {:<13}", weather_icon(c), c.label()))
        .unwrap_or_else(|| format!("{:<15}", "--"));

    let sun = match (&day.daily_sunrise, &day.daily_sunset) {
        (Some(rise), Some(set)) => format!("  {}-{}", rise, set),
        _ => String::new(),
    };

    format!(
        "{}{}  {}  {} / {}  UV {}{}",
        weekday,
        day.date,
        condition,
        measure(day.daily_max_temp, "°"),
        measure(day.daily_min_temp, "°"),
        measure(day.daily_uv_index, ""),
        sun
    )
}

fn render_days(frame: &mut Frame, app: &App, report: &WeatherReport, area: Rect) {
    let block = Block::default()
        .title(" Days (Tab/n, p) ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let offset = app.selected_day.saturating_sub(MAX_DAY_ROWS - 1);
    for (row, (index, day)) in report
        .days
        .iter()
        .enumerate()
        .skip(offset)
        .take(inner.height as usize)
        .enumerate()
    {
        let row_area = Rect {
            y: inner.y + row as u16,
            height: 1,
            ..inner
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(25)])
            .split(row_area);

        let selected = index == app.selected_day;
        let style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker = if selected { "▶ " } else { "  " };

        frame.render_widget(
            Paragraph::new(format!("{}{}", marker, day_summary(day))).style(style),
            columns[0],
        );

        // Precipitation probability over the day
        let mut sparkline = HourlySparkline::new(&day.hourly_prec_prob, 0.0, 100.0)
            .style(Style::default().fg(Color::Blue));
        if selected {
            sparkline = sparkline.cursor(app.hour_cursor);
        }
        frame.render_widget(sparkline, columns[1]);
    }
}

fn render_chart(frame: &mut Frame, app: &App, chart: &ChartSpec, area: Rect) {
    let runs: Vec<Vec<Vec<(f64, f64)>>> = chart
        .datasets
        .iter()
        .map(|d| plot_runs(d, &app.axis))
        .collect();
    let [lo, hi] = y_bounds(&chart.datasets);

    let cursor_x = chart
        .datasets
        .first()
        .and_then(|d| d.points.get(app.hour_cursor))
        .map(|p| app.axis.position(p.x))
        .unwrap_or(app.hour_cursor as f64);
    let cursor_line = [(cursor_x, lo), (cursor_x, hi)];

    let mut datasets = vec![Dataset::default()
        .marker(Marker::Dot)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::DarkGray))
        .data(&cursor_line)];

    for (dataset, runs) in chart.datasets.iter().zip(&runs) {
        let color = series_color(&dataset.style);
        let (graph_type, marker) = match &dataset.style {
            SeriesStyle::Line { dash, .. } if dash.is_empty() => (GraphType::Line, Marker::Braille),
            SeriesStyle::Line { .. } => (GraphType::Scatter, Marker::Dot),
            SeriesStyle::Bar { .. } => (GraphType::Bar, Marker::HalfBlock),
        };
        for run in runs {
            datasets.push(
                Dataset::default()
                    .marker(marker)
                    .graph_type(graph_type)
                    .style(Style::default().fg(color))
                    .data(run),
            );
        }
    }

    let x_axis = Axis::default()
        .title(chart.x_axis_title.as_str())
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, 24.0])
        .labels(vec![
            Span::raw("00:00"),
            Span::raw("06:00"),
            Span::raw("12:00"),
            Span::raw("18:00"),
            Span::raw("24:00"),
        ]);
    let y_axis = Axis::default()
        .title(chart.y_axis_title.as_str())
        .style(Style::default().fg(Color::Gray))
        .bounds([lo, hi])
        .labels(vec![
            Span::raw(format!("{:.1}", lo)),
            Span::raw(format!("{:.1}", (lo + hi) / 2.0)),
            Span::raw(format!("{:.1}", hi)),
        ]);

    let block = Block::default()
        .title(format!(" {} · {} (c) ", chart.kind.title(), chart.date))
        .borders(Borders::ALL);

    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(None);

    frame.render_widget(widget, area);
}

/// Values of every series under the hour cursor
fn render_readout(frame: &mut Frame, app: &App, chart: &ChartSpec, area: Rect) {
    let hour = hour_labels()
        .get(app.hour_cursor)
        .map(String::as_str)
        .unwrap_or("--:--");

    let mut lines = vec![Line::from(Span::styled(
        hour.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (index, dataset) in chart.datasets.iter().enumerate() {
        let text = tooltip_label(&chart.datasets, index, app.hour_cursor)
            .unwrap_or_else(|| format!("{}: --", dataset.label));
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(series_color(&dataset.style)),
        )));
    }

    let block = Block::default().title(" ←/→ hour ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new("[/] date  Tab day  c chart  ←/→ hour  r refresh  ? help  q quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}
