//! Skyview - hourly weather charts in the terminal
//!
//! Fetches a forecast for one location and date from the weather backend and
//! shows current conditions, the forecast days and hourly charts.

use std::io::{self, Stdout};
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;

use skyview::app::App;
use skyview::chart::{build_day_charts, ChartSpec, TimeAxis};
use skyview::cli::{Cli, StartupConfig};
use skyview::config::Config;
use skyview::data::{WeatherClient, WeatherQuery, WeatherReport};
use skyview::logging::{self, LogTarget};
use skyview::refresh::{self, FetchWorker};
use skyview::ui;

type BoxError = Box<dyn std::error::Error>;

/// Output of `--json`
#[derive(Serialize)]
struct JsonOutput<'a> {
    query: &'a WeatherQuery,
    report: &'a WeatherReport,
    /// Charts of the selected day (or the first day if it is not in the report)
    charts: Vec<ChartSpec>,
}

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Fetches once and prints the report and charts as JSON
async fn run_json(client: &WeatherClient, query: &WeatherQuery) -> Result<(), BoxError> {
    let report = client.fetch_report(query).await?;

    let axis = TimeAxis::today();
    let charts = match report.day(&query.selected_date).or(report.days.first()) {
        Some(day) => build_day_charts(day, &axis)?,
        None => Vec::new(),
    };

    let output = JsonOutput {
        query,
        report: &report,
        charts,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Main event loop: hands out fetches, applies their results, draws and reads keys
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    worker: &mut FetchWorker,
) -> io::Result<()> {
    loop {
        if let Some(ticket) = app.take_pending_fetch() {
            worker.spawn(ticket);
        }

        while let Some(message) = refresh::try_recv(worker) {
            app.apply_fetch_result(&message.ticket, message.result, Local::now().date_naive());
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn run_tui(client: WeatherClient, query: WeatherQuery) -> Result<(), BoxError> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(query);
    let mut worker = FetchWorker::new(client);
    let result = event_loop(&mut terminal, &mut app, &mut worker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result.map_err(Into::into)
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    let startup = StartupConfig::from_cli(&cli, Local::now().date_naive())?;

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    let client = WeatherClient::with_timeout(config.timeout())?
        .with_base_url(config.base_url.clone())
        .with_strictness(config.strictness());

    if startup.json {
        logging::init(&config.log_level, LogTarget::Stderr)?;
        return run_json(&client, &startup.query).await;
    }

    // The UI owns the terminal, so logs go to a file
    let target = config
        .log_path()
        .map(LogTarget::File)
        .unwrap_or(LogTarget::Off);
    logging::init(&config.log_level, target)?;
    tracing::info!(base_url = %config.base_url, "starting skyview");

    run_tui(client, startup.query)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
