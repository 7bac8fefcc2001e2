// src/main.rs

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};
use trustlens::core::knowledge_base::summarize;
use trustlens::core::models::AnalysisReport;
use trustlens::core::scanner::{capturing_check_panic, validate_url};
use trustlens::{EngineConfig, HeuristicEngine, ValidationError};

mod app;
mod logging;
mod ui;

use app::{App, AppState};

type AnalysisOutcome = Result<AnalysisReport, ValidationError>;

/// Rule-based trust analysis of a single web page.
#[derive(Debug, Parser)]
#[command(name = "trustlens", version, about)]
struct Cli {
    /// Analyze this URL without starting the interactive interface.
    url: Option<String>,

    /// Print the report as JSON (headless mode only).
    #[arg(long, requires = "url")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_hooks()?;
    let cli = Cli::parse();
    logging::initialize_logging()?;
    info!(log = %logging::log_path().display(), "Logging initialized.");

    let engine = Arc::new(HeuristicEngine::new(EngineConfig::from_env())?);

    match cli.url {
        Some(url) => run_headless(&engine, &url, cli.json).await,
        None => run_tui(engine).await,
    }
}

/// color-eyre hooks, except that panics the engine captures from a check are
/// left to the engine's own log entry instead of being printed over the UI.
fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install()?;
    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        if !capturing_check_panic() {
            panic_hook(info);
        }
    }));
    Ok(())
}

async fn run_headless(engine: &HeuristicEngine, url: &str, json: bool) -> Result<()> {
    let report = engine.analyze(&with_default_scheme(url)).await.map_err(|e| {
        error!(error = %e, "Rejected input URL.");
        eyre!(e)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let summary = summarize(&report);
    println!("{} (trust score {}/100)", report.url, summary.score);
    if let Some(info) = &report.page_info {
        println!("  Title: {}", info.title.as_deref().unwrap_or("Title not found"));
        println!("  Description: {}", info.description.as_deref().unwrap_or("Description not found"));
    }
    for finding in &report.findings {
        println!("- {finding}");
    }
    Ok(())
}

async fn run_tui(engine: Arc<HeuristicEngine>) -> Result<()> {
    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, engine).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    engine: Arc<HeuristicEngine>,
) -> Result<()> {
    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel::<AnalysisOutcome>(1);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, &engine, &tx)?;
        }
        app.on_tick();

        if let Ok(outcome) = rx.try_recv() {
            match outcome {
                Ok(report) => app.finish(report),
                Err(e) => app.reject(e.to_string()),
            }
        }
    }
    Ok(())
}

fn handle_events(app: &mut App, engine: &Arc<HeuristicEngine>, tx: &mpsc::Sender<AnalysisOutcome>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, engine, tx),
                AppState::Finished => handle_finished_input(app, key.code),
                AppState::Analyzing => {
                    if key.code == KeyCode::Char('q') { app.quit(); }
                }
            }
        }
    }
    Ok(())
}

/// Input while the user is typing a URL.
fn handle_idle_input(app: &mut App, key_code: KeyCode, engine: &Arc<HeuristicEngine>, tx: &mpsc::Sender<AnalysisOutcome>) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => {
            app.input.push(c);
            app.input_error = None;
        }
        KeyCode::Backspace => { app.input.pop(); }
        KeyCode::Enter => {
            if app.input.trim().is_empty() { return; }
            let target = with_default_scheme(&app.input);
            if let Err(e) = validate_url(&target) {
                app.reject(e.to_string());
                return;
            }

            app.state = AppState::Analyzing;
            let engine = Arc::clone(engine);
            let tx_clone = tx.clone();
            tokio::spawn(async move {
                let outcome = engine.analyze(&target).await;
                let _ = tx_clone.send(outcome).await;
            });
        }
        _ => {}
    }
}

/// Input while a report is displayed.
fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}

/// Bare host names are treated as https, like a browser address bar.
fn with_default_scheme(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hosts_get_https() {
        assert_eq!(with_default_scheme(" example.com "), "https://example.com");
        assert_eq!(with_default_scheme("http://example.com"), "http://example.com");
        assert_eq!(with_default_scheme("ftp://example.com"), "ftp://example.com");
    }

    #[test]
    fn cli_parses_headless_flags() {
        let cli = Cli::parse_from(["trustlens", "https://a.test", "--json"]);
        assert_eq!(cli.url.as_deref(), Some("https://a.test"));
        assert!(cli.json);
        assert!(Cli::try_parse_from(["trustlens", "--json"]).is_err());
    }
}
