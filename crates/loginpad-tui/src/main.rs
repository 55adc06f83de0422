//! loginpad - a terminal login client.
//!
//! Shows a login form, signs in against the configured auth service, and
//! routes between the login and home views.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{load_config, App, AppState};
use loginpad_core::{AuthClient, Config, EnvOverrides, LoginFlow, LoginForm, LoginOutcome, Router, SessionStore};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the cache directory
const LOG_FILE: &str = "loginpad.log";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to a file, since the terminal belongs to the UI.
/// The returned guard flushes the writer when dropped.
fn init_file_tracing(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.cache_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();

    Ok(guard)
}

fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config_file = match Config::default_path() {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("Warning: {e:#}, settings will not be saved");
            None
        }
    };
    let (config, config_path) = load_config(config_file.clone(), EnvOverrides::from_env());
    if let (Some(file), None) = (&config_file, &config_path) {
        eprintln!(
            "Warning: could not load {}, using defaults and leaving it untouched",
            file.display()
        );
    }

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        init_stderr_tracing();
        return login_headless(config, config_path).await;
    }

    let _log_guard = match init_file_tracing(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };
    info!(base_url = %config.effective_base_url(), "loginpad starting");

    let mut app = App::new(config, config_path)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("loginpad shutting down");
    Ok(())
}

/// Prompt on stdin/stderr and run one login without the TUI
async fn login_headless(config: Config, config_path: Option<PathBuf>) -> Result<()> {
    let session = SessionStore::new();
    let client = AuthClient::new(config.effective_base_url(), config.request_timeout())?;
    let flow = LoginFlow::new(client, session.clone());
    let mut router = Router::new(loginpad_core::router::LOGIN_PATH);

    eprintln!("\n=== loginpad ({}) ===\n", config.effective_base_url());

    let mut form = LoginForm::new();
    form.email = prompt_email(config.prefill_email())?;
    form.password = rpassword::prompt_password("Password: ")?;

    match flow.submit(&mut form, &mut router).await {
        LoginOutcome::Succeeded { redirected_to } => {
            let user = session.read().user;
            eprintln!("Signed in as {} (now at {})", user, redirected_to);

            if let Some(path) = config_path {
                let mut config = config;
                config.last_email = Some(user);
                if let Err(e) = config.save_to(&path) {
                    warn!(error = %e, "Failed to save config");
                }
            }
            Ok(())
        }
        LoginOutcome::Failed(error) => Err(anyhow::anyhow!(error)),
        LoginOutcome::Blocked(_) => {
            let errors = &form.field_errors;
            for message in [&errors.email, &errors.password].into_iter().flatten() {
                eprintln!("{}", message);
            }
            Err(anyhow::anyhow!("Invalid credentials format"))
        }
    }
}

fn prompt_email(default: Option<&str>) -> Result<String> {
    match default {
        Some(last) => eprint!("Email [{}]: ", last),
        None => eprint!("Email: "),
    }
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(last) if input.is_empty() => last.to_string(),
        _ => input.to_string(),
    })
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so finished logins get picked up
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
