//! LightPath - a terminal client for the LightPath bus booking service.
//!
//! Shows the operator dashboard (buses, trip and booking counts, weather) and
//! per-bus trip listings, behind a token login against the LightPath backend.

mod app;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lightpath_core::auth::{validate_credentials, LoginOutcome};
use lightpath_core::routes::DASHBOARD_PATH;
use lightpath_core::{ApiClient, Config, SessionStore};

use app::{App, AppState, EMAIL_ENV};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Prefix of the daily log files in the cache directory
const LOG_FILE_PREFIX: &str = "lightpath.log";

const USAGE: &str = "\
Usage: lightpath [OPTIONS]

Options:
  --login          Log in on the terminal and save the session
  --route <PATH>   Open the TUI at PATH (default /dashboard)
  -h, --help       Show this help";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Tui { start_path: String },
    Login,
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut start_path = DASHBOARD_PATH.to_string();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--login" => return Ok(Command::Login),
            "-h" | "--help" => return Ok(Command::Help),
            "--route" => {
                start_path = iter
                    .next()
                    .cloned()
                    .context("--route needs a path, e.g. --route /trips/3")?;
            }
            other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
        }
    }

    Ok(Command::Tui { start_path })
}

/// Initialize logging.
/// The TUI owns the terminal, so its logs go to a daily file in the cache
/// directory. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(config: &Config, to_file: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = config.cache_dir().ok().filter(|_| to_file);
    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;
    let config = Config::load()?;

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Login => {
            let _guard = init_tracing(&config, false);
            login_on_terminal(config).await
        }
        Command::Tui { start_path } => {
            let _guard = init_tracing(&config, true);
            run_tui(config, &start_path).await
        }
    }
}

/// Prompt for credentials on the terminal and save the session.
async fn login_on_terminal(mut config: Config) -> Result<()> {
    let default_email = std::env::var(EMAIL_ENV)
        .ok()
        .or_else(|| config.last_email.clone())
        .unwrap_or_default();

    if default_email.is_empty() {
        print!("Email: ");
    } else {
        print!("Email [{}]: ", default_email);
    }
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    let email = match email.trim() {
        "" => default_email,
        typed => typed.to_string(),
    };
    let password = rpassword::prompt_password("Password: ")?;

    if let Err(message) = validate_credentials(&email, &password) {
        bail!(message);
    }

    let session = std::sync::Arc::new(SessionStore::open(config.cache_dir()?));
    let api = ApiClient::new(&config, session.clone())?;
    let response = api.login(&email, &password).await;

    match LoginOutcome::from_response(&response) {
        LoginOutcome::Authenticated { access, refresh } => {
            if session.access_token().as_deref() != Some(access.as_str()) {
                session.save_session(&access, refresh.as_deref().unwrap_or_default())?;
            }
            config.last_email = Some(email);
            config.save()?;
            println!("Logged in. Session saved to {}", display_path(&session));
            Ok(())
        }
        LoginOutcome::Rejected(message) => bail!(message),
    }
}

fn display_path(session: &SessionStore) -> String {
    session
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "memory".to_string())
}

async fn run_tui(config: Config, start_path: &str) -> Result<()> {
    info!(start = start_path, "LightPath starting");

    let mut app = App::new(config)?;
    app.navigate(start_path);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("LightPath shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Poll with a timeout so background results get applied
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }
                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
            }
        }

        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
