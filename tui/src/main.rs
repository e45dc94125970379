//! Calculator TUI Entry Point
//!
//! Usage:
//!   calculator-tui [OPTIONS]
//!
//! Options:
//!   --server-url <URL>        Calculation service root
//!   --config <PATH>           Config file (default: ~/.config/calculator/calculator.toml)
//!   --timeout-ms <MS>         Per-request timeout
//!   --error-reset <POLICY>    preserve (default) or cancel-on-edit
//!   --log-file <PATH>         Write logs here (logs are discarded otherwise)

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use calculator_core::{
    default_config_path, load_config_with_overrides, ConfigOverrides, ErrorResetPolicy,
};
use calculator_tui::{App, CalculatorClient};

/// Terminal calculator backed by a remote calculation service
#[derive(Parser, Debug)]
#[command(name = "calculator-tui")]
#[command(version, about, long_about = None)]
struct Args {
    /// Calculation service root URL
    #[arg(long)]
    server_url: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// What editing does to a pending error reset: preserve (default) or cancel-on-edit
    #[arg(long)]
    error_reset: Option<ErrorResetPolicy>,

    /// Append logs to this file
    #[arg(long, env = "CALCULATOR_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.log_file.as_deref())?;

    // CLI overrides sit on top of the file and environment
    let mut overrides = ConfigOverrides::new();
    if let Some(url) = args.server_url.clone() {
        overrides = overrides.with_server_url(url);
    }
    if let Some(ms) = args.timeout_ms {
        overrides = overrides.with_request_timeout_ms(ms);
    }
    if let Some(policy) = args.error_reset {
        overrides = overrides.with_error_reset(policy);
    }
    let path = args.config.clone().or_else(default_config_path);
    let config = load_config_with_overrides(path, &overrides)?;

    tracing::info!(
        server = %config.server_url,
        source = ?config.source(),
        error_reset = %config.error_reset,
        "Configuration loaded"
    );

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: calculator-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or SSH ran without -t.");
        std::process::exit(1);
    }

    let client = CalculatorClient::from_config(&config)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(client);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

/// Install the tracing subscriber
///
/// stdout belongs to the terminal UI, so logs go to `log_file` or nowhere.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_writer(io::sink))
                .with(filter)
                .init();
        }
    }

    Ok(())
}
