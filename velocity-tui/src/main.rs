mod api;
mod app;
#[macro_use]
mod logging;
mod terminal;
mod ui;

use anyhow::Result;
use app::{App, ToastKind};
use clap::Parser;
use crossterm::event::{self, Event};
use std::time::{Duration, Instant};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Velocity - spot exploding trends before everyone else, from your terminal
#[derive(Parser)]
#[command(name = "velocity")]
#[command(about = "Terminal dashboard for Velocity trend discovery")]
#[command(version)]
struct Cli {
    /// Server URL to connect to
    #[arg(long, short, env = "VELOCITY_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Sign in with this email; browse anonymously when omitted
    #[arg(long, short, env = "VELOCITY_EMAIL")]
    email: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    /// Log file location
    #[arg(long, default_value = "velocity_tui.log")]
    log_file: String,

    /// Disable the log file entirely
    #[arg(long, conflicts_with = "verbose")]
    no_log: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    let log_config = if cli.no_log {
        logging::LogConfig::disabled()
    } else if cli.verbose {
        logging::LogConfig::verbose()
    } else {
        logging::LogConfig::default()
    }
    .with_file(&cli.log_file);
    logging::init_logging(&log_config)?;

    let mut app = App::new(cli.server.clone());
    app.log_config = log_config;
    log::info!("Connecting to {}", app.api_client.base_url());

    if let Some(email) = cli.email.as_deref() {
        if let Err(e) = app.login(email).await {
            log::error!("Login failed for {}: {}", email, e);
            app.show_toast(format!("Login failed: {}", e.user_message()), ToastKind::Error);
        }
    }

    app.load_dashboard().await;
    app.load_stats().await;

    terminal::install_panic_hook();
    let mut tui = terminal::init()?;
    let result = run(&mut tui, &mut app).await;
    terminal::restore()?;

    app.logout().await;
    result
}

async fn run(tui: &mut terminal::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.clear_expired_toast(Instant::now());
        tui.draw(|frame| ui::render(app, frame))?;

        // Network work runs after the frame showing the loading state
        if app.pending_action.is_some() {
            app.run_pending_action().await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key)?;
            }
        }
    }
    Ok(())
}
