use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use velocity_server::{build_router, config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "velocity_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = config::Settings::new().context("Failed to load settings")?;

    let db = db::Database::new(&settings.database.path).context("Failed to create database")?;
    db.initialize()
        .context("Failed to initialize database schema")?;

    if settings.database.demo_data {
        db.seed_demo_data().context("Failed to seed demo data")?;
        tracing::info!("Demo data seeded successfully");
    }

    tracing::info!("Database initialized successfully");

    if settings.auth.email_login {
        tracing::warn!("EMAIL_LOGIN is enabled; anyone can sign in as any email, including the admin");
    } else {
        tracing::info!("Email login is disabled; set EMAIL_LOGIN=true for local development");
    }

    if settings.github.token.is_none() {
        tracing::warn!("GITHUB_ACCESS_TOKEN is not set; scrape triggers will fail");
    }

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Failed to parse server address")?;

    let state = AppState::new(db, settings);

    match state.session_manager.cleanup_expired_sessions() {
        Ok(count) if count > 0 => tracing::info!("Cleaned up {} expired sessions on startup", count),
        Ok(_) => tracing::info!("No expired sessions to clean up"),
        Err(e) => tracing::error!("Failed to cleanup expired sessions on startup: {}", e),
    }

    // Hourly purge of expired sessions
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            tracing::debug!("Running periodic session cleanup...");
            match cleanup_state.session_manager.cleanup_expired_sessions() {
                Ok(count) if count > 0 => {
                    tracing::info!("Periodic cleanup: removed {} expired sessions", count)
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Periodic session cleanup failed: {}", e),
            }
        }
    });

    let app = build_router(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
