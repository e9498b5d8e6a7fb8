//! # Bookshop API Server
//!
//! Binds the HTTP router to `BOOKSHOP_HOST:BOOKSHOP_PORT` over a SQLite pool.
//!
//! ```text
//! .env / environment ──► ApiConfig ──► Database (migrations) ──► axum::serve
//!                                                                   │
//!                                              Ctrl+C / SIGTERM ────┘ graceful shutdown
//! ```

use anyhow::Context;
use bookshop_api::{create_app, ApiConfig, AppState};
use bookshop_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshop_api=info,bookshop_db=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!("Starting bookshop API server...");

    let config = ApiConfig::load().context("Failed to load configuration")?;
    info!(
        addr = %config.bind_addr(),
        db_path = %config.db_path,
        allow_backorder = config.allow_backorder,
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(&config.db_path).max_connections(config.db_max_connections))
        .await
        .context("Failed to open database")?;

    let state = AppState::new(db.clone(), config.billing_policy());
    let app = create_app(state);

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
