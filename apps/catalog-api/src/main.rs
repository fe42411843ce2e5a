//! # Catalog API Server
//!
//! Startup order:
//! ```text
//! tracing → AppConfig::load → RuleSet::compile (abort on error)
//!         → Database::new (migrations) → bind → serve until SIGINT/SIGTERM
//! ```

use std::sync::Arc;

use anyhow::Context;
use catalog_api::{router, AppConfig, AppState};
use catalog_core::{DiscountEngine, RuleSet};
use catalog_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("Starting catalog API server...");

    let config = AppConfig::load().context("failed to load configuration")?;
    info!(
        addr = %config.server.bind_address(),
        database = %config.database.path.display(),
        rules = config.discount.rules.len(),
        "Configuration loaded"
    );

    if config.discount.rules.is_empty() {
        warn!("No discount rules configured; every product will be served at full price");
    }

    // No listener is bound until every rule has compiled.
    let rules = RuleSet::compile(&config.discount.rules).context("invalid discount rules")?;
    let engine = Arc::new(DiscountEngine::new(rules));

    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await
    .context("failed to open catalog database")?;

    let state = AppState::new(db.clone(), engine, config.server.query_timeout());

    let bind_addr = config.server.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    info!(addr = %bind_addr, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
