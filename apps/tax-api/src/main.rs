//! # Cess Tax API
//!
//! HTTP server computing GST and compensation cess per line item.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tax API Server                                   │
//! │                                                                         │
//! │  Client ───► HTTP (8000) ───► LookupService ───► Arc<RuleTable>         │
//! │                                                        ▲                │
//! │                                                        │ swap           │
//! │                                     RuleStore ◄── cess_rules.json       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cess_api::config::ApiConfig;
use cess_api::state::AppState;
use cess_rules::RuleStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("Starting Cess Tax API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        addr = %config.socket_addr(),
        rules = %config.rules_path.display(),
        allow_reload = config.allow_reload,
        "Configuration loaded"
    );

    // Load the rule table (no table, no server)
    let store = RuleStore::open(&config.rules_path)
        .with_context(|| format!("loading rule file {}", config.rules_path.display()))?;

    let app = cess_api::app(AppState::new(store, config.allow_reload));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
