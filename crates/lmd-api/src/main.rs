//! # lmd-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Legal Metrology consoles.
//! Binds to a configurable port (default 8080).

use lmd_api::config::AppConfig;
use lmd_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment (and LMD_CONFIG, if set).
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("configuration failed: {e}");
        e
    })?;
    let port = config.port;

    if !config.auth_enabled() {
        tracing::warn!(
            "no credentials configured — authentication disabled, all requests run as admin"
        );
    }

    // Seed the registries and assemble the router.
    let state = AppState::seeded_with_config(config);
    let app = lmd_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("LMD API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
