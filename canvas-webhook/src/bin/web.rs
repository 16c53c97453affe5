//! Canvas Web Server - Intercom messenger app backend.
//!
//! This binary serves:
//! - The initial and final canvases for the messenger app
//! - The review sheet, after checking the encrypted Intercom user token
//! - Static assets from the configured directory
//!
//! User verification is advisory unless REQUIRE_VERIFIED_USER is set.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use canvas::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        client_secret_configured = config.client_secret.is_some(),
        allowed_origins = ?config.allowed_origins,
        sheet_url = %config.sheet_url(),
        static_dir = %config.static_dir,
        require_verified_user = config.require_verified_user,
        "config_loaded"
    );

    let state = AppState::new(config.clone());
    if !state.decryptor.is_enabled() {
        warn!("user_decryption_disabled_client_secret_not_set");
    }

    let app = router(state).context("Failed to build router")?;

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
