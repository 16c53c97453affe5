//! Web server module for the Intercom Canvas webhooks.
//!
//! One router serves every deployment; what used to differ between variants
//! (allowed origins, sheet URL) is configuration.

pub mod handlers;
pub mod layers;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use handlers::{
    health, index, initialize, sheet, submit_sheet, AppState, Endpoints, HealthResponse,
    IndexResponse,
};
pub use layers::{cors_layer, csp_layer};

/// Build the application router with all endpoints and layers.
pub fn router(state: AppState) -> Result<Router> {
    let csp = csp_layer(&state.config.frame_src)?;
    let cors = cors_layer(&state.config.allowed_origins);
    let static_files = ServeDir::new(&state.config.static_dir);

    Ok(Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/initialize", post(initialize))
        .route("/sheet", post(sheet))
        .route("/submit-sheet", post(submit_sheet))
        .fallback_service(static_files)
        .layer(csp)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
