//! tradelens - trading analytics backend
//!
//! HTTP API for CSV trade ingestion and portfolio performance metrics.
//! The interesting part lives in [`services::metrics`]: the pure engine
//! that turns a user's trade history into a daily P&L series, a scalar
//! summary, and a trailing-average forecast. Everything else is routing,
//! auth, and storage plumbing around it.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use std::sync::Arc;

use axum::Router;
use config::Config;
use services::{AuthService, SqliteStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<SqliteStore>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wire up state around an already-opened store.
    pub fn new(config: Arc<Config>, store: Arc<SqliteStore>) -> Self {
        let auth = Arc::new(AuthService::new(store.clone()));
        Self {
            config,
            store,
            auth,
        }
    }
}

/// Build the application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    // Open CORS: the frontend is served from anywhere during demos.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
