pub mod auth;
pub mod health;
pub mod insights;
pub mod portfolio;
pub mod trades;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/trades", trades::router())
        .nest("/api/portfolio", portfolio::router())
        .nest("/api/insights", insights::router())
}
