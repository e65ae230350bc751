//! Portfolio API
//!
//! Endpoints:
//! - GET /api/portfolio/summary - Metrics summary + daily P&L series

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::auth::Authenticated;
use crate::services::metrics;
use crate::types::{DailyPnlPoint, MetricsSummary};
use crate::AppState;

/// Create portfolio router.
pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(summary))
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub metrics: MetricsSummary,
    pub daily: Vec<DailyPnlPoint>,
}

/// GET /api/portfolio/summary
///
/// Recomputes metrics from the caller's full trade history. An empty
/// history is not an error: it yields a zeroed summary and empty series.
async fn summary(State(state): State<AppState>, auth: Authenticated) -> Json<SummaryResponse> {
    let trades = state.store.trades_for_user(&auth.user.id);
    let (metrics, daily) = metrics::compute(&trades);
    Json(SummaryResponse { metrics, daily })
}
