//! Insights API
//!
//! Endpoints:
//! - GET /api/insights - Generate a narrative insight from current metrics

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::api::auth::Authenticated;
use crate::services::{insights, metrics};
use crate::types::Insight;
use crate::AppState;

/// Create insights router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_insights))
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
}

/// GET /api/insights
///
/// Recomputes metrics, assembles an advisory record, and archives it in
/// the background. A failed archive never fails the request.
async fn get_insights(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Json<InsightsResponse> {
    let trades = state.store.trades_for_user(&auth.user.id);
    if trades.is_empty() {
        return Json(InsightsResponse { insights: vec![] });
    }

    let (summary, daily) = metrics::compute(&trades);
    let insight = insights::build_insight(&auth.user.id, &summary, &daily);

    // Fire-and-forget archive.
    let store = state.store.clone();
    let archived = insight.clone();
    tokio::spawn(async move {
        if let Err(e) = store.insert_insight(&archived) {
            warn!("Failed to archive insight {}: {}", archived.id, e);
        }
    });

    Json(InsightsResponse {
        insights: vec![insight],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InsightMetrics, MetricsSummary};

    #[test]
    fn test_insights_response_serialization() {
        let response = InsightsResponse {
            insights: vec![Insight {
                id: "i1".to_string(),
                user_id: "u1".to_string(),
                title: "Daily Risk & Trend Overview".to_string(),
                message: "msg".to_string(),
                tags: vec!["risk".to_string()],
                metrics: InsightMetrics::from_summary(&MetricsSummary::zero(), None),
                created_at: 0,
            }],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"insights\":["));
        assert!(json.contains("\"forecast_pnl\":null"));
    }

    #[test]
    fn test_empty_insights_serialization() {
        let json = serde_json::to_string(&InsightsResponse { insights: vec![] }).unwrap();
        assert_eq!(json, "{\"insights\":[]}");
    }
}
