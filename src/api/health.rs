use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
    users: usize,
    trades: usize,
}

/// GET / - liveness message for the frontend.
async fn root() -> Json<Value> {
    Json(json!({ "message": "tradelens backend running" }))
}

/// GET /api/health - status plus database reachability and row counts.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database: "connected",
        users: state.store.user_count(),
        trades: state.store.trade_count(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok",
            version: "1.0.0",
            database: "connected",
            users: 2,
            trades: 10,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(json.contains("\"trades\":10"));
    }

    #[tokio::test]
    async fn test_root_handler() {
        let Json(body) = root().await;
        assert_eq!(body["message"], "tradelens backend running");
    }
}
