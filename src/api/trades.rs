//! Trades API
//!
//! Endpoints:
//! - POST /api/trades/upload - Upload a CSV of executed trades (auth required)
//! - GET  /api/trades       - List the caller's stored trades

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::auth::Authenticated;
use crate::error::AppError;
use crate::services::parse_trades;
use crate::types::TradeRecord;
use crate::AppState;

/// Create trades router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/", get(list_trades))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    /// Rows stored.
    pub inserted: usize,
    /// Rows dropped during parsing or insertion.
    pub skipped: usize,
}

/// POST /api/trades/upload
///
/// Multipart upload with a single `file` field containing the CSV. The
/// header must carry symbol, asset_type, quantity, price, side and
/// timestamp; bad rows are skipped, not fatal.
async fn upload(
    State(state): State<AppState>,
    auth: Authenticated,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut content: Option<String> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid CSV file: {e}")))?;
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|_| AppError::BadRequest("Invalid CSV file: not UTF-8".to_string()))?;
            content = Some(text);
        }
    }
    let content = content.ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;

    let outcome = parse_trades(&content, &auth.user.id)?;

    let mut inserted = 0usize;
    let mut skipped = outcome.skipped;
    for trade in &outcome.trades {
        match state.store.insert_trade(trade) {
            Ok(()) => inserted += 1,
            Err(e) => {
                // Partial-failure batches are acceptable: keep going.
                warn!("Failed to insert trade {}: {}", trade.id, e);
                skipped += 1;
            }
        }
    }

    info!(
        "Stored {} trades for {} ({} skipped)",
        inserted, auth.user.email, skipped
    );

    Ok(Json(UploadResponse {
        status: "ok",
        inserted,
        skipped,
    }))
}

#[derive(Debug, Serialize)]
pub struct TradesResponse {
    pub trades: Vec<TradeRecord>,
}

/// GET /api/trades
///
/// All stored trades belonging to the caller.
async fn list_trades(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Json<TradesResponse> {
    Json(TradesResponse {
        trades: state.store.trades_for_user(&auth.user.id),
    })
}
