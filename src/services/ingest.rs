//! CSV trade ingestion.
//!
//! Parses an uploaded CSV into validated [`TradeRecord`]s. The header must
//! carry the required columns; individual rows that fail to parse are
//! skipped and counted rather than failing the whole upload.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use thiserror::Error;
use tracing::debug;

use crate::types::{AssetType, TradeRecord};

/// Columns every upload must declare.
const REQUIRED_COLUMNS: [&str; 6] = [
    "symbol",
    "asset_type",
    "quantity",
    "price",
    "side",
    "timestamp",
];

/// Errors that reject an upload outright.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid CSV file: {0}")]
    InvalidCsv(#[from] csv::Error),

    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Result of parsing one upload.
#[derive(Debug)]
pub struct IngestOutcome {
    /// Rows that validated into trade records.
    pub trades: Vec<TradeRecord>,
    /// Rows dropped for unparseable required fields.
    pub skipped: usize,
}

/// Parse a CSV payload into trade records owned by `user_id`.
pub fn parse_trades(content: &str, user_id: &str) -> Result<IngestOutcome, IngestError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    let idx_symbol = column("symbol").unwrap();
    let idx_asset_type = column("asset_type").unwrap();
    let idx_quantity = column("quantity").unwrap();
    let idx_price = column("price").unwrap();
    let idx_side = column("side").unwrap();
    let idx_timestamp = column("timestamp").unwrap();
    let idx_fees = column("fees");
    let idx_notes = column("notes");

    let mut trades = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let symbol = field(idx_symbol);
        let (Ok(quantity), Ok(price)) = (
            field(idx_quantity).parse::<f64>(),
            field(idx_price).parse::<f64>(),
        ) else {
            debug!("Skipping row with unparseable quantity/price");
            skipped += 1;
            continue;
        };
        let Some(timestamp) = normalize_timestamp(field(idx_timestamp)) else {
            debug!("Skipping row with unparseable timestamp");
            skipped += 1;
            continue;
        };
        if symbol.is_empty() {
            skipped += 1;
            continue;
        }

        let fees = idx_fees
            .map(|i| field(i))
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.0);
        let notes = idx_notes
            .map(|i| field(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        trades.push(TradeRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            symbol: symbol.to_string(),
            asset_type: AssetType::parse_or_default(Some(field(idx_asset_type))),
            quantity,
            price,
            side: field(idx_side).to_lowercase(),
            timestamp,
            fees,
            notes,
        });
    }

    Ok(IngestOutcome { trades, skipped })
}

/// Validate an ISO-8601 timestamp ("Z" accepted) and re-serialize it in
/// RFC 3339. Returns `None` for anything unparseable.
fn normalize_timestamp(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.to_rfc3339());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().to_rfc3339());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_local_timezone(Utc).single()?.to_rfc3339());
    }
    None
}
