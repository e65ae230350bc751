//! Trade Types
//!
//! Types for uploaded trade records. Records are immutable once stored;
//! the metrics engine never mutates them.

use serde::{Deserialize, Serialize};

/// Asset type for a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Stock,
    Crypto,
}

impl AssetType {
    /// Parse from a CSV cell. Absent or unrecognized values default to
    /// stock, case-insensitive.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("crypto") => AssetType::Crypto,
            _ => AssetType::Stock,
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Stock => write!(f, "stock"),
            AssetType::Crypto => write!(f, "crypto"),
        }
    }
}

/// One executed trade, as stored and as fed to the metrics engine.
///
/// `side` is kept as the lowercased raw string rather than an enum: the
/// aggregator treats anything that is not "buy" as sell-sign, and that
/// permissiveness has to survive the ingestion boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Unique trade id.
    pub id: String,
    /// Owning user id, set at ingestion and never changed.
    pub user_id: String,
    /// Instrument identifier (free-form).
    pub symbol: String,
    /// Asset class, defaulting to stock.
    pub asset_type: AssetType,
    /// Units of the instrument, non-negative.
    pub quantity: f64,
    /// Execution price per unit.
    pub price: f64,
    /// "buy" or "sell" (lowercased; unrecognized values pass through).
    pub side: String,
    /// Execution time, ISO-8601 ("Z" suffix accepted).
    pub timestamp: String,
    /// Commission paid. Stored but not subtracted from notional P&L.
    #[serde(default)]
    pub fees: f64,
    /// Optional free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TradeRecord {
    /// Whether the trade counts with buy-sign in the P&L aggregation.
    pub fn is_buy(&self) -> bool {
        self.side.eq_ignore_ascii_case("buy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_parse_defaults_to_stock() {
        assert_eq!(AssetType::parse_or_default(None), AssetType::Stock);
        assert_eq!(AssetType::parse_or_default(Some("")), AssetType::Stock);
        assert_eq!(AssetType::parse_or_default(Some("bond")), AssetType::Stock);
        assert_eq!(AssetType::parse_or_default(Some("CRYPTO")), AssetType::Crypto);
        assert_eq!(AssetType::parse_or_default(Some("stock")), AssetType::Stock);
    }

    #[test]
    fn test_asset_type_serde_snake_case() {
        assert_eq!(serde_json::to_string(&AssetType::Crypto).unwrap(), "\"crypto\"");
        assert_eq!(serde_json::to_string(&AssetType::Stock).unwrap(), "\"stock\"");
    }

    #[test]
    fn test_is_buy_case_insensitive() {
        let mut trade = TradeRecord {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            symbol: "AAPL".to_string(),
            asset_type: AssetType::Stock,
            quantity: 1.0,
            price: 100.0,
            side: "Buy".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            fees: 0.0,
            notes: None,
        };
        assert!(trade.is_buy());

        trade.side = "sell".to_string();
        assert!(!trade.is_buy());

        // Unrecognized side takes sell-sign downstream.
        trade.side = "short".to_string();
        assert!(!trade.is_buy());
    }
}
