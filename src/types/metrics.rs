//! Metrics Types
//!
//! Output types of the metrics engine. The serde field names
//! (`total_return`, `win_rate`, `volatility`, `sharpe`, `max_drawdown`,
//! and `timestamp`/`pnl` on daily points) are an interface contract the
//! frontend depends on.

use serde::{Deserialize, Serialize};

/// One entry in the daily P&L series: a calendar date and the signed
/// notional sum of all trades executed on that date. Dates with no trades
/// are not represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPnlPoint {
    /// ISO calendar date (YYYY-MM-DD).
    pub timestamp: String,
    /// Signed notional P&L for the date.
    pub pnl: f64,
}

/// Scalar performance summary, recomputed from the full trade history on
/// every request. Never persisted as authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Sum of all daily P&L values.
    pub total_return: f64,
    /// Percentage of strictly positive daily points, in [0, 100].
    pub win_rate: f64,
    /// Sample standard deviation of the daily series (0 if n <= 1).
    pub volatility: f64,
    /// Mean daily P&L / volatility; 0 when volatility is near zero.
    pub sharpe: f64,
    /// Largest peak-to-trough decline of cumulative P&L, >= 0.
    pub max_drawdown: f64,
}

impl MetricsSummary {
    /// The well-defined summary for an empty trade collection.
    pub fn zero() -> Self {
        Self {
            total_return: 0.0,
            win_rate: 0.0,
            volatility: 0.0,
            sharpe: 0.0,
            max_drawdown: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_field_names() {
        let json = serde_json::to_string(&MetricsSummary::zero()).unwrap();
        for field in [
            "total_return",
            "win_rate",
            "volatility",
            "sharpe",
            "max_drawdown",
        ] {
            assert!(json.contains(field), "missing field {}", field);
        }
    }

    #[test]
    fn test_daily_point_field_names() {
        let point = DailyPnlPoint {
            timestamp: "2024-01-01".to_string(),
            pnl: 12.5,
        };
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"timestamp\":\"2024-01-01\""));
        assert!(json.contains("\"pnl\":12.5"));
    }

    #[test]
    fn test_zero_summary() {
        let zero = MetricsSummary::zero();
        assert_eq!(zero.total_return, 0.0);
        assert_eq!(zero.win_rate, 0.0);
        assert_eq!(zero.volatility, 0.0);
        assert_eq!(zero.sharpe, 0.0);
        assert_eq!(zero.max_drawdown, 0.0);
    }
}
