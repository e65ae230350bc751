//! Insight Types
//!
//! Generated advisory records. An insight embeds a snapshot of the metrics
//! summary plus the forecast; it is persisted best-effort and is never the
//! source of truth for metrics.

use serde::{Deserialize, Serialize};

use crate::types::MetricsSummary;

/// Metrics snapshot embedded in an insight.
///
/// Carries every summary field plus the volatility copy under
/// `risk_exposure` and the next-day forecast. The forecast is `None`
/// (serialized as null) when fewer than one daily point exists, so
/// "insufficient data" stays distinguishable from a zero projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightMetrics {
    pub risk_exposure: f64,
    pub total_return: f64,
    pub win_rate: f64,
    pub volatility: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub forecast_pnl: Option<f64>,
}

impl InsightMetrics {
    pub fn from_summary(summary: &MetricsSummary, forecast: Option<f64>) -> Self {
        Self {
            risk_exposure: summary.volatility,
            total_return: summary.total_return,
            win_rate: summary.win_rate,
            volatility: summary.volatility,
            sharpe: summary.sharpe,
            max_drawdown: summary.max_drawdown,
            forecast_pnl: forecast,
        }
    }
}

/// A generated advisory record for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    /// Unique insight id.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Short headline.
    pub title: String,
    /// Human-readable narrative.
    pub message: String,
    /// Classification tags.
    pub tags: Vec<String>,
    /// Embedded metrics snapshot.
    pub metrics: InsightMetrics,
    /// Creation time (ms since epoch).
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_metrics_embeds_summary_and_forecast() {
        let summary = MetricsSummary {
            total_return: 303.0,
            win_rate: 100.0,
            volatility: 3.6056,
            sharpe: 28.0121,
            max_drawdown: 0.0,
        };
        let metrics = InsightMetrics::from_summary(&summary, Some(101.0));

        // Summary fields are not omitted when the forecast is present.
        assert_eq!(metrics.total_return, 303.0);
        assert_eq!(metrics.risk_exposure, summary.volatility);
        assert_eq!(metrics.forecast_pnl, Some(101.0));
    }

    #[test]
    fn test_absent_forecast_serializes_as_null() {
        let metrics = InsightMetrics::from_summary(&MetricsSummary::zero(), None);
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("\"forecast_pnl\":null"));
    }
}
