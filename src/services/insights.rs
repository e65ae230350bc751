//! Insight assembly.
//!
//! Turns a metrics summary and daily series into a narrative advisory
//! record. Persistence of the result is the caller's concern and is
//! best-effort by contract.

use crate::services::metrics;
use crate::types::{DailyPnlPoint, Insight, InsightMetrics, MetricsSummary};

/// Build the advisory record for one user from freshly computed metrics.
pub fn build_insight(user_id: &str, summary: &MetricsSummary, daily: &[DailyPnlPoint]) -> Insight {
    let forecast = metrics::forecast(daily);

    let projection = match forecast {
        Some(value) => format!("Model projects next-day PnL around {:.2}.", value),
        None => "Insufficient data for projection.".to_string(),
    };
    let message = format!(
        "Your win rate is {}%. Estimated Sharpe {}. Max drawdown observed {}. {}",
        summary.win_rate, summary.sharpe, summary.max_drawdown, projection
    );

    Insight {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: "Daily Risk & Trend Overview".to_string(),
        message,
        tags: vec![
            "risk".to_string(),
            "trend".to_string(),
            "forecast".to_string(),
        ],
        metrics: InsightMetrics::from_summary(summary, forecast),
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, pnl: f64) -> DailyPnlPoint {
        DailyPnlPoint {
            timestamp: date.to_string(),
            pnl,
        }
    }

    #[test]
    fn test_insight_with_forecast() {
        let summary = MetricsSummary {
            total_return: 303.0,
            win_rate: 100.0,
            volatility: 3.6056,
            sharpe: 28.0121,
            max_drawdown: 0.0,
        };
        let daily = vec![
            point("2024-03-01", 100.0),
            point("2024-03-02", 105.0),
            point("2024-03-03", 98.0),
        ];

        let insight = build_insight("u1", &summary, &daily);

        assert_eq!(insight.user_id, "u1");
        assert_eq!(insight.title, "Daily Risk & Trend Overview");
        assert_eq!(insight.tags, vec!["risk", "trend", "forecast"]);
        assert!(insight.message.contains("win rate is 100%"));
        assert!(insight.message.contains("projects next-day PnL around 101.00"));
        // Summary fields and forecast are both embedded.
        assert_eq!(insight.metrics.forecast_pnl, Some(101.0));
        assert_eq!(insight.metrics.total_return, 303.0);
        assert_eq!(insight.metrics.risk_exposure, summary.volatility);
    }

    #[test]
    fn test_insight_without_data() {
        let insight = build_insight("u1", &MetricsSummary::zero(), &[]);
        assert!(insight.message.contains("Insufficient data for projection."));
        assert_eq!(insight.metrics.forecast_pnl, None);
    }
}
