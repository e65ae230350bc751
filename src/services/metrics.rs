//! Performance metrics engine.
//!
//! Pure, stateless functions from a collection of trade records to an
//! ordered daily P&L series and a scalar summary (return, win rate,
//! volatility, Sharpe, max drawdown), plus a trailing-average forecast.
//!
//! Fault policy: a trade with an unparseable timestamp is skipped
//! silently; empty or degenerate inputs yield zeroed statistics, never an
//! error or NaN. Callers rely on this permissiveness for partial results.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{DailyPnlPoint, MetricsSummary, TradeRecord};

/// Trailing window for the next-day P&L projection.
const FORECAST_WINDOW: usize = 3;

/// Volatility below this is treated as zero when computing Sharpe, to
/// avoid division blow-up on near-constant series.
const VOLATILITY_EPSILON: f64 = 1e-9;

/// Extract the UTC calendar date from an ISO-8601 timestamp string.
///
/// Accepts a "Z" suffix or an explicit offset, a bare datetime with no
/// offset, or a bare date.
fn trade_date(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d").ok()
}

/// Round to a fixed number of decimal places for presentation.
fn round_dp(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Aggregate an unordered collection of trades into a daily P&L series,
/// ascending by date, one point per calendar date with at least one trade.
///
/// Per-trade notional is price x quantity, signed +1 for "buy"
/// (case-insensitive) and -1 otherwise; an unrecognized side takes
/// sell-sign. Fees are stored on the record but not subtracted here.
pub fn aggregate_daily(trades: &[TradeRecord]) -> Vec<DailyPnlPoint> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for trade in trades {
        let Some(date) = trade_date(&trade.timestamp) else {
            // Unparseable timestamp: skip the record, keep the rest.
            continue;
        };
        let sign = if trade.is_buy() { 1.0 } else { -1.0 };
        let notional = trade.price * trade.quantity * sign;
        *buckets.entry(date).or_insert(0.0) += notional;
    }

    buckets
        .into_iter()
        .map(|(date, pnl)| DailyPnlPoint {
            timestamp: date.format("%Y-%m-%d").to_string(),
            pnl,
        })
        .collect()
}

/// Compute the scalar summary from an ordered daily P&L value sequence.
///
/// Internal arithmetic runs at full precision; outputs are rounded for
/// presentation (4 decimal places, win rate 2).
pub fn summarize(pnl: &[f64]) -> MetricsSummary {
    let n = pnl.len();
    let total_return: f64 = pnl.iter().sum();

    let wins = pnl.iter().filter(|v| **v > 0.0).count();
    let win_rate = if n > 0 {
        wins as f64 / n as f64 * 100.0
    } else {
        0.0
    };

    let mean = if n > 0 { total_return / n as f64 } else { 0.0 };

    // Sample variance, divisor n - 1; zero for degenerate series.
    let variance = if n > 1 {
        pnl.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };
    let volatility = variance.sqrt();

    let sharpe = if volatility > VOLATILITY_EPSILON {
        mean / volatility
    } else {
        0.0
    };

    // Max drawdown on the cumulative series: running peak minus current
    // cumulative sum, tracked as a non-decreasing maximum.
    let mut cumulative = 0.0;
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown: f64 = 0.0;
    for v in pnl {
        cumulative += v;
        if cumulative > peak {
            peak = cumulative;
        }
        max_drawdown = max_drawdown.max(peak - cumulative);
    }

    MetricsSummary {
        total_return: round_dp(total_return, 4),
        win_rate: round_dp(win_rate, 2),
        volatility: round_dp(volatility, 4),
        sharpe: round_dp(sharpe, 4),
        max_drawdown: round_dp(max_drawdown, 4),
    }
}

/// Naive next-day projection: arithmetic mean of the last
/// [`FORECAST_WINDOW`] daily P&L values. `None` for an empty series, so
/// "insufficient data" stays distinguishable from a zero projection.
pub fn forecast(daily: &[DailyPnlPoint]) -> Option<f64> {
    if daily.is_empty() {
        return None;
    }
    let tail = &daily[daily.len().saturating_sub(FORECAST_WINDOW)..];
    let mean = tail.iter().map(|p| p.pnl).sum::<f64>() / tail.len() as f64;
    Some(round_dp(mean, 4))
}

/// Full computation for one user's trade history: daily series + summary.
pub fn compute(trades: &[TradeRecord]) -> (MetricsSummary, Vec<DailyPnlPoint>) {
    let daily = aggregate_daily(trades);
    let pnl: Vec<f64> = daily.iter().map(|p| p.pnl).collect();
    (summarize(&pnl), daily)
}
