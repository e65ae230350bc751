//! End-to-end service tests: login, CSV ingestion, storage, metrics, and
//! insight assembly wired together the way the handlers use them.

use std::sync::Arc;

use tradelens::services::{insights, metrics, parse_trades, AuthService, SqliteStore};
use tradelens::types::LoginRequest;

const CSV: &str = "\
symbol,asset_type,quantity,price,side,timestamp,fees,notes
AAPL,stock,1,100,buy,2024-03-01T10:00:00Z,0.5,
AAPL,stock,1,105,buy,2024-03-02T10:00:00Z,0.5,
AAPL,stock,1,98,buy,2024-03-03T10:00:00Z,0.5,
AAPL,stock,bad,98,buy,2024-03-04T10:00:00Z,,typo row
";

#[test]
fn test_upload_to_insight_flow() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let auth = AuthService::new(store.clone());

    // Login auto-creates the account.
    let login = auth
        .login(&LoginRequest {
            email: "trader@example.com".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
    let user = auth.resolve_token(&login.token).unwrap();

    // Ingest the CSV; the typo row is skipped, not fatal.
    let outcome = parse_trades(CSV, &user.id).unwrap();
    assert_eq!(outcome.trades.len(), 3);
    assert_eq!(outcome.skipped, 1);
    for trade in &outcome.trades {
        store.insert_trade(trade).unwrap();
    }

    // Metrics over the stored history.
    let trades = store.trades_for_user(&user.id);
    let (summary, daily) = metrics::compute(&trades);
    assert_eq!(summary.total_return, 303.0);
    assert_eq!(summary.win_rate, 100.0);
    assert_eq!(daily.len(), 3);

    // Insight embeds the summary and the trailing-3 forecast.
    let insight = insights::build_insight(&user.id, &summary, &daily);
    assert_eq!(insight.metrics.forecast_pnl, Some(101.0));
    assert!(insight.message.contains("101.00"));

    // Archive and read back.
    store.insert_insight(&insight).unwrap();
    let archived = store.insights_for_user(&user.id);
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].metrics.total_return, 303.0);
}

#[test]
fn test_unknown_user_has_empty_portfolio() {
    let store = SqliteStore::new_in_memory().unwrap();
    let trades = store.trades_for_user("nobody");
    assert!(trades.is_empty());

    let (summary, daily) = metrics::compute(&trades);
    assert_eq!(summary.total_return, 0.0);
    assert!(daily.is_empty());
}

#[test]
fn test_trades_are_isolated_per_user() {
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());

    let a = parse_trades(
        "symbol,asset_type,quantity,price,side,timestamp\nAAPL,stock,1,100,buy,2024-03-01T10:00:00Z",
        "user-a",
    )
    .unwrap();
    let b = parse_trades(
        "symbol,asset_type,quantity,price,side,timestamp\nBTC,crypto,2,50,sell,2024-03-01T10:00:00Z",
        "user-b",
    )
    .unwrap();
    for trade in a.trades.iter().chain(b.trades.iter()) {
        store.insert_trade(trade).unwrap();
    }

    let (summary_a, _) = metrics::compute(&store.trades_for_user("user-a"));
    let (summary_b, _) = metrics::compute(&store.trades_for_user("user-b"));
    assert_eq!(summary_a.total_return, 100.0);
    assert_eq!(summary_b.total_return, -100.0);
}
