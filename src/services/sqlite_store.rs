//! SQLite persistence layer.
//!
//! Holds the three document collections the backend needs: user accounts,
//! uploaded trade records, and generated insights. The store is plain
//! insert/find plumbing; every derived number lives in the metrics engine.

use crate::types::{Insight, InsightMetrics, TradeRecord, User};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info};

/// SQLite-backed document store for users, trades, and insights.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn new_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                name TEXT,
                role TEXT NOT NULL DEFAULT 'trader',
                password_digest TEXT,
                session_token TEXT,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_users_session_token ON users(session_token)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS trades (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                asset_type TEXT NOT NULL,
                quantity REAL NOT NULL,
                price REAL NOT NULL,
                side TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                fees REAL NOT NULL DEFAULT 0,
                notes TEXT
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_trades_user_id ON trades(user_id)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS insights (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                tags_json TEXT NOT NULL DEFAULT '[]',
                metrics_json TEXT NOT NULL DEFAULT '{}',
                created_at INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_insights_user_id ON insights(user_id)",
            [],
        )?;

        info!("SQLite schema initialized");
        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: row.get(3)?,
            password_digest: row.get(4)?,
            session_token: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    // ========== User Methods ==========

    /// Get a user by email.
    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        let conn = self.conn.lock().unwrap();
        let result = conn
            .query_row(
                "SELECT id, email, name, role, password_digest, session_token, created_at
                 FROM users WHERE email = ?1",
                params![email],
                Self::row_to_user,
            )
            .optional();

        match result {
            Ok(user) => user,
            Err(e) => {
                error!("Error fetching user by email: {}", e);
                None
            }
        }
    }

    /// Get a user by session token, falling back to the user id itself.
    ///
    /// The id fallback keeps older clients working that stored the user id
    /// where the session token belongs.
    pub fn get_user_by_token(&self, token: &str) -> Option<User> {
        let conn = self.conn.lock().unwrap();
        let result = conn
            .query_row(
                "SELECT id, email, name, role, password_digest, session_token, created_at
                 FROM users WHERE session_token = ?1 OR id = ?1",
                params![token],
                Self::row_to_user,
            )
            .optional();

        match result {
            Ok(user) => user,
            Err(e) => {
                error!("Error fetching user by token: {}", e);
                None
            }
        }
    }

    /// Insert a new user.
    pub fn create_user(&self, user: &User) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, email, name, role, password_digest, session_token, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id,
                user.email,
                user.name,
                user.role,
                user.password_digest,
                user.session_token,
                user.created_at,
            ],
        )?;
        debug!("Created user {}", user.email);
        Ok(())
    }

    /// Store the current session token for a user.
    pub fn set_session_token(&self, user_id: &str, token: &str) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET session_token = ?1 WHERE id = ?2",
            params![token, user_id],
        )?;
        Ok(())
    }

    /// Total user count.
    pub fn user_count(&self) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap_or(0)
    }

    // ========== Trade Methods ==========

    /// Insert one validated trade record.
    pub fn insert_trade(&self, trade: &TradeRecord) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO trades (id, user_id, symbol, asset_type, quantity, price, side,
                                 timestamp, fees, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                trade.id,
                trade.user_id,
                trade.symbol,
                trade.asset_type.to_string(),
                trade.quantity,
                trade.price,
                trade.side,
                trade.timestamp,
                trade.fees,
                trade.notes,
            ],
        )?;
        Ok(())
    }

    /// All trades belonging to one user. An empty Vec is the valid
    /// representation of "no trades", never an error.
    pub fn trades_for_user(&self, user_id: &str) -> Vec<TradeRecord> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = match conn.prepare(
            "SELECT id, user_id, symbol, asset_type, quantity, price, side,
                    timestamp, fees, notes
             FROM trades WHERE user_id = ?1",
        ) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing trade query: {}", e);
                return Vec::new();
            }
        };

        let rows = stmt.query_map(params![user_id], |row| {
            let asset_type: String = row.get(3)?;
            Ok(TradeRecord {
                id: row.get(0)?,
                user_id: row.get(1)?,
                symbol: row.get(2)?,
                asset_type: crate::types::AssetType::parse_or_default(Some(&asset_type)),
                quantity: row.get(4)?,
                price: row.get(5)?,
                side: row.get(6)?,
                timestamp: row.get(7)?,
                fees: row.get(8)?,
                notes: row.get(9)?,
            })
        });

        match rows {
            Ok(rows) => rows.filter_map(|r| r.ok()).collect(),
            Err(e) => {
                error!("Error fetching trades: {}", e);
                Vec::new()
            }
        }
    }

    /// Total trade count across all users.
    pub fn trade_count(&self) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))
            .unwrap_or(0)
    }

    // ========== Insight Methods ==========

    /// Persist a generated insight. Callers treat failure as non-fatal.
    pub fn insert_insight(&self, insight: &Insight) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let tags_json = serde_json::to_string(&insight.tags).unwrap_or_default();
        let metrics_json = serde_json::to_string(&insight.metrics).unwrap_or_default();

        conn.execute(
            "INSERT INTO insights (id, user_id, title, message, tags_json, metrics_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                insight.id,
                insight.user_id,
                insight.title,
                insight.message,
                tags_json,
                metrics_json,
                insight.created_at,
            ],
        )?;
        debug!("Archived insight for user {}", insight.user_id);
        Ok(())
    }

    /// Stored insights for one user, newest first.
    pub fn insights_for_user(&self, user_id: &str) -> Vec<Insight> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = match conn.prepare(
            "SELECT id, user_id, title, message, tags_json, metrics_json, created_at
             FROM insights WHERE user_id = ?1 ORDER BY created_at DESC",
        ) {
            Ok(stmt) => stmt,
            Err(e) => {
                error!("Error preparing insight query: {}", e);
                return Vec::new();
            }
        };

        let rows = stmt.query_map(params![user_id], |row| {
            let tags_json: String = row.get(4)?;
            let metrics_json: String = row.get(5)?;
            Ok(Insight {
                id: row.get(0)?,
                user_id: row.get(1)?,
                title: row.get(2)?,
                message: row.get(3)?,
                tags: serde_json::from_str(&tags_json).unwrap_or_default(),
                metrics: serde_json::from_str::<InsightMetrics>(&metrics_json)
                    .unwrap_or_else(|_| {
                        InsightMetrics::from_summary(&crate::types::MetricsSummary::zero(), None)
                    }),
                created_at: row.get(6)?,
            })
        });

        match rows {
            Ok(rows) => rows.filter_map(|r| r.ok()).collect(),
            Err(e) => {
                error!("Error fetching insights: {}", e);
                Vec::new()
            }
        }
    }
}
