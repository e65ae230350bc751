pub mod auth;
pub mod ingest;
pub mod insights;
pub mod metrics;
pub mod sqlite_store;

pub use auth::{AuthError, AuthService};
pub use ingest::{parse_trades, IngestError, IngestOutcome};
pub use sqlite_store::SqliteStore;
