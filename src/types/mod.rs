pub mod auth;
pub mod insight;
pub mod metrics;
pub mod trade;

pub use auth::*;
pub use insight::*;
pub use metrics::*;
pub use trade::*;
