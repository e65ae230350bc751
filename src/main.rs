use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradelens::{app, config::Config, services::SqliteStore, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradelens=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting tradelens server on {}", config.bind_addr());

    // Open the store once at startup; every handler borrows it through state.
    let store = Arc::new(SqliteStore::new(&config.database_path)?);

    let state = AppState::new(config.clone(), store);
    let app = app(state);

    // Start the server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("tradelens server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
