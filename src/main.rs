use pet_adoption::{
    app_router, AppConfig, AppState, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pet_adoption=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting pet adoption server");

    let config = AppConfig::from_env()?;

    // PostgreSQL when DATABASE_URL is set, otherwise everything lives in memory
    let store: Arc<dyn DocumentStore + Send + Sync> = match &config.database_url {
        Some(url) => Arc::new(PostgresDocumentStore::connect(url).await?),
        None => {
            warn!("DATABASE_URL not set, using in-memory document store");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    let addr = config.socket_addr();
    let app = app_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
