use eventhub::api;
use eventhub::config::Settings;
use eventhub::db::ConnectionManager;

use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventhub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting eventhub v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_env()?;
    let db = Arc::new(ConnectionManager::from_settings(&settings));

    if let Err(e) = db.migrate().await {
        warn!("Database not ready at startup, will connect on first request: {}", e);
    }

    let addr = settings.bind_addr();
    let app = api::build_router(db, settings)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
