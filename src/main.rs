use insurance_funnel_api::app::build_router;
use insurance_funnel_api::config::{Config, StorageBackend};
use insurance_funnel_api::db::Database;
use insurance_funnel_api::handlers::AppState;
use insurance_funnel_api::store::{FunnelStore, MemoryFunnelStore, PgFunnelStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, loads configuration, opens the record store and
/// serves the procedure routes until the process is stopped.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurance_funnel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn FunnelStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres storage"))?;
            let db = Database::new(database_url, config.db_max_connections).await?;
            tracing::info!("Database connection pool established");
            db.ensure_schema().await?;
            Arc::new(PgFunnelStore::new(db.pool.clone()))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            Arc::new(MemoryFunnelStore::new())
        }
    };

    let app_state = Arc::new(AppState { store });
    let app = build_router(app_state, config.rate_limit)?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Insurance funnel server listening on {}", addr);

    // Peer addresses feed the per-IP rate limiter when no proxy headers are set.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
