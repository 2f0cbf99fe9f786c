use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use shopfront_api::{
    app,
    state::{AppState, AuthConfig, ListingLimits},
};
use shopfront_core::repository::CatalogStore;
use shopfront_store::app_config::{Config, StoreBackend};
use shopfront_store::{DbClient, MemoryStore, PgDocumentStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopfront_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Shopfront API on port {}", config.server.port);

    let store = connect_store(&config).await?;

    let app_state = AppState {
        store,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            bcrypt_cost: config.auth.bcrypt_cost,
        },
        listing: ListingLimits {
            default_limit: config.catalog.default_limit,
            max_limit: config.catalog.max_limit,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn CatalogStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let db = DbClient::new(config.database()?)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await?;
            Ok(Arc::new(PgDocumentStore::new(db.pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
