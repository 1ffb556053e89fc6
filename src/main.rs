//! Shopfront Orders - order service binary.

use anyhow::Result;
use shopfront_orders::api::{self, AppState};
use shopfront_orders::config::Config;
use shopfront_orders::service::OrderService;
use shopfront_orders::store::postgres::{PgCartStore, PgOrderStore, PgUserDirectory};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let nats = match &config.nats_url {
        Some(url) => Some(async_nats::connect(url.as_str()).await?),
        None => None,
    };

    let service = OrderService::new(
        Arc::new(PgUserDirectory::new(db.clone())),
        Arc::new(PgCartStore::new(db.clone())),
        Arc::new(PgOrderStore::new(db)),
        nats,
    );

    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config.clone()),
    };
    let app = api::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("shopfront-orders listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
