/// Media Service - HTTP Server
///
/// Serves the video catalog.
use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use media_service::db::{self, PgVideoRepository, VideoRepository};
use media_service::handlers;
use media_service::Config;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,media_service=debug,media_studio=debug".into());
    if config.log.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(env = %config.app.env, "Starting media-service");

    let db_pool = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;
    let repo: Arc<dyn VideoRepository> = Arc::new(PgVideoRepository::new(db_pool));
    let repo = web::Data::from(repo);

    let bind_address = config.bind_address();
    tracing::info!(address = %bind_address, "HTTP server listening");

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .wrap(actix_middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .run()
    .await
    .context("HTTP server failed")?;

    tracing::info!("Media-service shutting down");
    Ok(())
}
