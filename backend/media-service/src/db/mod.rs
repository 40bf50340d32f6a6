/// Database access layer
///
/// Connection pooling, migrations and the video repository.
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

pub mod video_repo;

pub use video_repo::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;
    info!(max_connections = config.max_connections, "Database pool created");

    if config.run_migrations {
        info!("Running database migrations");
        MIGRATOR.run(&pool).await?;
        info!("Migrations completed");
    }
    Ok(pool)
}
