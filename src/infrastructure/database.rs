use crate::infrastructure::config::DatabaseConfig;
use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Builds the pool shared by all requests. Connections are opened lazily up to
/// `max_connections` and kept at `min_connections` when idle.
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Initializing database connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(&config.database_url)
        .await?;

    info!("Database connection pool initialized");
    Ok(pool)
}
