pub mod models;
pub mod repository;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::repository::StoreError;

/// Open the record store connection pool. The pool is owned by the caller
/// and handed to whatever needs it; `close` releases it on shutdown.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let url = config
        .url
        .as_deref()
        .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url)
        .await?;

    info!("Connected to record store");
    Ok(pool)
}

/// Create the ideas table when missing. First-run setup only; there is no
/// migration machinery behind this.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ideas (\
             id UUID PRIMARY KEY DEFAULT gen_random_uuid(),\
             title TEXT NOT NULL,\
             summary TEXT NOT NULL,\
             description TEXT NOT NULL,\
             tags TEXT[] NOT NULL DEFAULT '{}',\
             user_id UUID NOT NULL,\
             created_at TIMESTAMPTZ NOT NULL DEFAULT now(),\
             updated_at TIMESTAMPTZ NOT NULL DEFAULT now()\
         )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Close the pool on shutdown
pub async fn close(pool: PgPool) {
    pool.close().await;
    info!("Closed record store pool");
}
