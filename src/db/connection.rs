//! Database connection management

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{config::DatabaseConfig, error::AppResult};

/// Open the connection pool and make sure the server answers
pub async fn connect(config: &DatabaseConfig) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    tracing::debug!(
        "Database pool ready (max {} connections)",
        config.max_connections
    );

    Ok(pool)
}
