//! Database module
//!
//! This module handles database connections, migrations, the persistence
//! gateways and their PostgreSQL and in-memory implementations.

pub mod connection;
pub mod gateway;
pub mod memory;
pub mod postgres;
pub mod repositories;

use sqlx::PgPool;

use crate::error::AppResult;

pub use connection::*;
pub use gateway::{
    CheckpointMapper, Database, ProblemCategoryMapper, ProblemMapper, ProblemTagMapper, UnitOfWork,
};
pub use memory::MemoryDatabase;
pub use postgres::PgDatabase;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
