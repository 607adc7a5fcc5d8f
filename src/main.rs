//! Problemset - Maintenance Entry Point
//!
//! Connects to the database, applies pending migrations and reports what the
//! problem store currently holds.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use problemset::{config::CONFIG, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| CONFIG.telemetry.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if CONFIG.telemetry.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting problemset...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::connect(&CONFIG.database).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    let state = AppState::new(db_pool, CONFIG.clone());
    let problems = state.problems();

    let categories = problems.get_problem_categories().await?;
    tracing::info!(
        "Problem store ready: {} problems, {} checkpoints, {} categories (first problem id {})",
        problems.get_number_of_problems().await?,
        problems.get_number_of_checkpoints().await?,
        categories.len(),
        problems.get_first_index_of_problems().await?
    );

    state.db().close().await;
    Ok(())
}
