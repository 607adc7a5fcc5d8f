//! Application state management
//!
//! This module contains the shared application state handed to whatever
//! drives the problem service.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{config::Config, db::PgDatabase, services::ProblemService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Problem service over the database pool
    pub problems: ProblemService<PgDatabase>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                problems: ProblemService::new(PgDatabase::new(db)),
                config,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        self.inner.problems.database().pool()
    }

    /// Get a reference to the problem service
    pub fn problems(&self) -> &ProblemService<PgDatabase> {
        &self.inner.problems
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
