//! Problemset - Online Judge Problem Management
//!
//! This library provides the problem management layer of an online judge:
//! problems, their checkpoints (test cases), categories and tags.
//!
//! # Features
//!
//! - Field validation reported as named checks rather than errors
//! - Checkpoint scores split so every problem totals 100
//! - Category fallback to `uncategorized` and slug-deduplicated tags
//! - Every create, edit, delete and read in a single unit of work
//!
//! # Architecture
//!
//! The crate follows a layered architecture:
//! - **Services**: Business logic
//! - **Gateways**: Mapper traits over one transaction, backed by PostgreSQL
//!   repositories or an in-memory store
//! - **Models**: Domain models and DTOs

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::ProblemService;
pub use state::AppState;
