//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// LOGGING DEFAULTS
// =============================================================================

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_RUST_LOG: &str = "info";

/// Log output formats
pub mod log_formats {
    pub const TEXT: &str = "text";
    pub const JSON: &str = "json";

    /// All supported log formats
    pub const ALL: &[&str] = &[TEXT, JSON];
}

// =============================================================================
// PROBLEM RULES
// =============================================================================

/// Maximum problem name length, in characters
pub const MAX_PROBLEM_NAME_LENGTH: usize = 128;

/// Sum of the scores of every checkpoint of a problem
pub const TOTAL_CHECKPOINT_SCORE: i32 = 100;

/// Category assigned to problems submitted without any category
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

/// Display name of the fallback category
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Category identifier meaning "no category filter"
pub const NO_CATEGORY_FILTER: i32 = 0;
