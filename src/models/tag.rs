//! Problem tag model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Problem tag database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProblemTag {
    pub problem_tag_id: i64,
    /// Unique, derived from the name with [`crate::utils::slugify`]
    pub problem_tag_slug: String,
    pub problem_tag_name: String,
}
