//! Problem category model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Problem category database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProblemCategory {
    pub problem_category_id: i32,
    pub problem_category_slug: String,
    pub problem_category_name: String,
}
