//! Checkpoint (test case) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Checkpoint database model
///
/// Checkpoints are keyed by their problem and their 0-based ordinal within it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Checkpoint {
    pub problem_id: i64,
    pub checkpoint_id: i32,
    /// Output must match byte for byte
    pub is_exactly_match: bool,
    pub score: i32,
    pub input: String,
    pub output: String,
}

/// One test case as submitted by an editor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TestCase {
    pub input: String,
    pub output: String,
}
