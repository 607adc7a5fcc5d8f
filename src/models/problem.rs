//! Problem model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Problem database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Problem {
    pub problem_id: i64,
    pub is_public: bool,
    pub problem_name: String,
    /// Time limit in milliseconds
    pub time_limit: i32,
    /// Memory limit in kilobytes
    pub memory_limit: i32,
    pub description: String,
    pub hint: String,
    pub input_format: String,
    pub output_format: String,
    pub sample_input: String,
    pub sample_output: String,
}

/// A problem that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewProblem {
    pub is_public: bool,
    pub problem_name: String,
    pub time_limit: i32,
    pub memory_limit: i32,
    pub description: String,
    pub hint: String,
    pub input_format: String,
    pub output_format: String,
    pub sample_input: String,
    pub sample_output: String,
}

impl NewProblem {
    /// Attach an identifier, producing the persisted shape of this problem
    pub fn with_id(self, problem_id: i64) -> Problem {
        Problem {
            problem_id,
            is_public: self.is_public,
            problem_name: self.problem_name,
            time_limit: self.time_limit,
            memory_limit: self.memory_limit,
            description: self.description,
            hint: self.hint,
            input_format: self.input_format,
            output_format: self.output_format,
            sample_input: self.sample_input,
            sample_output: self.sample_output,
        }
    }
}
