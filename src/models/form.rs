//! Inbound problem form
//!
//! The editor submits scalar fields alongside three JSON documents: the test
//! cases, the category slugs and the tag names. Those documents stay as raw
//! text until the form has passed validation.

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{NewProblem, TestCase},
};

/// Raw problem fields as submitted for creation or editing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemForm {
    pub problem_name: String,
    pub time_limit: i32,
    pub memory_limit: i32,
    pub description: String,
    pub hint: String,
    pub input_format: String,
    pub output_format: String,
    pub sample_input: String,
    pub sample_output: String,
    /// JSON array of `{"input": ..., "output": ...}` objects
    pub test_cases: String,
    /// JSON array of category slugs
    pub problem_categories: String,
    /// JSON array of tag display names
    pub problem_tags: String,
    pub is_public: bool,
    pub is_exactly_match: bool,
}

/// The decoded JSON documents of a [`ProblemForm`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemPayload {
    pub test_cases: Vec<TestCase>,
    pub category_slugs: Vec<String>,
    pub tag_names: Vec<String>,
}

impl ProblemForm {
    /// Build the transient problem described by this form
    pub fn to_new_problem(&self) -> NewProblem {
        NewProblem {
            is_public: self.is_public,
            problem_name: self.problem_name.clone(),
            time_limit: self.time_limit,
            memory_limit: self.memory_limit,
            description: self.description.clone(),
            hint: self.hint.clone(),
            input_format: self.input_format.clone(),
            output_format: self.output_format.clone(),
            sample_input: self.sample_input.clone(),
            sample_output: self.sample_output.clone(),
        }
    }

    /// Decode the test case, category and tag documents
    pub fn decode_payload(&self) -> AppResult<ProblemPayload> {
        let test_cases: Vec<TestCase> = serde_json::from_str(&self.test_cases)
            .map_err(|e| AppError::malformed_payload("test case", e))?;
        let category_slugs: Vec<String> = serde_json::from_str(&self.problem_categories)
            .map_err(|e| AppError::malformed_payload("category", e))?;
        let tag_names: Vec<String> = serde_json::from_str(&self.problem_tags)
            .map_err(|e| AppError::malformed_payload("tag", e))?;

        Ok(ProblemPayload {
            test_cases,
            category_slugs,
            tag_names,
        })
    }
}
