//! Problem creation and edit outcomes

use serde::Serialize;

/// Result of every field check on a candidate problem
///
/// Each flag is `true` when its check passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemChecks {
    pub problem_name_present: bool,
    pub problem_name_legal: bool,
    pub time_limit_legal: bool,
    pub memory_limit_legal: bool,
    pub description_present: bool,
    pub input_format_present: bool,
    pub output_format_present: bool,
    pub sample_input_present: bool,
    pub sample_output_present: bool,
}

impl ProblemChecks {
    /// Whether every check passed
    pub fn passed(&self) -> bool {
        self.problem_name_present
            && self.problem_name_legal
            && self.time_limit_legal
            && self.memory_limit_legal
            && self.description_present
            && self.input_format_present
            && self.output_format_present
            && self.sample_input_present
            && self.sample_output_present
    }
}

/// What a create or edit request produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemOutcome {
    #[serde(flatten)]
    pub checks: ProblemChecks,
    /// Only reported for edits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_exists: Option<bool>,
    pub successful: bool,
    /// Identifier assigned by a successful creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<i64>,
}

impl ProblemOutcome {
    /// Outcome of a creation request before anything is persisted
    pub fn for_creation(checks: ProblemChecks) -> Self {
        Self {
            checks,
            problem_exists: None,
            successful: checks.passed(),
            problem_id: None,
        }
    }

    /// Outcome of an edit request; a missing problem always fails
    pub fn for_edit(checks: ProblemChecks, problem_exists: bool) -> Self {
        Self {
            checks,
            problem_exists: Some(problem_exists),
            successful: checks.passed() && problem_exists,
            problem_id: None,
        }
    }
}
