//! Input validation utilities

use crate::{
    constants::MAX_PROBLEM_NAME_LENGTH,
    models::{NewProblem, ProblemChecks},
};

/// Run every field check on a candidate problem
///
/// Total over any input: empty strings and non-positive limits are ordinary
/// values that simply fail their check.
pub fn check_problem(problem: &NewProblem) -> ProblemChecks {
    ProblemChecks {
        problem_name_present: !problem.problem_name.is_empty(),
        problem_name_legal: is_problem_name_legal(&problem.problem_name),
        time_limit_legal: problem.time_limit > 0,
        memory_limit_legal: problem.memory_limit > 0,
        description_present: !problem.description.is_empty(),
        input_format_present: !problem.input_format.is_empty(),
        output_format_present: !problem.output_format.is_empty(),
        sample_input_present: !problem.sample_input.is_empty(),
        sample_output_present: !problem.sample_output.is_empty(),
    }
}

/// Validate problem name length (in characters)
pub fn is_problem_name_legal(problem_name: &str) -> bool {
    problem_name.chars().count() <= MAX_PROBLEM_NAME_LENGTH
}
