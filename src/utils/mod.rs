//! Utility functions

pub mod scoring;
pub mod slug;
pub mod validation;

pub use scoring::split_scores;
pub use slug::slugify;
pub use validation::{check_problem, is_problem_name_legal};
