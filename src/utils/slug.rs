//! Slug generation for tag names

use std::sync::LazyLock;

use regex::Regex;

/// Runs of anything that is neither a letter nor a digit
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("separator pattern is valid"));

/// Derive the URL-safe slug of a display name
///
/// Names that differ only in case or punctuation share a slug.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
