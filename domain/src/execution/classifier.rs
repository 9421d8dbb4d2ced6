//! Error classification of tool result text
//!
//! Tool results are free text. A result counts as an error when it contains
//! any of [`ERROR_KEYWORDS`], compared case-insensitively.

/// Substrings that mark a tool result as an error.
pub const ERROR_KEYWORDS: [&str; 6] = [
    "error",
    "failed",
    "invalid",
    "not one of",
    "validation",
    "timeout",
];

/// Whether `text` reads as an error outcome.
pub fn is_error_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    ERROR_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
