//! Shared utility functions.

use std::borrow::Cow;

/// Shorten `s` to at most `max_chars` characters, marking the cut with `...`.
///
/// Counts characters rather than bytes, so multi-byte text is never split.
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        None => Cow::Borrowed(s),
        Some(_) => {
            let keep = max_chars.saturating_sub(3);
            let end = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
            Cow::Owned(format!("{}...", &s[..end]))
        }
    }
}

/// First line of `s`, for single-line status output.
pub fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or_default()
}
