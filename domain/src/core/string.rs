//! String utilities for the domain layer.

/// Single-line preview of free-form model output.
///
/// Collapses all whitespace runs (including newlines) into single spaces and
/// cuts the result at `max_chars` characters, appending `...` when cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = flat.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Character length as a reader would count it (not bytes).
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
