//! Label normalization and slug derivation.
//!
//! Both functions are pure, total and idempotent. `normalize_label` folds the
//! dash- and space-like code points that show up in exported anatomy labels
//! into plain ASCII; `to_slug` collapses everything outside `[a-z0-9]` into
//! single underscores so the result is always a safe path segment.

fn is_dash_like(ch: char) -> bool {
    // Figure dash, en dash, em dash, horizontal bar.
    matches!(ch, '\u{2012}'..='\u{2015}')
}

fn is_space_like(ch: char) -> bool {
    // NBSP plus the en-quad..zero-width-space block.
    matches!(ch, '\u{00A0}' | '\u{2000}'..='\u{200B}')
}

/// Lowercases and folds dash-like and space-like code points, then trims.
///
/// Idempotent: `normalize_label(normalize_label(s)) == normalize_label(s)`.
pub fn normalize_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if is_dash_like(ch) {
            out.push('-');
        } else if is_space_like(ch) {
            out.push(' ');
        } else {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        }
    }
    out.trim().to_string()
}

/// Converts a label to a `[a-z0-9_]` slug.
///
/// Every maximal run of characters outside `[a-z0-9]` becomes a single `_`;
/// leading and trailing underscores are stripped. The output matches
/// `^[a-z0-9]+(_[a-z0-9]+)*$` or is empty.
pub fn to_slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    if out.ends_with('_') {
        out.pop();
    }
    out
}
