//! Text normalisation applied before classification
//!
//! The model was trained on text cleaned the same way, so this must stay in
//! lockstep with the exported vocabulary: lower-case, keep only `a-z` and
//! whitespace, collapse whitespace runs to one space, trim both ends.

/// Normalise raw email text into the canonical `[a-z ]*` form.
///
/// The result never has leading, trailing or doubled spaces, and
/// `normalize(&normalize(s)) == normalize(s)` for every input.
pub fn normalize(raw: &str) -> String {
    // Full Unicode lower-casing first: a few non-ASCII code points (e.g. the
    // Kelvin sign) lower-case into ASCII letters and must survive the filter.
    let lowered = raw.to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else if is_separator(c) {
            pending_space = true;
        }
    }

    out
}

/// Whitespace as regex `\s` sees it: Unicode whitespace plus the
/// U+001C..U+001F information separators.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{1c}'..='\u{1f}')
}

/// Check whether `text` already is in normalised form.
pub fn is_normalized(text: &str) -> bool {
    !text.starts_with(' ')
        && !text.ends_with(' ')
        && !text.contains("  ")
        && text.chars().all(|c| c == ' ' || c.is_ascii_lowercase())
}
