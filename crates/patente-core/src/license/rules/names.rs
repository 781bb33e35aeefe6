//! Name and place payload cleanup.

use super::patterns::DATE_LIKE;

fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c == ' ' || c == '\'' || c == '-'
}

/// Reduce a payload to letters, spaces, apostrophes and hyphens.
///
/// Returns `None` when fewer than `min_len` characters survive, so stray
/// single letters are not taken for a name.
pub fn clean_name(payload: &str, min_len: usize) -> Option<String> {
    let filtered: String = payload
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|&c| is_name_char(c))
        .collect();

    let name = filtered
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c| c == '-' || c == '\'' || c == ' ')
        .to_string();

    if name.chars().count() < min_len.max(1) {
        return None;
    }
    Some(name)
}

/// Clean a birth-place payload, dropping any date-like text OCR may have
/// duplicated into it.
pub fn clean_place(payload: &str, min_len: usize) -> Option<String> {
    let without_dates = DATE_LIKE.replace_all(payload, " ");
    clean_name(&without_dates, min_len)
}
