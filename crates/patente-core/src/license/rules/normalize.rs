//! OCR text normalization ahead of marker matching.

use super::patterns::{PARENTHESIZED_WORD, WHITESPACE};

/// Characters kept besides ASCII uppercase letters and digits.
const ALLOWED_PUNCTUATION: [char; 6] = ['/', '.', ':', '-', '(', ')'];

/// Normalize raw OCR output into a single uppercase line.
///
/// 1. uppercase;
/// 2. whitespace becomes a space, anything outside
///    `A-Z 0-9 space / . : - ( )` is dropped;
/// 3. parentheses around a letter run are removed (`ROMA (RM)` → `ROMA RM`);
/// 4. whitespace runs collapse to one space, ends are trimmed.
///
/// The result is a fixed point: normalizing it again changes nothing.
pub fn normalize(raw: &str) -> String {
    let filtered: String = raw
        .to_uppercase()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if c.is_ascii_uppercase() || c.is_ascii_digit() || ALLOWED_PUNCTUATION.contains(&c) {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let unwrapped = unwrap_parentheses(&filtered);

    WHITESPACE.replace_all(&unwrapped, " ").trim().to_string()
}

/// Strip parentheses around letter runs until none are left, so nested
/// `((RM))` ends up as `RM` too.
fn unwrap_parentheses(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = PARENTHESIZED_WORD.replace_all(&current, " $1 ").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase_and_strip_noise() {
        assert_eq!(normalize("1.  rossi!! 2. mario??"), "1. ROSSI 2. MARIO");
    }

    #[test]
    fn test_line_breaks_become_spaces() {
        assert_eq!(normalize("1. ROSSI\n2. MARIO\r\n\t3. 01/02/85"), "1. ROSSI 2. MARIO 3. 01/02/85");
    }

    #[test]
    fn test_province_parentheses_removed() {
        assert_eq!(normalize("3. 01/02/85 Roma (RM)"), "3. 01/02/85 ROMA RM");
        assert_eq!(normalize("MILANO(MI)"), "MILANO MI");
        assert_eq!(normalize("((RM))"), "RM");
    }

    #[test]
    fn test_non_letter_parentheses_kept() {
        assert_eq!(normalize("(12) ( )"), "(12) ( )");
    }

    #[test]
    fn test_keeps_field_punctuation() {
        assert_eq!(normalize("4a. 01-01-2020 4c. mit-uco: x/y"), "4A. 01-01-2020 4C. MIT-UCO: X/Y");
    }

    #[test]
    fn test_diacritics_and_apostrophes_dropped() {
        assert_eq!(normalize("D'Orba Forlì"), "DORBA FORL");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "1.  rossi!! 2. mario??",
            "3. 01/02/85 (( roma )) (RM)\n4B. 01.01.2030",
            "ß straße ÀÉÎ (x(y)z)",
            "@@@###$$$",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input: {s:?}");
        }
    }

    #[test]
    fn test_empty_and_noise() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("§§ ¶¶ ©"), "");
    }
}
