//! Common regex patterns for license field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Field markers printed on the license: 1. 2. 3. 4A. 4B. 4C. 5.
    // Only recognized at start of text or after whitespace.
    pub static ref MARKER: Regex = Regex::new(
        r"(?:^|\s)(1|2|3|4A|4B|4C|5)\."
    ).unwrap();

    // DD.MM.YY or DD/MM/YYYY or DD-MM-YY; separators may be mixed.
    // Not bordered by other digits, but letters may follow directly
    // (OCR drops the space before the place name). The token is
    // groups 1..=3; the bordering characters are not part of it.
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"(?:^|[^0-9])(\d{2})[./\-](\d{2})[./\-](\d{4}|\d{2})(?:[^0-9]|$)"
    ).unwrap();

    // Anything resembling a date, including OCR-spaced separators
    pub static ref DATE_LIKE: Regex = Regex::new(
        r"\d{1,2}\s?[./\-]\s?\d{1,2}\s?[./\-]\s?\d{2,4}"
    ).unwrap();

    // Candidate license-number runs
    pub static ref LICENSE_NUMBER_RUN: Regex = Regex::new(
        r"[A-Za-z0-9/\-]+"
    ).unwrap();

    // Parenthesized letter run, e.g. a province code: (RM)
    pub static ref PARENTHESIZED_WORD: Regex = Regex::new(
        r"\(( *[A-Z][A-Z ]*)\)"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_needs_leading_boundary() {
        let labels: Vec<&str> = MARKER
            .captures_iter("1. ROSSI 3. 01.02.85 4A. X 21. Y")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(labels, vec!["1", "3", "4A"]);
    }

    #[test]
    fn test_date_token_year_width() {
        assert!(DATE_TOKEN.is_match("01/02/85"));
        assert!(DATE_TOKEN.is_match("01-02-1985"));
        assert!(!DATE_TOKEN.is_match("01/02/855"));
        assert!(!DATE_TOKEN.is_match("1/02/85"));
        assert!(!DATE_TOKEN.is_match("101/02/85"));
    }

    #[test]
    fn test_date_token_fused_with_place() {
        let caps = DATE_TOKEN.captures("01/02/85ROMA").unwrap();
        assert_eq!(&caps[3], "85");
        let caps = DATE_TOKEN.captures("X01.02.1985ROMA").unwrap();
        assert_eq!((&caps[1], &caps[3]), ("01", "1985"));
    }
}
