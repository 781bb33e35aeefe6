//! License number extraction.

use super::ExtractionMatch;
use super::patterns::LICENSE_NUMBER_RUN;

const STRICT_CONFIDENCE: f32 = 0.9;
const FALLBACK_CONFIDENCE: f32 = 0.4;

/// Extract a license number from the payload following `5.`.
///
/// The capture is anchored to the marker: only the first alphanumeric run
/// (with `/` and `-`) after leading whitespace and punctuation is
/// considered, and it must be at least `min_len` long. When it is shorter
/// and `fallback` is set, the first whitespace-delimited token is accepted
/// with lower confidence: number formats vary too much for a strict
/// pattern alone.
pub fn extract_license_number(
    payload: &str,
    min_len: usize,
    fallback: bool,
) -> Option<ExtractionMatch<String>> {
    let first_run = LICENSE_NUMBER_RUN.find(payload);

    if let Some(m) = first_run.filter(|m| m.as_str().len() >= min_len.max(1)) {
        return Some(
            ExtractionMatch::new(m.as_str().to_uppercase(), STRICT_CONFIDENCE, m.as_str())
                .with_position(m.start(), m.end()),
        );
    }

    if !fallback {
        return None;
    }

    // First token; the run pattern keeps it free of stray punctuation
    let token_start = payload.len() - payload.trim_start().len();
    let token = payload.split_whitespace().next()?;
    let m = LICENSE_NUMBER_RUN.find(token)?;
    let start = token_start + m.start();

    Some(
        ExtractionMatch::new(m.as_str().to_uppercase(), FALLBACK_CONFIDENCE, m.as_str())
            .with_position(start, start + m.len()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_match() {
        let m = extract_license_number(" AB1234567CD", 8, true).unwrap();
        assert_eq!(m.value, "AB1234567CD");
        assert_eq!(m.confidence, STRICT_CONFIDENCE);
        assert_eq!(m.position, Some((1, 12)));
    }

    #[test]
    fn test_strict_keeps_slash_and_hyphen() {
        let m = extract_license_number(" .U1/2345-678Z", 8, true).unwrap();
        assert_eq!(m.value, "U1/2345-678Z");
        assert_eq!(m.confidence, STRICT_CONFIDENCE);
    }

    #[test]
    fn test_later_long_word_does_not_win() {
        let m = extract_license_number(" AB12 CATEGORIA B", 8, true).unwrap();
        assert_eq!(m.value, "AB12");
        assert_eq!(m.confidence, FALLBACK_CONFIDENCE);

        assert!(extract_license_number(" AB12 CATEGORIA B", 8, false).is_none());
    }

    #[test]
    fn test_fallback_first_token() {
        let m = extract_license_number(" AB123. XYZ", 8, true).unwrap();
        assert_eq!(m.value, "AB123");
        assert_eq!(m.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(m.position, Some((1, 6)));
    }

    #[test]
    fn test_no_fallback() {
        assert!(extract_license_number(" AB123", 8, false).is_none());
    }

    #[test]
    fn test_empty_payload() {
        assert!(extract_license_number("", 8, true).is_none());
        assert!(extract_license_number("   ", 8, true).is_none());
        assert!(extract_license_number(" ...", 8, true).is_none());
    }
}
