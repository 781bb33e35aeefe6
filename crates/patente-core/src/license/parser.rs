//! License parser: normalization followed by field extraction.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::FieldRecord;
use crate::ocr::OcrResult;

use super::extractor::{FieldExtractor, FieldMatch};
use super::rules::{normalize, DateResolver};
use super::LicenseExtractor;

/// Result of license extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub record: FieldRecord,
    /// Text the markers were matched against.
    pub normalized_text: String,
    /// Per-field matches with confidence and position in `normalized_text`.
    pub matches: Vec<FieldMatch>,
    /// Fields that could not be extracted.
    pub warnings: Vec<String>,
    /// Processing time in microseconds.
    pub processing_time_us: u64,
}

impl ExtractionResult {
    /// Mean confidence over the fields that were found, 0 when none was.
    pub fn confidence(&self) -> f32 {
        if self.matches.is_empty() {
            return 0.0;
        }
        self.matches.iter().map(|(_, m)| m.confidence).sum::<f32>() / self.matches.len() as f32
    }
}

/// Stateless license parser; safe to share between threads.
#[derive(Debug, Clone)]
pub struct LicenseParser {
    clock: Arc<dyn Clock>,
    config: ExtractionConfig,
    extractor: FieldExtractor,
}

impl LicenseParser {
    /// Create a parser with default settings and the system clock.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());
        Self {
            extractor: build_extractor(&clock, config),
            clock,
            config: config.clone(),
        }
    }

    /// Read the current date from another clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.extractor = build_extractor(&self.clock, &self.config);
        self
    }

    /// Set the forward tolerance for 2-digit years.
    pub fn with_year_window(mut self, window: u32) -> Self {
        self.config.year_window = window;
        self.extractor = build_extractor(&self.clock, &self.config);
        self
    }

    /// Set whether `5.` falls back to the first token.
    pub fn with_license_number_fallback(mut self, fallback: bool) -> Self {
        self.config.license_number_fallback = fallback;
        self.extractor = build_extractor(&self.clock, &self.config);
        self
    }

    /// Parse raw OCR text.
    pub fn parse(&self, raw: &str) -> ExtractionResult {
        let start = Instant::now();

        let normalized_text = normalize(raw);
        let (record, matches) = self.extractor.extract_matches(&normalized_text);

        let warnings: Vec<String> = record
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(key, _)| format!("no value found for {key}"))
            .collect();

        debug!(
            "Extracted {}/7 license fields from {} chars",
            record.found_count(),
            normalized_text.len()
        );

        ExtractionResult {
            record,
            normalized_text,
            matches,
            warnings,
            processing_time_us: start.elapsed().as_micros() as u64,
        }
    }

    /// Parse OCR output that has not been decoded yet.
    pub fn parse_bytes(&self, raw: &[u8]) -> Result<ExtractionResult, ExtractionError> {
        let text = std::str::from_utf8(raw)?;
        Ok(self.parse(text))
    }
}

impl Default for LicenseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LicenseExtractor for LicenseParser {
    fn extract(&self, ocr_result: &OcrResult) -> FieldRecord {
        self.parse(&ocr_result.text).record
    }

    fn extract_from_text(&self, text: &str) -> FieldRecord {
        self.parse(text).record
    }
}

fn build_extractor(clock: &Arc<dyn Clock>, config: &ExtractionConfig) -> FieldExtractor {
    FieldExtractor::new()
        .with_date_resolver(DateResolver::new().with_clock(Arc::clone(clock)))
        .with_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn parser() -> LicenseParser {
        LicenseParser::new().with_clock(Arc::new(FixedClock::on(2025, 1, 10).unwrap()))
    }

    #[test]
    fn test_parse_reports_missing_fields() {
        let result = parser().parse("1. rossi\n2. mario");
        assert_eq!(result.normalized_text, "1. ROSSI 2. MARIO");
        assert_eq!(result.record.surname, "ROSSI");
        assert_eq!(result.warnings.len(), 5);
        assert!(result.warnings.contains(&"no value found for license_number".to_string()));
    }

    #[test]
    fn test_year_window_is_tunable() {
        let text = "4B. 01/01/29";
        assert_eq!(parser().parse(text).record.expiry_date, "01.01.2029");
        assert_eq!(
            parser().with_year_window(2).parse(text).record.expiry_date,
            "01.01.1929"
        );
    }

    #[test]
    fn test_with_clock_keeps_window() {
        let parser = LicenseParser::new()
            .with_year_window(0)
            .with_clock(Arc::new(FixedClock::on(2025, 1, 10).unwrap()));
        assert_eq!(parser.parse("4A. 01/01/26").record.issue_date, "01.01.1926");
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = parser().parse_bytes(&[0x31, 0x2e, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidEncoding(_)));
    }

    #[test]
    fn test_confidence() {
        assert_eq!(parser().parse("").confidence(), 0.0);
        let result = parser().parse("5. AB12");
        assert!(result.confidence() > 0.0 && result.confidence() < 0.5);
    }

    #[test]
    fn test_extract_from_ocr_result() {
        let ocr = OcrResult::from_text("1. VERDI\n2. ANNA");
        let record = parser().extract(&ocr);
        assert_eq!(record.surname, "VERDI");
        assert_eq!(record.given_name, "ANNA");
    }
}
