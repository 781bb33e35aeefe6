//! Driving-license field extraction.
//!
//! Raw OCR text goes through [`rules::normalize`], then the
//! [`FieldExtractor`] anchors on the printed field markers (`1.` … `5.`)
//! and resolves dates with [`rules::DateResolver`].

mod extractor;
mod parser;
pub mod rules;

pub use extractor::{FieldExtractor, FieldMatch};
pub use parser::{ExtractionResult, LicenseParser};

use crate::error::ExtractionError;
use crate::models::record::FieldRecord;
use crate::ocr::OcrResult;

/// Trait for license field extractors.
pub trait LicenseExtractor {
    /// Extract license fields from an OCR result.
    fn extract(&self, ocr_result: &OcrResult) -> FieldRecord;

    /// Extract license fields from plain text.
    fn extract_from_text(&self, text: &str) -> FieldRecord;
}

/// Extract license fields from raw OCR text using the system clock.
///
/// Total over all strings: fields that cannot be found are empty.
pub fn extract_license_fields(raw_ocr_text: &str) -> FieldRecord {
    LicenseParser::new().extract_from_text(raw_ocr_text)
}

/// Like [`extract_license_fields`], for OCR output not yet decoded.
pub fn extract_license_fields_from_bytes(raw: &[u8]) -> Result<FieldRecord, ExtractionError> {
    LicenseParser::new().parse_bytes(raw).map(|r| r.record)
}
