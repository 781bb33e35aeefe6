//! Core library for driving-license scanning at roadside checks.
//!
//! This crate provides:
//! - license field extraction from OCR text (normalization, marker-anchored
//!   patterns, 2-digit-year resolution)
//! - an OCR collaborator contract with a pure Rust engine
//! - check records and an append-only row store
//! - end-of-shift reports per municipality

pub mod clock;
pub mod error;
pub mod license;
pub mod models;
pub mod ocr;
pub mod report;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock, DEFAULT_TIMEZONE};
pub use error::{ExtractionError, OcrError, PatenteError, Result, StoreError};
pub use license::{
    extract_license_fields, extract_license_fields_from_bytes, ExtractionResult, FieldExtractor,
    LicenseExtractor, LicenseParser,
};
pub use models::record::{CheckRecord, FieldKey, FieldRecord, COLUMNS};
pub use models::config::PatenteConfig;
pub use ocr::{OcrBackend, OcrResult, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use report::{MunicipalitySummary, ShiftFilter, ShiftReport};
pub use store::{CsvStore, MemoryStore, RecordStore, RecordTable};
