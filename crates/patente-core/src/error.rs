//! Error types for the patente-core library.

use thiserror::Error;

/// Main error type for the patente library.
#[derive(Error, Debug)]
pub enum PatenteError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// License field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to license field extraction.
///
/// Recognition misses are never errors: a field that cannot be found is
/// returned as an empty string. The only hard failure is input that is not
/// text at all.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The OCR output handed to the extractor is not valid UTF-8.
    #[error("OCR text is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
}

/// Errors related to the append-only record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying CSV reader/writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure while opening or flushing the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No row in the store carries the `DATA_ORA` column.
    #[error("header row not found (no column named {0})")]
    MissingHeader(&'static str),

    /// A row does not match the column schema.
    #[error("row has {found} values, expected {expected}")]
    ColumnMismatch { expected: usize, found: usize },
}

/// Result type for the patente library.
pub type Result<T> = std::result::Result<T, PatenteError>;
