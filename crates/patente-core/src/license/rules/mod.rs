//! Rule-based building blocks for license field extraction.

pub mod dates;
pub mod markers;
pub mod names;
pub mod normalize;
pub mod number;
pub mod patterns;

pub use dates::{expand_year, DateResolver, DEFAULT_YEAR_WINDOW};
pub use markers::{scan_markers, FieldPattern, Marker, MarkerHit, PayloadKind, FIELD_TABLE};
pub use names::{clean_name, clean_place};
pub use normalize::normalize;
pub use number::extract_license_number;

use serde::Serialize;

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Shift the position by `offset`, for matches found in a slice.
    pub fn offset_by(mut self, offset: usize) -> Self {
        self.position = self.position.map(|(s, e)| (s + offset, e + offset));
        self
    }
}
