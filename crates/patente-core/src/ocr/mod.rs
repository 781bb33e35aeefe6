//! OCR collaborator: encoded image bytes in, text out.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Anything that can turn a document photo into text.
pub trait OcrBackend {
    /// Recognize the text in an encoded image (PNG, JPEG, ...).
    fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError>;

    /// Convenience: recognized text only.
    fn recognize_text(&self, image: &[u8]) -> Result<String, OcrError> {
        Ok(self.recognize(image)?.text)
    }
}

/// A recognized text box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub score: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Full text (boxes joined with newlines).
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Wrap text that did not come from an image (e.g. a saved OCR dump).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Build a result from boxes, sorted in reading order.
    pub fn from_boxes(mut boxes: Vec<TextBox>, image_size: (u32, u32), processing_time_ms: u64) -> Self {
        sort_by_reading_order(&mut boxes);
        let text = boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            boxes,
            text,
            processing_time_ms,
            image_size,
        }
    }
}

/// Sort boxes top-to-bottom, then left-to-right within a 20 px row.
fn sort_by_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        let (ax, ay, _, _) = a.rect();
        let (bx, by, _, _) = b.rect();

        let row_a = (ay / 20.0) as i32;
        let row_b = (by / 20.0) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}
