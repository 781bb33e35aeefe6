//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrBackend, OcrResult, TextBox};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: OcrConfig,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in the configuration.
    pub fn from_config(config: OcrConfig) -> Result<Self, OcrError> {
        let model_dir = config.model_dir.clone();
        Self::from_dir(&model_dir, config)
    }

    /// Create an engine from model files in a directory.
    pub fn from_dir(model_dir: &Path, config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = model_dir.join(&config.detection_model);
        let rec_path = model_dir.join(&config.recognition_model);
        let dict_path = model_dir.join(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "Loaded pure-onnx-ocr engine from {} (language hint: {})",
            model_dir.display(),
            config.language
        );

        Ok(Self { engine, config })
    }

    /// Process a decoded image and extract text with bounding boxes.
    pub fn process(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let image = self.fit_width(image);
        let (width, height) = image.dimensions();

        info!("Processing image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let boxes: Vec<TextBox> = results
            .iter()
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextBox {
                    bbox: polygon_to_bbox(&r.bounding_box),
                    text,
                    score: r.confidence,
                }
            })
            .collect();

        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "OCR complete: {} text boxes in {}ms",
            boxes.len(),
            processing_time_ms
        );

        Ok(OcrResult::from_boxes(boxes, (width, height), processing_time_ms))
    }

    /// Downscale wide photos, keeping the aspect ratio.
    fn fit_width(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let max_width = self.config.max_image_width;

        if max_width == 0 || width <= max_width {
            return image.clone();
        }

        let new_height = ((height as u64 * max_width as u64) / width as u64).max(1) as u32;
        debug!("Resizing image {}x{} -> {}x{}", width, height, max_width, new_height);
        image.resize_exact(max_width, new_height, image::imageops::FilterType::Lanczos3)
    }
}

impl OcrBackend for PureOcrEngine {
    fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError> {
        let decoded = image::load_from_memory(image)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        self.process(&decoded)
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
