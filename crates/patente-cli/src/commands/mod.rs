//! Subcommands and the input handling they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod report;
pub mod save;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use patente_core::models::config::PatenteConfig;
use patente_core::{LicenseParser, OcrBackend, PureOcrEngine};

/// Image extensions sent through OCR; anything else is read as text.
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "tiff", "tif", "bmp"];

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("patente")
        .join("config.json")
}

/// Load the configuration: explicit path, then default path, then defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PatenteConfig> {
    if let Some(path) = config_path {
        return Ok(PatenteConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(PatenteConfig::from_file(&default_path)?)
    } else {
        Ok(PatenteConfig::with_default_municipalities())
    }
}

/// License parser with the configured tunables, reading the configured zone.
pub fn license_parser(config: &PatenteConfig) -> LicenseParser {
    LicenseParser::from_config(&config.extraction).with_clock(Arc::new(config.clock()))
}

/// Whether a path names an image to OCR.
pub fn is_image(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    IMAGE_EXTENSIONS.contains(&extension.as_str())
}

/// Get the OCR text of a document: run OCR on images, read text dumps
/// as-is, `-` reads stdin.
pub fn read_document(path: &Path, config: &PatenteConfig) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    if is_image(path) {
        let engine = PureOcrEngine::from_config(config.ocr.clone()).map_err(|e| {
            anyhow::anyhow!(
                "{}\n\nPlace det/rec models and the dictionary in {} or set ocr.model_dir.",
                e,
                config.ocr.model_dir.display()
            )
        })?;
        let data = fs::read(path)?;
        let result = engine.recognize(&data)?;
        info!(
            "OCR found {} text boxes in {}ms",
            result.boxes.len(),
            result.processing_time_ms
        );
        Ok(result.text)
    } else {
        let data = fs::read(path)?;
        String::from_utf8(data)
            .map_err(|e| anyhow::anyhow!("{} is not UTF-8 text: {}", path.display(), e))
    }
}
