//! Configuration structures for the scanning pipeline.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::clock::{SystemClock, DEFAULT_TIMEZONE};

/// Main configuration for the patente pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatenteConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// License field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Record store configuration.
    pub store: StoreConfig,

    /// Municipalities covered by the patrol.
    pub municipalities: Vec<String>,

    /// IANA zone for record timestamps, shift days and the year pivot.
    pub timezone: Tz,
}

impl Default for PatenteConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            extraction: ExtractionConfig::default(),
            store: StoreConfig::default(),
            municipalities: Vec::new(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Language hint for the recognizer.
    pub language: String,

    /// Images wider than this are downscaled before recognition (0 = never).
    pub max_image_width: u32,

    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            language: "it".to_string(),
            max_image_width: 700,
            keep_unk: false,
        }
    }
}

/// License field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Forward tolerance, in years, when expanding 2-digit years.
    pub year_window: u32,

    /// Minimum length of surname, given name and birth place.
    pub min_name_length: usize,

    /// Minimum length of a strict license-number match.
    pub min_license_number_length: usize,

    /// Fall back to the first token after `5.` when no strict match exists.
    pub license_number_fallback: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            year_window: 5,
            min_name_length: 2,
            min_license_number_length: 8,
            license_number_fallback: true,
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the CSV file receiving check records.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("controlli.csv"),
        }
    }
}

/// Municipalities of the original patrol area.
pub const DEFAULT_MUNICIPALITIES: [&str; 33] = [
    "ALBERA LIGURE",
    "ARQUATA SCRIVIA",
    "BASALUZZO",
    "BORGHETTO DI BORBERA",
    "BOSIO",
    "CABELLA LIGURE",
    "CANTALUPO LIGURE",
    "CAPRIATA D'ORBA",
    "CARREGA LIGURE",
    "CARROSIO",
    "CASALEGGIO BOIRO",
    "CASTELLETTO D'ORBA",
    "FRACONALTO",
    "FRANCAVILLA BISIO",
    "GAVI",
    "GRONDONA",
    "LERMA",
    "MONGIARDINO LIGURE",
    "MONTALDEO",
    "MORNESE",
    "NOVI LIGURE",
    "PARODI LIGURE",
    "PASTURANA",
    "POZZOLO FORMIGARO",
    "ROCCAFORTE LIGURE",
    "ROCCHETTA LIGURE",
    "SAN CRISTOFORO",
    "SERRAVALLE SCRIVIA",
    "SILVANO D'ORBA",
    "STAZZANO",
    "TASSAROLO",
    "VOLTAGGIO",
    "VIGNOLE BORBERA",
];

impl PatenteConfig {
    /// Configuration with the default municipality list filled in.
    pub fn with_default_municipalities() -> Self {
        Self {
            municipalities: DEFAULT_MUNICIPALITIES.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Whether a municipality is in the configured list.
    ///
    /// An empty list accepts everything.
    pub fn is_known_municipality(&self, name: &str) -> bool {
        self.municipalities.is_empty()
            || self
                .municipalities
                .iter()
                .any(|m| m.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// Clock reading wall-clock time in the configured zone.
    pub fn clock(&self) -> SystemClock {
        SystemClock::new(self.timezone)
    }

    /// Full path to an OCR model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.ocr.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PatenteConfig =
            serde_json::from_str(r#"{"extraction": {"year_window": 3}}"#).unwrap();
        assert_eq!(config.extraction.year_window, 3);
        assert_eq!(config.extraction.min_name_length, 2);
        assert_eq!(config.ocr.language, "it");
        assert_eq!(config.timezone, chrono_tz::Europe::Rome);
    }

    #[test]
    fn test_timezone_from_file() {
        let config: PatenteConfig = serde_json::from_str(r#"{"timezone": "UTC"}"#).unwrap();
        assert_eq!(config.clock().timezone(), chrono_tz::UTC);

        let err = serde_json::from_str::<PatenteConfig>(r#"{"timezone": "Mars/Olympus"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = PatenteConfig::with_default_municipalities();
        config.save(&path).unwrap();

        let loaded = PatenteConfig::from_file(&path).unwrap();
        assert_eq!(loaded.municipalities.len(), 33);
        assert!(loaded.is_known_municipality("novi ligure"));
        assert!(!loaded.is_known_municipality("TORINO"));
    }

    #[test]
    fn test_empty_list_accepts_any_municipality() {
        assert!(PatenteConfig::default().is_known_municipality("TORINO"));
    }
}
