//! Configuration structures for the bill extraction pipeline.
//!
//! Every pixel threshold used by the layout heuristics lives here. The
//! defaults are tuned to bills scanned at the resolution of the reference
//! templates (roughly 1000 px wide); other scanners need other values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Main configuration for the billscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocess: PreprocessConfig,

    /// Layout heuristics.
    pub layout: LayoutConfig,

    /// Model file locations.
    pub models: ModelConfig,

    /// Request handling configuration.
    pub service: ServiceConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Keep `[UNK]` markers emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,

    /// Drop recognized regions below this confidence (0.0 keeps everything).
    pub min_confidence: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            keep_unk: false,
            min_confidence: 0.0,
        }
    }
}

/// Binarization applied after denoising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binarization {
    /// Keep the denoised grayscale image.
    None,
    /// Global threshold chosen with Otsu's method.
    Otsu,
    /// Local mean threshold.
    Adaptive,
}

/// Largest accepted adaptive thresholding window.
pub const MAX_ADAPTIVE_BLOCK_SIZE: u32 = 255;

/// Image preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Run grayscale conversion, denoising and binarization before OCR.
    pub enabled: bool,

    /// Gaussian blur sigma used for denoising (0.0 disables it).
    pub denoise_sigma: f32,

    /// Binarization mode.
    pub binarization: Binarization,

    /// Window size for adaptive thresholding.
    pub adaptive_block_size: u32,

    /// Offset subtracted from the local mean in adaptive thresholding.
    pub adaptive_offset: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            denoise_sigma: 0.8,
            binarization: Binarization::None,
            adaptive_block_size: 15,
            adaptive_offset: 5,
        }
    }
}

/// Layout heuristics, grouped by pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub header: HeaderConfig,
    pub table: TableConfig,
    pub columns: ColumnBands,
    pub rows: RowFilterConfig,
}

/// Header zone and field heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Tokens with `y_center` below this belong to the header zone.
    pub zone_max_y: f32,

    /// Name candidates must lie left of this x.
    pub name_max_x: f32,
    /// Name candidates must lie strictly between these y values.
    pub name_min_y: f32,
    pub name_max_y: f32,
    /// Minimum length of the cleaned name text.
    pub name_min_len: usize,
    /// Bonus x range (inclusive) and the bonus it awards.
    pub name_bonus_min_x: f32,
    pub name_bonus_max_x: f32,
    pub name_bonus_x: usize,
    /// Bonus y range (inclusive) and the bonus it awards.
    pub name_bonus_min_y: f32,
    pub name_bonus_max_y: f32,
    pub name_bonus_y: usize,
    /// Substrings that disqualify a name candidate (matched lowercase).
    pub noise_keywords: Vec<String>,

    /// Tokens inspected after a serial number label.
    pub sl_no_lookahead: usize,
    /// The serial number following a label must lie right of this x.
    pub sl_no_min_x: f32,
    /// Unlabelled serial numbers: right of this x and above this y.
    pub sl_no_fallback_min_x: f32,
    pub sl_no_fallback_max_y: f32,

    /// Labelled dates must lie right of this x.
    pub date_keyword_min_x: f32,
    /// Unlabelled dates: right of this x and above this y.
    pub date_fallback_min_x: f32,
    pub date_fallback_max_y: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        let noise_keywords = [
            "darpan",
            "glass",
            "ply",
            "concepts",
            "email",
            "phone",
            "contact",
            "www",
            ".com",
            "sl",
            "no",
            "date",
            "bill",
            "mrp",
            "particulars",
            "qty",
            "rate",
            "total",
            "080",
            "297",
        ];

        Self {
            zone_max_y: 300.0,
            name_max_x: 300.0,
            name_min_y: 80.0,
            name_max_y: 220.0,
            name_min_len: 2,
            name_bonus_min_x: 40.0,
            name_bonus_max_x: 150.0,
            name_bonus_x: 5,
            name_bonus_min_y: 90.0,
            name_bonus_max_y: 180.0,
            name_bonus_y: 3,
            noise_keywords: noise_keywords.iter().map(|s| s.to_string()).collect(),
            sl_no_lookahead: 5,
            sl_no_min_x: 700.0,
            sl_no_fallback_min_x: 800.0,
            sl_no_fallback_max_y: 150.0,
            date_keyword_min_x: 600.0,
            date_fallback_min_x: 700.0,
            date_fallback_max_y: 200.0,
        }
    }
}

/// How the row grouper decides whether a token still belongs to the open row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAnchor {
    /// Compare against the token that opened the row.
    #[default]
    Seed,
    /// Compare against the most recently added token. Slowly drifting
    /// (skewed) tables can chain several lines into one row.
    LastToken,
    /// Compare against the mean y of the row so far.
    Centroid,
}

/// Table location and row grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Tokens skipped after the table header signature.
    pub start_offset: usize,
    /// Start index used when no header signature is found.
    pub start_fallback: usize,
    /// Maximum vertical distance (px) between a token and its row anchor.
    pub row_threshold: f32,
    /// Row anchor policy.
    pub row_anchor: RowAnchor,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            start_offset: 5,
            start_fallback: 15,
            row_threshold: 25.0,
            row_anchor: RowAnchor::Seed,
        }
    }
}

/// Right edges (exclusive) of the fixed column bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnBands {
    pub mrp_max_x: f32,
    pub particulars_max_x: f32,
    pub band_a_max_x: f32,
    pub band_b_max_x: f32,
}

impl Default for ColumnBands {
    fn default() -> Self {
        Self {
            mrp_max_x: 150.0,
            particulars_max_x: 500.0,
            band_a_max_x: 660.0,
            band_b_max_x: 850.0,
        }
    }
}

/// Row classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RowFilterConfig {
    /// Rows with an index below this are checked for header words.
    pub header_row_window: usize,
    /// Words marking the table's own header row.
    pub header_keywords: Vec<String>,
    /// Rows shorter than this (trimmed, in characters) are noise.
    pub min_text_len: usize,
}

impl Default for RowFilterConfig {
    fn default() -> Self {
        Self {
            header_row_window: 3,
            header_keywords: ["particulars", "qty", "rate", "total"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_text_len: 2,
        }
    }
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "en_rec.onnx".to_string(),
            dictionary: "en_dict.txt".to_string(),
        }
    }
}

/// Request handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Wall-clock limit for one extraction, in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { timeout_secs: 25 }
    }
}

impl BillConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Check that the layout thresholds are internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bands = &self.layout.columns;
        let edges = [
            bands.mrp_max_x,
            bands.particulars_max_x,
            bands.band_a_max_x,
            bands.band_b_max_x,
        ];
        if edges.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::Invalid {
                field: "layout.columns".to_string(),
                reason: "band edges must be ascending".to_string(),
            });
        }

        let threshold = self.layout.table.row_threshold;
        if threshold.is_nan() || threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "layout.table.row_threshold".to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }

        let block = self.preprocess.adaptive_block_size;
        if !(1..=MAX_ADAPTIVE_BLOCK_SIZE).contains(&block) {
            return Err(ConfigError::Invalid {
                field: "preprocess.adaptive_block_size".to_string(),
                reason: format!("must be between 1 and {}", MAX_ADAPTIVE_BLOCK_SIZE),
            });
        }

        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "service.timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}
