//! Engine that replays previously recorded OCR output.

use std::path::Path;

use image::DynamicImage;
use tracing::info;

use crate::error::{OcrError, Result};

use super::{OcrEngine, RawOcrOutput};

/// Replays a fixed OCR result for every image.
///
/// Used to run the layout engine on dumped engine output without loading
/// any model.
#[derive(Debug, Clone)]
pub struct RecordedOcrEngine {
    output: RawOcrOutput,
}

impl RecordedOcrEngine {
    pub fn new(output: RawOcrOutput) -> Self {
        Self { output }
    }

    /// Load a JSON dump in any shape accepted by [`RawOcrOutput::from_json`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        info!("Loaded recorded OCR output from {}", path.display());
        Ok(Self::new(RawOcrOutput::from_json(&value)))
    }

    pub fn output(&self) -> &RawOcrOutput {
        &self.output
    }
}

impl OcrEngine for RecordedOcrEngine {
    fn recognize(&self, _image: &DynamicImage) -> std::result::Result<RawOcrOutput, OcrError> {
        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "recorded"
    }
}
