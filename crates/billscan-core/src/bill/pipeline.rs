//! Image to bill pipeline: decode, preprocess, OCR, layout extraction.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::models::bill::{ExtractionResult, FailureReason};
use crate::models::config::BillConfig;
use crate::ocr::{ImagePreprocessor, OcrEngine, RawOcrOutput};

use super::parser::BillExtractor;

/// Full extraction pipeline around an injected OCR engine.
///
/// Every entry point returns an [`ExtractionResult`]; decoding and engine
/// failures become failed results rather than errors.
pub struct BillPipeline<E: OcrEngine> {
    engine: E,
    preprocessor: ImagePreprocessor,
    extractor: BillExtractor,
}

impl<E: OcrEngine> BillPipeline<E> {
    pub fn new(engine: E, preprocessor: ImagePreprocessor, extractor: BillExtractor) -> Self {
        Self {
            engine,
            preprocessor,
            extractor,
        }
    }

    /// Build a pipeline with preprocessing and layout settings from `config`.
    pub fn from_config(engine: E, config: &BillConfig) -> Self {
        Self::new(
            engine,
            ImagePreprocessor::new(config.preprocess.clone()),
            BillExtractor::new(config.layout.clone()),
        )
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn extractor(&self) -> &BillExtractor {
        &self.extractor
    }

    /// Process an image file.
    pub fn process_path(&self, path: &Path) -> ExtractionResult {
        match image::open(path) {
            Ok(image) => self.process_image(&image),
            Err(e) => {
                warn!("Could not decode {}: {}", path.display(), e);
                ExtractionResult::failure(FailureReason::UnreadableImage)
            }
        }
    }

    /// Process encoded image bytes (PNG, JPEG, ...).
    pub fn process_bytes(&self, bytes: &[u8]) -> ExtractionResult {
        match image::load_from_memory(bytes) {
            Ok(image) => self.process_image(&image),
            Err(e) => {
                warn!("Could not decode {} byte upload: {}", bytes.len(), e);
                ExtractionResult::failure(FailureReason::UnreadableImage)
            }
        }
    }

    /// Process a decoded image.
    pub fn process_image(&self, image: &DynamicImage) -> ExtractionResult {
        let start = Instant::now();
        let prepared = self.preprocessor.prepare(image);

        let raw = match self.engine.recognize(&prepared) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{} engine failed: {}", self.engine.name(), e);
                return ExtractionResult::failure(FailureReason::Ocr(e.to_string()));
            }
        };
        debug!(
            "{} engine finished in {}ms",
            self.engine.name(),
            start.elapsed().as_millis()
        );

        let result = self.process_raw(raw);
        info!(
            "Processed {}x{} image in {}ms",
            image.width(),
            image.height(),
            start.elapsed().as_millis()
        );
        result
    }

    /// Run layout extraction on engine output that is already available.
    pub fn process_raw(&self, raw: RawOcrOutput) -> ExtractionResult {
        self.extractor.extract(raw.into_tokens())
    }
}
