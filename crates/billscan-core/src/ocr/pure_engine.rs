//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{BillConfig, OcrConfig};

use super::{OcrEngine, Polygon, RawDetection, RawOcrOutput};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// Inference runs behind a mutex: the underlying sessions are not documented
/// as reentrant, and the engine is shared across requests.
pub struct PureOcrEngine {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    config: OcrConfig,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in the configuration.
    pub fn from_config(config: &BillConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.models.detection_model);
        let rec_path = config.model_path(&config.models.recognition_model);
        let dict_path = config.model_path(&config.models.dictionary);

        Self::from_paths(&det_path, &rec_path, &dict_path, config.ocr.clone())
    }

    /// Create an engine from explicit model paths.
    pub fn from_paths(
        det_path: &Path,
        rec_path: &Path,
        dict_path: &Path,
        config: OcrConfig,
    ) -> Result<Self, OcrError> {
        for path in [det_path, rec_path, dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(det_path)
            .rec_model_path(rec_path)
            .dictionary_path(dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "Loaded pure-onnx-ocr engine from {}",
            det_path.parent().unwrap_or(det_path).display()
        );

        Ok(Self {
            engine: Mutex::new(engine),
            config,
        })
    }
}

impl OcrEngine for PureOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<RawOcrOutput, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        debug!("Running OCR on {}x{} image", width, height);

        let results = {
            let engine = self.engine.lock().map_err(|_| OcrError::Poisoned)?;
            engine
                .run_from_image(image)
                .map_err(|e| OcrError::Inference(format!("pure-onnx-ocr: {}", e)))?
        };

        let detections: Vec<RawDetection> = results
            .iter()
            .filter(|r| r.confidence >= self.config.min_confidence)
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                RawDetection {
                    polygon: polygon_points(&r.bounding_box),
                    text,
                    score: Some(r.confidence),
                }
            })
            .collect();

        info!(
            "OCR complete: {} of {} regions kept in {}ms",
            detections.len(),
            results.len(),
            start.elapsed().as_millis()
        );

        Ok(RawOcrOutput::Detections(detections))
    }

    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }
}

/// Exterior ring of a `Polygon<f64>` as `(x, y)` points.
fn polygon_points(polygon: &pure_onnx_ocr::Polygon<f64>) -> Polygon {
    polygon
        .exterior()
        .coords()
        .map(|coord| [coord.x as f32, coord.y as f32])
        .collect()
}
