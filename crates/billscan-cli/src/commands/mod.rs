//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use billscan_core::models::config::BillConfig;
use billscan_core::{
    BillPipeline, ExtractionResult, FailureReason, OcrEngine, PureOcrEngine, RawOcrOutput,
    RecordedOcrEngine,
};

/// Image extensions accepted as bill input.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

/// Engine shared between the command and its blocking workers.
pub type SharedEngine = Arc<dyn OcrEngine>;

/// Pipeline shared between the command and its blocking workers.
pub type SharedPipeline = Arc<BillPipeline<SharedEngine>>;

/// One unit of extraction work.
pub enum Job {
    /// Decode an image and run it through OCR.
    Image(PathBuf),
    /// Skip OCR and lay out already recognised output.
    Raw(RawOcrOutput),
}

/// Load the configuration file, or defaults when no path is given.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BillConfig> {
    match config_path {
        Some(path) => Ok(BillConfig::from_file(Path::new(path))?),
        None => Ok(BillConfig::default()),
    }
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Build the OCR engine once for the whole command.
///
/// A recorded OCR dump replaces model inference entirely.
pub fn build_engine(
    config: &BillConfig,
    model_dir: Option<&Path>,
    ocr_json: Option<&Path>,
) -> anyhow::Result<SharedEngine> {
    if let Some(path) = ocr_json {
        let engine = RecordedOcrEngine::from_file(path)?;
        return Ok(Arc::new(engine));
    }

    let mut config = config.clone();
    if let Some(dir) = model_dir {
        config.models.model_dir = dir.to_path_buf();
    }

    let engine = PureOcrEngine::from_config(&config).map_err(|e| {
        anyhow::anyhow!(
            "{}\n\nPlace {}, {} and {} in {} or pass --model-dir.",
            e,
            config.models.detection_model,
            config.models.recognition_model,
            config.models.dictionary,
            config.models.model_dir.display()
        )
    })?;
    info!("OCR engine ready (models in {})", config.models.model_dir.display());

    Ok(Arc::new(engine))
}

pub fn build_pipeline(engine: SharedEngine, config: &BillConfig) -> SharedPipeline {
    Arc::new(BillPipeline::from_config(engine, config))
}

/// Run a job on the blocking pool, giving up after `timeout_secs`.
///
/// A timed-out job keeps running in the background; its result is discarded.
pub async fn run_job(pipeline: SharedPipeline, job: Job, timeout_secs: u64) -> ExtractionResult {
    let task = tokio::task::spawn_blocking(move || match job {
        Job::Image(path) => pipeline.process_path(&path),
        Job::Raw(raw) => pipeline.process_raw(raw),
    });

    match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!("Extraction worker failed: {}", e);
            ExtractionResult::failure(FailureReason::Ocr(format!("worker failed: {}", e)))
        }
        Err(_) => {
            debug!("Extraction exceeded {}s", timeout_secs);
            ExtractionResult::failure(FailureReason::Timeout { secs: timeout_secs })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billscan_core::OcrError;
    use image::{DynamicImage, GrayImage, Luma};

    struct SlowEngine;

    impl OcrEngine for SlowEngine {
        fn recognize(&self, _image: &DynamicImage) -> Result<RawOcrOutput, OcrError> {
            std::thread::sleep(Duration::from_millis(2500));
            Ok(RawOcrOutput::Unknown)
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    struct PanickingEngine;

    impl OcrEngine for PanickingEngine {
        fn recognize(&self, _image: &DynamicImage) -> Result<RawOcrOutput, OcrError> {
            panic!("session crashed");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn blank_image(dir: &Path) -> PathBuf {
        let path = dir.join("bill.png");
        GrayImage::from_pixel(8, 8, Luma([255])).save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_slow_engine_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = build_pipeline(Arc::new(SlowEngine), &BillConfig::default());

        let result = run_job(pipeline, Job::Image(blank_image(dir.path())), 1).await;

        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureReason::Timeout { secs: 1 }));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"], "Processing timed out after 1 seconds");
        assert_eq!(value["header"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_worker_panic_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = build_pipeline(Arc::new(PanickingEngine), &BillConfig::default());

        let result = run_job(pipeline, Job::Image(blank_image(dir.path())), 5).await;

        assert!(!result.success);
        assert!(matches!(result.failure, Some(FailureReason::Ocr(ref msg)) if msg.starts_with("worker failed")));
        assert!(result.error.unwrap_or_default().starts_with("OCR error: worker failed"));
    }

    #[tokio::test]
    async fn test_raw_job_skips_engine() {
        let pipeline = build_pipeline(Arc::new(PanickingEngine), &BillConfig::default());

        let result = run_job(pipeline, Job::Raw(RawOcrOutput::Unknown), 5).await;

        assert_eq!(result.failure, Some(FailureReason::NoTextDetected));
    }
}
