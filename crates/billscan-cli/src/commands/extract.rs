//! Extract command - read one bill image into header fields and line items.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use billscan_core::{OcrEngine, RecordedOcrEngine};

use super::output::{format_result, OutputFormat};
use super::{build_engine, build_pipeline, is_supported_image, load_config, run_job, Job};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Bill image (png, jpg, jpeg, gif, bmp, webp, tiff)
    #[arg(required_unless_present = "ocr_json")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Use recorded OCR output (JSON) instead of running the models
    #[arg(long)]
    ocr_json: Option<PathBuf>,

    /// Processing time limit in seconds (default: service.timeout_secs)
    #[arg(short, long)]
    timeout: Option<u64>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let timeout_secs = args.timeout.unwrap_or(config.service.timeout_secs).max(1);

    let job = match (&args.input, &args.ocr_json) {
        (Some(input), _) => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }
            if !is_supported_image(input) {
                anyhow::bail!("Unsupported file format: {}", input.display());
            }
            Job::Image(input.clone())
        }
        (None, Some(ocr_json)) => {
            let recorded = RecordedOcrEngine::from_file(ocr_json)?;
            Job::Raw(recorded.output().clone())
        }
        (None, None) => anyhow::bail!("Either an input image or --ocr-json is required"),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    pb.set_message("Loading OCR engine...");
    let engine = build_engine(&config, args.model_dir.as_deref(), args.ocr_json.as_deref())?;
    let pipeline = build_pipeline(Arc::clone(&engine), &config);

    pb.set_message(format!("Extracting with {} engine...", engine.name()));
    let result = run_job(pipeline, job, timeout_secs).await;
    pb.finish_and_clear();

    info!(
        "Extraction {} with {} items",
        if result.success { "succeeded" } else { "failed" },
        result.items.len()
    );

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if !result.success {
        anyhow::bail!(
            "Extraction failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
