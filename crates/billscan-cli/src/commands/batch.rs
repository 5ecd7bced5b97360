//! Batch processing command for multiple bill images.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use billscan_core::ExtractionResult;

use super::output::{format_result, OutputFormat};
use super::{build_engine, build_pipeline, is_supported_image, load_config, run_job, Job};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching bill images
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Replay recorded OCR output (JSON) for every image instead of running the models
    #[arg(long)]
    ocr_json: Option<PathBuf>,

    /// Per-file time limit in seconds (default: service.timeout_secs)
    #[arg(short, long)]
    timeout: Option<u64>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: ExtractionResult,
    processing_time_ms: u64,
    processed_at: DateTime<Local>,
}

/// One line of the summary CSV.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'a str,
    customer_name: &'a str,
    sl_no: &'a str,
    date: &'a str,
    items: usize,
    processing_time_ms: u64,
    processed_at: String,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let timeout_secs = args.timeout.unwrap_or(config.service.timeout_secs).max(1);

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_image(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let engine = build_engine(&config, args.model_dir.as_deref(), args.ocr_json.as_deref())?;
    let pipeline = build_pipeline(engine, &config);

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = run_job(pipeline.clone(), Job::Image(path.clone()), timeout_secs).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        if !result.success {
            let error_msg = result.error.clone().unwrap_or_default();
            if args.continue_on_error {
                warn!("Failed to process {}: {}", path.display(), error_msg);
            } else {
                overall_pb.abandon();
                error!("Failed to process {}: {}", path.display(), error_msg);
                anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
            }
        }

        results.push(ProcessResult {
            path,
            result,
            processing_time_ms,
            processed_at: Local::now(),
        });
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for entry in results.iter().filter(|r| r.result.success) {
            let output_path = output_dir.join(output_file_name(&entry.path, args.format));

            fs::write(&output_path, format_result(&entry.result, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| !r.result.success).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for entry in &failed {
            println!(
                "  - {}: {}",
                entry.path.display(),
                entry.result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output name keeping the source extension, so `a.png` and `a.jpg` do
/// not both write `a.json`.
fn output_file_name(path: &Path, format: OutputFormat) -> String {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("bill");
    format!("{}.{}", name, format.extension())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for entry in results {
        let header = entry.result.header.as_ref();
        wtr.serialize(SummaryRow {
            filename: entry
                .path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(""),
            status: if entry.result.success { "success" } else { "error" },
            customer_name: header.map(|h| h.name.as_str()).unwrap_or(""),
            sl_no: header.map(|h| h.sl_no.as_str()).unwrap_or(""),
            date: header.map(|h| h.date.as_str()).unwrap_or(""),
            items: entry.result.items.len(),
            processing_time_ms: entry.processing_time_ms,
            processed_at: entry.processed_at.to_rfc3339(),
            error: entry.result.error.as_deref().unwrap_or(""),
        })?;
    }

    wtr.flush()?;
    Ok(())
}
