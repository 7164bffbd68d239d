//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use txnscan_core::{StatementError, StatementParser, StatementReport, TxnscanConfig};

use super::parse::{format_records, OutputFormat};
use super::{is_statement_file, load_config, read_statement};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
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

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Password tried on every encrypted PDF
    #[arg(short, long)]
    password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Rejected,
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Rejected => "rejected",
            Status::Error => "error",
        }
    }
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    status: Status,
    report: Option<StatementReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);
    let parser = Arc::new(StatementParser::from_config(&config)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_statement_file(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let password: Option<Arc<str>> = args.password.as_deref().map(Arc::from);
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let parser = Arc::clone(&parser);
        let config = Arc::clone(&config);
        let password = password.clone();

        tasks.spawn_blocking(move || {
            let file_start = Instant::now();
            let result = process_single_file(&path, &parser, password.as_deref(), &config);
            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            drop(permit);
            (index, path, result, processing_time_ms)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, path, result, processing_time_ms) = joined?;
        overall_pb.inc(1);

        let result = match result {
            Ok(report) => ProcessResult {
                path,
                status: Status::Success,
                report: Some(report),
                error: None,
                processing_time_ms,
            },
            Err(e) => {
                let status = match e.downcast_ref::<StatementError>() {
                    Some(StatementError::Rejected(_)) => Status::Rejected,
                    _ => Status::Error,
                };
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    tasks.abort_all();
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
                ProcessResult {
                    path,
                    status,
                    report: None,
                    error: Some(error_msg),
                    processing_time_ms,
                }
            }
        };
        results.push((index, result));
    }

    overall_pb.finish_with_message("Complete");

    // Report in input order, not completion order
    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(report) = &result.report {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("statement");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_records(&report.transactions, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

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

    let successful = results.iter().filter(|r| r.status == Status::Success).count();
    let failed: Vec<_> = results.iter().filter(|r| r.status != Status::Success).collect();
    let transactions: usize = results
        .iter()
        .filter_map(|r| r.report.as_ref())
        .map(|r| r.transactions.len())
        .sum();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} transactions",
        style(successful).green(),
        style(failed.len()).red(),
        transactions
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &StatementParser,
    password: Option<&str>,
    config: &TxnscanConfig,
) -> anyhow::Result<StatementReport> {
    let text = read_statement(path, password, config)?;
    Ok(parser.parse_report(&text)?)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "transactions",
        "anchors",
        "discarded",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let (transactions, anchors, discarded) = match &result.report {
            Some(report) => (
                report.transactions.len().to_string(),
                report.anchors.to_string(),
                report.discarded.to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        let processing_time_ms = result.processing_time_ms.to_string();

        wtr.write_record([
            filename,
            result.status.as_str(),
            transactions.as_str(),
            anchors.as_str(),
            discarded.as_str(),
            processing_time_ms.as_str(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
