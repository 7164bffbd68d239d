//! Parse command - extract transactions from a single statement.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, info};

use txnscan_core::{StatementParser, StatementReport, TransactionRecord, TransactionsResponse};

use super::{load_config, read_statement};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Password for an encrypted PDF
    #[arg(short, long)]
    password: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include anchor and discard counts
    #[arg(long)]
    report: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Parsing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading statement...");
    pb.set_position(10);
    let text = read_statement(&args.input, args.password.as_deref(), &config)?;

    pb.set_message("Extracting transactions...");
    pb.set_position(50);
    let parser = StatementParser::from_config(&config)?;
    let report = match parser.parse_report(&text) {
        Ok(report) => report,
        Err(e) => {
            pb.abandon_with_message("Rejected");
            return Err(e.into());
        }
    };

    pb.finish_with_message("Done");

    let output = if args.report {
        format_report(&report, args.format)?
    } else {
        format_records(&report.transactions, args.format)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} transactions written to {}",
            style("✓").green(),
            report.transactions.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render records in the requested format. JSON uses the
/// `{"transactions": [...]}` export shape.
pub fn format_records(records: &[TransactionRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let response = TransactionsResponse::from(records.to_vec());
            Ok(serde_json::to_string_pretty(&response)?)
        }
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_report(report: &StatementReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(&report.transactions),
        OutputFormat::Text => {
            let mut output = format_text(&report.transactions);
            output.push('\n');
            output.push_str(&format!("Marker:     {}\n", report.marker));
            output.push_str(&format!("Lines:      {}\n", report.line_count));
            output.push_str(&format!("Anchors:    {}\n", report.anchors));
            output.push_str(&format!("Discarded:  {}\n", report.discarded));
            output.push_str(&format!("Time:       {}ms\n", report.processing_time_ms));
            Ok(output)
        }
    }
}

fn format_csv(records: &[TransactionRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "time",
        "details",
        "type",
        "transaction_id",
        "utr_no",
        "account_reference",
        "amount",
    ])?;

    for record in records {
        wtr.write_record([
            record.date.as_str(),
            record.time.as_str(),
            record.details.as_str(),
            record.kind.as_str(),
            record.transaction_id.as_str(),
            record.utr_no.as_str(),
            record.account_reference.as_str(),
            record.amount.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[TransactionRecord]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transactions: {}\n\n", records.len()));

    for record in records {
        output.push_str(&format!(
            "{} {:<8}  {:<7}  {:>12}  {}\n",
            record.date, record.time, record.kind, record.amount, record.details
        ));
        if !record.transaction_id.is_empty() {
            output.push_str(&format!("    Transaction ID: {}\n", record.transaction_id));
        }
        if !record.utr_no.is_empty() {
            output.push_str(&format!("    UTR: {}\n", record.utr_no));
        }
        if !record.account_reference.is_empty() {
            output.push_str(&format!("    {}\n", record.account_reference));
        }
    }

    let net: Decimal = records.iter().map(|r| r.signed_amount()).sum();
    output.push_str(&format!("\nNet: {}\n", net));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use txnscan_core::TransactionType;

    fn record() -> TransactionRecord {
        TransactionRecord {
            date: "Mar 08, 2025".to_string(),
            time: "2:30 PM".to_string(),
            details: "Paid to Nandini milk parlour".to_string(),
            kind: TransactionType::Debit,
            transaction_id: "T1".to_string(),
            utr_no: "841302199001".to_string(),
            account_reference: "Debited from XX5779".to_string(),
            amount: "14.00".to_string(),
        }
    }

    #[test]
    fn test_csv_output() {
        let csv = format_records(&[record()], OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("date,time,details,type,transaction_id,utr_no,account_reference,amount")
        );
        assert_eq!(
            lines.next(),
            Some("\"Mar 08, 2025\",2:30 PM,Paid to Nandini milk parlour,Debit,T1,841302199001,Debited from XX5779,14.00")
        );
    }

    #[test]
    fn test_json_output_shape() {
        let json = format_records(&[record()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["transactions"][0]["utrNo"], "841302199001");
        assert_eq!(value["transactions"][0]["type"], "Debit");
    }

    #[test]
    fn test_text_output_net() {
        let text = format_records(&[record()], OutputFormat::Text).unwrap();
        assert!(text.contains("Transactions: 1"));
        assert!(text.contains("Net: -14.00"));
    }
}
