//! Validate command - check a document for statement markers only.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use txnscan_core::{StatementError, StatementParser, Validation};

use super::{load_config, read_statement};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Password for an encrypted PDF
    #[arg(short, long)]
    password: Option<String>,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_statement(&args.input, args.password.as_deref(), &config)?;

    info!("Validating {} ({} chars)", args.input.display(), text.len());

    match StatementParser::from_config(&config)?.validate(&text) {
        Validation::Valid { marker } => {
            println!(
                "{} {} is a statement (marker: {})",
                style("✓").green(),
                args.input.display(),
                marker
            );
            Ok(())
        }
        Validation::Invalid(reason) => Err(StatementError::Rejected(reason).into()),
    }
}
