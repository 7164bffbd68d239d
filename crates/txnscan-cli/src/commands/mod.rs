//! Subcommands and the input handling they share.

pub mod batch;
pub mod config;
pub mod parse;
pub mod validate;

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use txnscan_core::pdf::{PdfExtractor, PdfProcessor};
use txnscan_core::TxnscanConfig;

/// Load the configuration from `path`, else from the default location if
/// `config init` has written one there, else the defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<TxnscanConfig> {
    let config = match path {
        Some(path) => TxnscanConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using config at {}", default_path.display());
                TxnscanConfig::from_file(&default_path)?
            } else {
                TxnscanConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Whether `path` looks like something [`read_statement`] can handle.
pub fn is_statement_file(path: &Path) -> bool {
    matches!(extension(path).as_str(), "pdf" | "txt")
}

/// Read a statement's text: PDFs go through text extraction (decrypting
/// with `password`), anything else is read as already extracted text.
pub fn read_statement(
    path: &Path,
    password: Option<&str>,
    config: &TxnscanConfig,
) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    if extension(path) != "pdf" {
        debug!("Reading {} as extracted text", path.display());
        return Ok(fs::read_to_string(path)?);
    }

    let data = fs::read(path)?;
    let mut extractor = PdfExtractor::new();
    extractor.load(&data, password)?;

    let content = extractor.extract_all()?;
    debug!("PDF has {} pages", content.page_count);

    if !content.has_text(config.pdf.min_text_length) {
        warn!(
            "{} has almost no embedded text; scanned statements are not supported",
            path.display()
        );
    }

    Ok(content.text)
}
