//! Configuration structures for statement parsing.
//!
//! Everything that is specific to one statement template (markers, month
//! names, labels, prefixes, currency tokens) lives in [`StatementTemplate`] so
//! that a second template is a data change, not a code change.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatementError};

/// Main configuration for the txnscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxnscanConfig {
    /// Statement template tables.
    pub template: StatementTemplate,

    /// Transaction extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Keyword, label and token tables for one statement family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementTemplate {
    /// At least one of these must appear (case-insensitive) for the text to be
    /// accepted as a statement.
    pub statement_markers: Vec<String>,

    /// Month abbreviations accepted on the date line of an anchor.
    pub month_abbreviations: Vec<String>,

    /// Meridiem tokens accepted on the time line of an anchor.
    pub meridiem_tokens: Vec<String>,

    /// Currency code tokens or symbols marking an amount line.
    pub currency_markers: Vec<String>,

    /// Detail-line prefixes implying an outgoing payment.
    pub debit_detail_prefixes: Vec<String>,

    /// Detail-line prefixes implying an incoming payment.
    pub credit_detail_prefixes: Vec<String>,

    /// Labels preceding the external transaction identifier.
    pub transaction_id_labels: Vec<String>,

    /// Labels preceding the bank settlement reference.
    pub utr_labels: Vec<String>,

    /// Phrases preceding a masked account token.
    pub account_reference_phrases: Vec<String>,

    /// Keywords on an amount line that imply a credit.
    pub credit_keywords: Vec<String>,

    /// Keywords on an amount line that imply a debit.
    pub debit_keywords: Vec<String>,

    /// Whole-line labels meaning credit.
    pub credit_labels: Vec<String>,

    /// Whole-line labels meaning debit.
    pub debit_labels: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for StatementTemplate {
    fn default() -> Self {
        Self {
            statement_markers: strings(&[
                "Transaction Statement",
                "Transaction Details",
                "Transaction ID",
                "UTR No",
            ]),
            month_abbreviations: strings(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            meridiem_tokens: strings(&["AM", "PM"]),
            currency_markers: strings(&["INR", "₹"]),
            debit_detail_prefixes: strings(&["paid to", "paid -"]),
            credit_detail_prefixes: strings(&["received from"]),
            transaction_id_labels: strings(&["Transaction ID"]),
            utr_labels: strings(&["UTR No"]),
            account_reference_phrases: strings(&["debited from", "credited to", "paid by"]),
            credit_keywords: strings(&["credit", "received"]),
            debit_keywords: strings(&["debit", "paid"]),
            credit_labels: strings(&["Credit"]),
            debit_labels: strings(&["Debit"]),
        }
    }
}

/// Which drafts survive finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardRule {
    /// Keep a draft that has details, an amount, or a type.
    #[default]
    RequireAnyField,
    /// Keep a draft only when it has details and also an amount or a type.
    RequireDetailsAndValue,
}

/// Transaction extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum distance, in lines, from an anchor's date line to a line that
    /// may still populate fields of that anchor's draft.
    pub lookahead_window: usize,

    /// Noise filter applied when a draft is closed.
    pub discard_rule: DiscardRule,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            lookahead_window: 10,
            discard_rule: DiscardRule::default(),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum extracted text length below which a PDF is reported as
    /// carrying no text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 20 }
    }
}

impl TxnscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject tables that would make every statement unparseable.
    pub fn validate(&self) -> Result<()> {
        let t = &self.template;
        let required = [
            ("template.statement_markers", &t.statement_markers),
            ("template.month_abbreviations", &t.month_abbreviations),
            ("template.meridiem_tokens", &t.meridiem_tokens),
            ("template.currency_markers", &t.currency_markers),
        ];
        for (name, table) in required {
            if table.iter().all(|s| s.trim().is_empty()) {
                return Err(StatementError::Config(format!("{name} must not be empty")));
            }
        }

        if self.extraction.lookahead_window == 0 {
            return Err(StatementError::Config(
                "extraction.lookahead_window must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
