//! Statement parser: validation followed by line-window extraction.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{RejectionReason, StatementError};
use crate::models::config::{DiscardRule, ExtractionConfig, TxnscanConfig};
use crate::models::transaction::TransactionRecord;

use super::extractor::{Extraction, LineWindowExtractor};
use super::lines::{split_lines, RawLine};
use super::rules::Patterns;
use super::validator::{StatementValidator, Validation};
use super::{Result, TransactionExtractor};

/// Result of parsing one document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The text is not a statement; nothing was extracted.
    Rejected(RejectionReason),
    /// Records in anchor order. May be empty.
    Parsed(Vec<TransactionRecord>),
}

impl ParseOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ParseOutcome::Rejected(_))
    }

    pub fn into_result(self) -> Result<Vec<TransactionRecord>> {
        match self {
            ParseOutcome::Rejected(reason) => Err(StatementError::Rejected(reason)),
            ParseOutcome::Parsed(records) => Ok(records),
        }
    }
}

/// Parsed records with diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct StatementReport {
    pub transactions: Vec<TransactionRecord>,
    /// Statement marker that made the text valid.
    pub marker: String,
    /// Non-blank lines scanned.
    pub line_count: usize,
    pub anchors: usize,
    pub discarded: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Parses extracted statement text into transaction records.
///
/// Holds only compiled patterns and settings, so one parser can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct StatementParser {
    validator: StatementValidator,
    patterns: Patterns,
    extraction: ExtractionConfig,
}

impl StatementParser {
    /// Create a parser for the default statement template.
    pub fn new() -> Self {
        Self {
            validator: StatementValidator::default(),
            patterns: Patterns::default_template().clone(),
            extraction: ExtractionConfig::default(),
        }
    }

    /// Create a parser from a full configuration, compiling its template.
    pub fn from_config(config: &TxnscanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            validator: StatementValidator::from_template(&config.template),
            patterns: Patterns::compile(&config.template)?,
            extraction: config.extraction.clone(),
        })
    }

    /// Set the lookahead window (lines after the anchor's date line).
    pub fn with_lookahead_window(mut self, window: usize) -> Self {
        self.extraction.lookahead_window = window;
        self
    }

    /// Set the rule for dropping incomplete drafts.
    pub fn with_discard_rule(mut self, rule: DiscardRule) -> Self {
        self.extraction.discard_rule = rule;
        self
    }

    pub fn extraction_config(&self) -> &ExtractionConfig {
        &self.extraction
    }

    /// Run only the validator.
    pub fn validate(&self, text: &str) -> Validation {
        self.validator.validate(text)
    }

    /// Validate, then extract. Rejected text is never scanned for records.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        match self.validator.validate(text) {
            Validation::Invalid(reason) => ParseOutcome::Rejected(reason),
            Validation::Valid { .. } => {
                ParseOutcome::Parsed(self.parse_lines(&split_lines(text)).records)
            }
        }
    }

    /// Extract from prepared lines without validation.
    pub fn parse_lines(&self, lines: &[RawLine]) -> Extraction {
        LineWindowExtractor::new(&self.patterns, &self.extraction).extract(lines)
    }

    /// Like [`parse`](Self::parse), with counters and timing.
    pub fn parse_report(&self, text: &str) -> Result<StatementReport> {
        // std::time::Instant panics on wasm32
        let start = Utc::now();

        let marker = match self.validator.validate(text) {
            Validation::Valid { marker } => marker,
            Validation::Invalid(reason) => return Err(reason.into()),
        };

        let lines = split_lines(text);
        let extraction = self.parse_lines(&lines);
        let processing_time_ms = (Utc::now() - start).num_milliseconds().max(0) as u64;

        info!(
            "Parsed {} transactions from {} lines in {}ms",
            extraction.records.len(),
            lines.len(),
            processing_time_ms
        );

        Ok(StatementReport {
            transactions: extraction.records,
            marker,
            line_count: lines.len(),
            anchors: extraction.anchors,
            discarded: extraction.discarded,
            processing_time_ms,
        })
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionExtractor for StatementParser {
    fn extract_from_text(&self, text: &str) -> Result<Vec<TransactionRecord>> {
        self.parse(text).into_result()
    }

    fn extract_from_lines(&self, lines: &[String]) -> Result<Vec<TransactionRecord>> {
        let text = lines.join("\n");
        debug!("Parsing {} pre-split lines", lines.len());
        self.extract_from_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionType;
    use pretty_assertions::assert_eq;

    const NANDINI: &str = "Transaction Statement for 98XXXXXX10
Mar 01, 2025 - Mar 31, 2025
Date Transaction Details Type Amount
Mar 08, 2025
2:30 PM
Paid to Nandini milk parlour
Transaction ID : T25030814064432917711
UTR No : 841302199001
Debited from XX5779
Debit INR 14.00
";

    fn parse(text: &str) -> ParseOutcome {
        StatementParser::new().parse(text)
    }

    fn records(text: &str) -> Vec<TransactionRecord> {
        parse(text).into_result().unwrap()
    }

    #[test]
    fn test_end_to_end_single_transaction() {
        assert_eq!(
            records(NANDINI),
            vec![TransactionRecord {
                date: "Mar 08, 2025".to_string(),
                time: "2:30 PM".to_string(),
                details: "Paid to Nandini milk parlour".to_string(),
                kind: TransactionType::Debit,
                transaction_id: "T25030814064432917711".to_string(),
                utr_no: "841302199001".to_string(),
                account_reference: "Debited from XX5779".to_string(),
                amount: "14.00".to_string(),
            }]
        );
    }

    #[test]
    fn test_rejection_extracts_nothing() {
        let text = "Electricity bill\nMar 08, 2025\n2:30 PM\nPaid to Someone\nINR 14.00";
        assert_eq!(
            parse(text),
            ParseOutcome::Rejected(RejectionReason::MissingStatementMarkers)
        );
        assert_eq!(parse(""), ParseOutcome::Rejected(RejectionReason::EmptyDocument));
    }

    #[test]
    fn test_rejection_into_result() {
        let err = parse("hello world").into_result().unwrap_err();
        assert!(matches!(
            err,
            StatementError::Rejected(RejectionReason::MissingStatementMarkers)
        ));
    }

    #[test]
    fn test_valid_statement_without_transactions() {
        let outcome = parse("Transaction Statement\nNo transactions in this period");
        assert_eq!(outcome, ParseOutcome::Parsed(vec![]));
        assert!(!outcome.is_rejected());
    }

    #[test]
    fn test_false_anchor_yields_no_record() {
        let text = "Transaction Statement\nMar 08, 2025\nPaid to Someone\nINR 14.00";
        assert!(records(text).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let parser = StatementParser::new();
        assert_eq!(parser.parse(NANDINI), parser.parse(NANDINI));
    }

    #[test]
    fn test_two_line_amount() {
        let text = "Transaction Statement
Mar 08, 2025
2:30 PM
Received from M K Building Materials
Transaction ID : T1
₹
8,000.00
";
        let records = records(text);
        assert_eq!(records[0].amount, "8000.00");
        assert_eq!(records[0].kind, TransactionType::Credit);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let text = NANDINI.replace('\n', "\r\n\r\n   \r\n");
        assert_eq!(records(&text), records(NANDINI));
    }

    #[test]
    fn test_lookahead_edge_through_parser() {
        // Date line at index 1 (after the marker line); index 11 is the last
        // line inside a window of 10.
        let mut lines = vec!["Transaction Statement", "Mar 08, 2025", "2:30 PM", "Paid to A"];
        lines.extend(std::iter::repeat_n("noise", 7));
        lines.push("INR 1.00");
        lines.push("UTR No : OUTSIDE");
        let text = lines.join("\n");

        let records = records(&text);
        assert_eq!(records[0].amount, "1.00");
        assert_eq!(records[0].utr_no, "");

        let wider = StatementParser::new().with_lookahead_window(11);
        assert_eq!(wider.parse(&text).into_result().unwrap()[0].utr_no, "OUTSIDE");
    }

    #[test]
    fn test_discard_rule_builder() {
        let text = "Transaction Statement\nMar 08, 2025\n2:30 PM\nDebit";

        assert_eq!(records(text).len(), 1);

        let strict = StatementParser::new().with_discard_rule(DiscardRule::RequireDetailsAndValue);
        assert!(strict.parse(text).into_result().unwrap().is_empty());
    }

    #[test]
    fn test_report_counters() {
        let text = format!("{NANDINI}Mar 09, 2025\n9:00 AM\nMar 10, 2025\n10:00 AM\nReceived from X\nINR 5");
        let report = StatementParser::new().parse_report(&text).unwrap();

        assert_eq!(report.marker, "Transaction Statement");
        assert_eq!(report.anchors, 3);
        assert_eq!(report.discarded, 1);
        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.transactions[1].amount, "5.00");
        assert_eq!(report.line_count, 16);
    }

    #[test]
    fn test_report_rejection() {
        let err = StatementParser::new().parse_report("nothing here").unwrap_err();
        assert!(matches!(err, StatementError::Rejected(_)));
    }

    #[test]
    fn test_from_config() {
        let mut config = TxnscanConfig::default();
        config.template.statement_markers = vec!["Account Statement".to_string()];
        config.template.currency_markers = vec!["USD".to_string()];
        config.extraction.lookahead_window = 4;

        let parser = StatementParser::from_config(&config).unwrap();
        assert_eq!(parser.extraction_config().lookahead_window, 4);

        let text = "Account Statement\nMar 08, 2025\n2:30 PM\nPaid to A\nUSD 3.5";
        assert_eq!(parser.parse(text).into_result().unwrap()[0].amount, "3.50");
        assert!(parser.parse(NANDINI).is_rejected());
    }

    #[test]
    fn test_from_invalid_config() {
        let mut config = TxnscanConfig::default();
        config.extraction.lookahead_window = 0;
        assert!(matches!(
            StatementParser::from_config(&config),
            Err(StatementError::Config(_))
        ));
    }

    #[test]
    fn test_extract_from_lines() {
        let lines: Vec<String> = NANDINI.lines().map(String::from).collect();
        let parser = StatementParser::new();
        assert_eq!(parser.extract_from_lines(&lines).unwrap(), records(NANDINI));
    }

    #[test]
    fn test_parser_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StatementParser>();
    }
}
