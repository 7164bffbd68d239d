//! Core library for wallet and bank statement parsing.
//!
//! This crate provides:
//! - Statement validation (marker search before any extraction)
//! - Line-window transaction extraction anchored on date/time line pairs
//! - Field classification (details, identifiers, account, amount, type)
//! - Amount normalization to two-decimal strings
//! - PDF text extraction with password decryption (`pdf` feature)

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod statement;

pub use error::{PdfError, RejectionReason, Result, StatementError};
pub use models::config::{DiscardRule, ExtractionConfig, PdfConfig, StatementTemplate, TxnscanConfig};
pub use models::transaction::{TransactionRecord, TransactionType, TransactionsResponse};
#[cfg(feature = "pdf")]
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
pub use statement::rules::{normalize_amount, normalize_amount_str};
pub use statement::{
    split_lines, Extraction, ParseOutcome, RawLine, StatementParser, StatementReport,
    TransactionExtractor, Validation,
};
