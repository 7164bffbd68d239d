//! Statement text to transaction records.

mod draft;
mod extractor;
pub mod lines;
mod parser;
pub mod rules;
mod validator;

pub use draft::{TransactionDraft, TypeSignal};
pub use extractor::{Extraction, LineWindowExtractor};
pub use lines::{split_lines, RawLine};
pub use parser::{ParseOutcome, StatementParser, StatementReport};
pub use validator::{StatementValidator, Validation};

pub use crate::error::Result;

use crate::models::transaction::TransactionRecord;

/// Trait for transaction extractors.
pub trait TransactionExtractor {
    /// Extract records from extracted statement text.
    fn extract_from_text(&self, text: &str) -> Result<Vec<TransactionRecord>>;

    /// Extract records from an already split line sequence.
    fn extract_from_lines(&self, lines: &[String]) -> Result<Vec<TransactionRecord>>;
}
