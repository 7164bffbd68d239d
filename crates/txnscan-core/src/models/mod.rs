//! Data models: configuration and transaction records.

pub mod config;
pub mod transaction;

pub use config::{DiscardRule, ExtractionConfig, PdfConfig, StatementTemplate, TxnscanConfig};
pub use transaction::{TransactionRecord, TransactionType, TransactionsResponse};
