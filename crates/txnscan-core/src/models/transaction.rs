//! Transaction records handed to the transaction store.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Layout of a statement's date and time lines joined by a space,
/// e.g. "Mar 08, 2025 2:30 PM".
pub const STATEMENT_TIMESTAMP_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money received.
    Credit,
    /// Money paid out.
    Debit,
    /// No direction signal was found.
    #[default]
    Unknown,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "Credit",
            Self::Debit => "Debit",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A finalized transaction extracted from statement text.
///
/// Text fields keep the statement's own formatting; missing fields are empty
/// strings and a missing amount is `"0.00"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Date as printed, e.g. "Mar 08, 2025".
    pub date: String,

    /// Time as printed, e.g. "2:30 PM".
    pub time: String,

    /// Counterparty line, e.g. "Paid to Nandini milk parlour".
    pub details: String,

    /// Direction of the transaction.
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Wallet/app transaction identifier.
    pub transaction_id: String,

    /// Bank settlement reference (UTR).
    pub utr_no: String,

    /// Masked account line, e.g. "Debited from XX5779".
    pub account_reference: String,

    /// Amount with exactly two fraction digits.
    pub amount: String,
}

impl TransactionRecord {
    /// Combined date and time, if both are in the statement's native layout.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let joined = format!("{} {}", self.date.trim(), self.time.trim());
        NaiveDateTime::parse_from_str(&joined, STATEMENT_TIMESTAMP_FORMAT).ok()
    }

    /// Amount as a decimal; `0` if the string is somehow malformed.
    pub fn amount_value(&self) -> Decimal {
        Decimal::from_str(&self.amount).unwrap_or(Decimal::ZERO)
    }

    /// Amount signed by direction: negative for debits.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Debit => -self.amount_value(),
            _ => self.amount_value(),
        }
    }
}

/// Wrapper matching the JSON export shape `{"transactions": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionRecord>,
}

impl From<Vec<TransactionRecord>> for TransactionsResponse {
    fn from(transactions: Vec<TransactionRecord>) -> Self {
        Self { transactions }
    }
}
