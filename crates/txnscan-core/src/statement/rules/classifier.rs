//! Per-line field classification.
//!
//! Rules are tried in a fixed order and the first match decides the field:
//! detail prefix, transaction id, UTR, account reference, amount, bare type
//! label. Anything else is [`Field::Unmatched`].

use rust_decimal::Decimal;

use crate::models::transaction::TransactionType;

use super::amounts::normalize_amount;
use super::patterns::{collapse_whitespace, Patterns, BARE_NUMBER};
use super::FieldExtractor;

/// What a single absorbed line contributes to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Counterparty line, with the direction its prefix implies.
    Details { text: String, kind: TransactionType },
    TransactionId(String),
    Utr(String),
    /// Whitespace-collapsed account line.
    AccountReference(String),
    /// Amount, the direction inferred from keywords on the same line
    /// (`Unknown` when none), and whether the value came from the next line.
    Amount {
        value: Decimal,
        inferred: TransactionType,
        consumes_next: bool,
    },
    /// Whole-line direction label.
    Type(TransactionType),
    Unmatched,
}

impl Field {
    pub fn consumes_next(&self) -> bool {
        matches!(self, Field::Amount { consumes_next: true, .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Details { .. } => "details",
            Field::TransactionId(_) => "transactionId",
            Field::Utr(_) => "utrNo",
            Field::AccountReference(_) => "accountReference",
            Field::Amount { .. } => "amount",
            Field::Type(_) => "type",
            Field::Unmatched => "unmatched",
        }
    }
}

/// Classifies lines against one template's patterns.
pub struct LineClassifier<'p> {
    patterns: &'p Patterns,
}

impl<'p> LineClassifier<'p> {
    pub fn new(patterns: &'p Patterns) -> Self {
        Self { patterns }
    }

    /// Classify `line`. `next` is the following line, consulted only for the
    /// split layout where a lone currency marker is followed by its number.
    pub fn classify(&self, line: &str, next: Option<&str>) -> Field {
        let line = line.trim();
        let lower = collapse_whitespace(line).to_lowercase();

        if let Some(kind) = self.detail_kind(&lower) {
            return Field::Details {
                text: line.to_string(),
                kind,
            };
        }

        if let Some(found) = self.patterns.transaction_id.extract(line) {
            return Field::TransactionId(found.value);
        }

        if let Some(found) = self.patterns.utr.extract(line) {
            return Field::Utr(found.value);
        }

        if self.patterns.account_reference.is_match(line) {
            return Field::AccountReference(collapse_whitespace(line));
        }

        if let Some(field) = self.amount(line, &lower, next) {
            return field;
        }

        if let Some(kind) = self.label_kind(&lower) {
            return Field::Type(kind);
        }

        Field::Unmatched
    }

    fn detail_kind(&self, lower: &str) -> Option<TransactionType> {
        let starts = |prefixes: &[String]| prefixes.iter().any(|p| lower.starts_with(p.as_str()));

        if starts(&self.patterns.credit_detail_prefixes) {
            Some(TransactionType::Credit)
        } else if starts(&self.patterns.debit_detail_prefixes) {
            Some(TransactionType::Debit)
        } else {
            None
        }
    }

    fn amount(&self, line: &str, lower: &str, next: Option<&str>) -> Option<Field> {
        let inferred = self.keyword_kind(lower);

        if let Some(found) = self.patterns.amount.extract(line) {
            return Some(Field::Amount {
                value: found.value,
                inferred,
                consumes_next: false,
            });
        }

        // A marker with no number beside it ("Amount (INR)") is only an
        // amount when it stands alone above a bare number line.
        if !self.patterns.bare_currency.is_match(line) {
            return None;
        }

        let number = next.map(str::trim).filter(|n| BARE_NUMBER.is_match(n))?;
        Some(Field::Amount {
            value: normalize_amount(number).unwrap_or(Decimal::ZERO),
            inferred,
            consumes_next: true,
        })
    }

    fn keyword_kind(&self, lower: &str) -> TransactionType {
        let contains = |words: &[String]| words.iter().any(|w| lower.contains(w.as_str()));

        if contains(&self.patterns.credit_keywords) {
            TransactionType::Credit
        } else if contains(&self.patterns.debit_keywords) {
            TransactionType::Debit
        } else {
            TransactionType::Unknown
        }
    }

    fn label_kind(&self, lower: &str) -> Option<TransactionType> {
        if self.patterns.credit_labels.iter().any(|l| l == lower) {
            Some(TransactionType::Credit)
        } else if self.patterns.debit_labels.iter().any(|l| l == lower) {
            Some(TransactionType::Debit)
        } else {
            None
        }
    }
}
