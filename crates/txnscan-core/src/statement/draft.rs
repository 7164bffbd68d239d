//! In-progress transactions and their finalization.

use rust_decimal::Decimal;

use crate::models::config::DiscardRule;
use crate::models::transaction::{TransactionRecord, TransactionType};

use super::rules::amounts::{format_amount, DEFAULT_AMOUNT};
use super::rules::anchor::Anchor;
use super::rules::classifier::Field;

/// Strength of the signal that set a draft's direction. A stronger signal
/// replaces a weaker one; equal or weaker signals never overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeSignal {
    /// Amount-line keyword or bare "Debit"/"Credit" label.
    Inferred,
    /// Detail-line prefix ("Paid to", "Received from").
    DetailPrefix,
}

/// Accumulates the fields of one transaction between its anchor and the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    anchor_position: usize,
    date: String,
    time: String,
    details: Option<String>,
    kind: Option<(TransactionType, TypeSignal)>,
    transaction_id: Option<String>,
    utr_no: Option<String>,
    account_reference: Option<String>,
    amount: Option<Decimal>,
}

impl TransactionDraft {
    /// Open a draft from its anchor lines.
    pub fn open(anchor: Anchor) -> Self {
        Self {
            anchor_position: anchor.position,
            date: anchor.date,
            time: anchor.time,
            details: None,
            kind: None,
            transaction_id: None,
            utr_no: None,
            account_reference: None,
            amount: None,
        }
    }

    /// Position of the anchor's date line.
    pub fn anchor_position(&self) -> usize {
        self.anchor_position
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn kind(&self) -> TransactionType {
        self.kind.map(|(k, _)| k).unwrap_or_default()
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// Fold one classified line into the draft. Returns `false` when the
    /// line changed nothing (field already set, or unmatched).
    pub fn apply(&mut self, field: Field) -> bool {
        match field {
            Field::Details { text, kind } => {
                if self.details.is_some() {
                    return false;
                }
                self.details = Some(text);
                self.set_kind(kind, TypeSignal::DetailPrefix);
                true
            }
            Field::TransactionId(id) => set_once(&mut self.transaction_id, id),
            Field::Utr(utr) => set_once(&mut self.utr_no, utr),
            Field::AccountReference(reference) => set_once(&mut self.account_reference, reference),
            Field::Amount { value, inferred, .. } => {
                let mut changed = false;
                if self.amount.is_none() {
                    self.amount = Some(value);
                    changed = true;
                }
                self.set_kind(inferred, TypeSignal::Inferred) || changed
            }
            Field::Type(kind) => self.set_kind(kind, TypeSignal::Inferred),
            Field::Unmatched => false,
        }
    }

    fn set_kind(&mut self, kind: TransactionType, signal: TypeSignal) -> bool {
        if !kind.is_known() {
            return false;
        }
        match self.kind {
            Some((_, current)) if current >= signal => false,
            _ => {
                self.kind = Some((kind, signal));
                true
            }
        }
    }

    /// Whether the draft passes `rule` and would be emitted.
    pub fn is_kept(&self, rule: DiscardRule) -> bool {
        let has_value = self.amount.is_some() || self.kind.is_some();
        match rule {
            DiscardRule::RequireAnyField => self.details.is_some() || has_value,
            DiscardRule::RequireDetailsAndValue => self.details.is_some() && has_value,
        }
    }

    /// Close the draft: `None` if the discard rule drops it, otherwise a
    /// record with every unset field defaulted.
    pub fn finalize(self, rule: DiscardRule) -> Option<TransactionRecord> {
        if !self.is_kept(rule) {
            return None;
        }

        let kind = self.kind();
        Some(TransactionRecord {
            date: self.date,
            time: self.time,
            details: self.details.unwrap_or_default(),
            kind,
            transaction_id: self.transaction_id.unwrap_or_default(),
            utr_no: self.utr_no.unwrap_or_default(),
            account_reference: self.account_reference.unwrap_or_default(),
            amount: self
                .amount
                .map(format_amount)
                .unwrap_or_else(|| DEFAULT_AMOUNT.to_string()),
        })
    }
}

fn set_once(slot: &mut Option<String>, value: String) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn draft() -> TransactionDraft {
        TransactionDraft::open(Anchor {
            position: 0,
            date: "Mar 08, 2025".to_string(),
            time: "2:30 PM".to_string(),
        })
    }

    fn amount(value: &str, inferred: TransactionType) -> Field {
        Field::Amount {
            value: Decimal::from_str(value).unwrap(),
            inferred,
            consumes_next: false,
        }
    }

    #[test]
    fn test_empty_draft_is_discarded() {
        assert_eq!(draft().finalize(DiscardRule::RequireAnyField), None);
        assert_eq!(draft().finalize(DiscardRule::RequireDetailsAndValue), None);
    }

    #[test]
    fn test_defaults_applied() {
        let mut d = draft();
        d.apply(Field::Type(TransactionType::Credit));

        let record = d.finalize(DiscardRule::RequireAnyField).unwrap();
        assert_eq!(
            record,
            TransactionRecord {
                date: "Mar 08, 2025".to_string(),
                time: "2:30 PM".to_string(),
                details: String::new(),
                kind: TransactionType::Credit,
                transaction_id: String::new(),
                utr_no: String::new(),
                account_reference: String::new(),
                amount: "0.00".to_string(),
            }
        );
    }

    #[test]
    fn test_discard_rule_boundaries() {
        // Details only: kept by the lenient rule, dropped by the strict one.
        let mut details_only = draft();
        details_only.apply(Field::Details {
            text: "Paid to X".to_string(),
            kind: TransactionType::Unknown,
        });
        assert!(details_only.is_kept(DiscardRule::RequireAnyField));
        assert!(!details_only.is_kept(DiscardRule::RequireDetailsAndValue));

        // Amount only.
        let mut amount_only = draft();
        amount_only.apply(amount("5", TransactionType::Unknown));
        assert!(amount_only.is_kept(DiscardRule::RequireAnyField));
        assert!(!amount_only.is_kept(DiscardRule::RequireDetailsAndValue));

        // Identifiers alone never keep a draft.
        let mut ids_only = draft();
        ids_only.apply(Field::TransactionId("T1".to_string()));
        ids_only.apply(Field::Utr("U1".to_string()));
        ids_only.apply(Field::AccountReference("Debited from XX1".to_string()));
        assert!(!ids_only.is_kept(DiscardRule::RequireAnyField));
        assert!(!ids_only.is_kept(DiscardRule::RequireDetailsAndValue));
    }

    #[test]
    fn test_detail_type_beats_inferred_type() {
        let mut d = draft();
        d.apply(Field::Type(TransactionType::Credit));
        d.apply(Field::Details {
            text: "Paid to X".to_string(),
            kind: TransactionType::Debit,
        });
        assert_eq!(d.kind(), TransactionType::Debit);

        d.apply(amount("10", TransactionType::Credit));
        assert_eq!(d.kind(), TransactionType::Debit);
    }

    #[test]
    fn test_inferred_type_does_not_overwrite_inferred() {
        let mut d = draft();
        d.apply(Field::Type(TransactionType::Debit));
        d.apply(amount("10", TransactionType::Credit));
        assert_eq!(d.kind(), TransactionType::Debit);
    }

    #[test]
    fn test_first_value_wins() {
        let mut d = draft();
        assert!(d.apply(Field::Details {
            text: "Paid to A".to_string(),
            kind: TransactionType::Debit,
        }));
        assert!(!d.apply(Field::Details {
            text: "Received from B".to_string(),
            kind: TransactionType::Credit,
        }));
        assert!(d.apply(amount("1", TransactionType::Unknown)));
        assert!(!d.apply(amount("2", TransactionType::Unknown)));
        assert!(!d.apply(Field::Unmatched));

        assert_eq!(d.details(), Some("Paid to A"));
        assert_eq!(d.kind(), TransactionType::Debit);
        assert_eq!(d.amount(), Some(Decimal::ONE));
    }
}
