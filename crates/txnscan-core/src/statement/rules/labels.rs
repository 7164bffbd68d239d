//! Label-and-token extraction: "Transaction ID : T2503...", "UTR No : 8413...",
//! "Debited from XX5779".

use regex::Regex;

use super::patterns::{alternation, Bounds};
use super::{ExtractionMatch, FieldExtractor};
use crate::error::Result;

/// Extracts the token that follows one of a set of labels.
#[derive(Debug, Clone)]
pub struct LabeledTokenExtractor {
    pattern: Regex,
}

impl LabeledTokenExtractor {
    /// Label, optional `:`/`.`/`#`/`-` separators, then an alphanumeric token.
    pub fn new(labels: &[String]) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?i){}[\s:.#\-]*(?P<token>[A-Za-z0-9]+)",
            alternation(labels, Bounds::BOTH)
        ))?;
        Ok(Self { pattern })
    }

    /// Phrase, whitespace, then any non-space token (masked accounts such as
    /// "XX5779" or "****1234").
    pub fn phrase(phrases: &[String]) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?i){}\s+(?P<token>\S+)",
            alternation(phrases, Bounds::BOTH)
        ))?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl FieldExtractor for LabeledTokenExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let token = caps.name("token")?;
                Some(
                    ExtractionMatch::new(token.as_str().to_string(), full.as_str())
                        .with_position(full.start(), full.end()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_transaction_id() {
        let ex = LabeledTokenExtractor::new(&labels(&["Transaction ID"])).unwrap();

        let found = ex.extract("Transaction ID : T25030814064432917711").unwrap();
        assert_eq!(found.value, "T25030814064432917711");

        let found = ex.extract("transaction id:T1").unwrap();
        assert_eq!(found.value, "T1");

        let found = ex.extract("Transaction  ID # AB12").unwrap();
        assert_eq!(found.value, "AB12");
    }

    #[test]
    fn test_label_without_token() {
        let ex = LabeledTokenExtractor::new(&labels(&["Transaction ID"])).unwrap();
        assert!(ex.extract("Transaction ID :").is_none());
        assert!(ex.extract("Transaction IDs").is_none());
    }

    #[test]
    fn test_utr_with_dotted_label() {
        let ex = LabeledTokenExtractor::new(&labels(&["UTR No"])).unwrap();
        let found = ex.extract("UTR No. : 841302199001").unwrap();
        assert_eq!(found.value, "841302199001");
    }

    #[test]
    fn test_account_phrase() {
        let ex = LabeledTokenExtractor::phrase(&labels(&["debited from", "credited to"])).unwrap();

        let found = ex.extract("Debited from XX5779").unwrap();
        assert_eq!(found.value, "XX5779");

        assert!(ex.is_match("Credited to  ****1234"));
        assert!(!ex.is_match("Debited from"));
    }
}
