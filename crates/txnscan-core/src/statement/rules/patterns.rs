//! Regex patterns for statement line classification.
//!
//! Fixed, template-independent patterns live in `lazy_static!` blocks.
//! Everything derived from a [`StatementTemplate`] is compiled once into
//! [`Patterns`]; every table entry is regex-escaped, so template authors write
//! plain text, not regex.

use lazy_static::lazy_static;
use regex::Regex;

use super::amounts::AmountExtractor;
use super::labels::LabeledTokenExtractor;
use crate::error::Result;
use crate::models::config::StatementTemplate;

lazy_static! {
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // A line holding nothing but a formatted number: "8,000.00", "14", "14.5"
    pub static ref BARE_NUMBER: Regex = Regex::new(
        r"^\d[\d,]*(?:\.\d{0,2})?$"
    ).unwrap();

    static ref DEFAULT_PATTERNS: Patterns = Patterns::compile(&StatementTemplate::default()).unwrap();
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(line: &str) -> String {
    WHITESPACE_RUN.replace_all(line.trim(), " ").into_owned()
}

/// Which sides of an alternative get a `\b` when the alternative starts or
/// ends with a word character.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bounds {
    pub leading: bool,
    pub trailing: bool,
}

impl Bounds {
    pub const BOTH: Bounds = Bounds { leading: true, trailing: true };
    pub const LEADING: Bounds = Bounds { leading: true, trailing: false };
    pub const TRAILING: Bounds = Bounds { leading: false, trailing: true };
    pub const NONE: Bounds = Bounds { leading: false, trailing: false };
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Build a non-capturing alternation from plain-text table entries.
///
/// Inner whitespace matches any whitespace run. Longer entries come first so
/// that "paid to" is preferred over "paid".
pub(crate) fn alternation(items: &[String], bounds: Bounds) -> String {
    let mut entries: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    entries.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    entries.dedup();

    let parts: Vec<String> = entries
        .iter()
        .map(|entry| {
            let body = entry
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            let lead = bounds.leading && entry.chars().next().is_some_and(is_word_char);
            let trail = bounds.trailing && entry.chars().last().is_some_and(is_word_char);
            format!(
                "{}{}{}",
                if lead { r"\b" } else { "" },
                body,
                if trail { r"\b" } else { "" }
            )
        })
        .collect();

    if parts.is_empty() {
        // Matches nothing.
        return r"[^\s\S]".to_string();
    }

    format!("(?:{})", parts.join("|"))
}

fn lowercased(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| collapse_whitespace(s).to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// All patterns and keyword tables for one statement template.
#[derive(Debug, Clone)]
pub struct Patterns {
    /// Full-line date: "Mar 08, 2025".
    pub date_line: Regex,
    /// Full-line time: "2:30 PM".
    pub time_line: Regex,
    /// A line holding only a currency marker.
    pub bare_currency: Regex,
    /// Currency marker adjacent to a number.
    pub amount: AmountExtractor,
    pub transaction_id: LabeledTokenExtractor,
    pub utr: LabeledTokenExtractor,
    pub account_reference: LabeledTokenExtractor,
    pub debit_detail_prefixes: Vec<String>,
    pub credit_detail_prefixes: Vec<String>,
    pub credit_keywords: Vec<String>,
    pub debit_keywords: Vec<String>,
    pub credit_labels: Vec<String>,
    pub debit_labels: Vec<String>,
}

impl Patterns {
    /// Compile the patterns for a template.
    pub fn compile(template: &StatementTemplate) -> Result<Self> {
        let months = alternation(&template.month_abbreviations, Bounds::NONE);
        let meridiem = alternation(&template.meridiem_tokens, Bounds::NONE);
        let markers = &template.currency_markers;

        let date_line = Regex::new(&format!(r"(?i)^{months}\s+\d{{1,2}},\s*\d{{4}}$"))?;
        let time_line = Regex::new(&format!(
            r"(?i)^(?:1[0-2]|0?[1-9]):[0-5]\d\s*{meridiem}$"
        ))?;
        let bare_currency = Regex::new(&format!(
            r"(?i)^{}\s*:?$",
            alternation(markers, Bounds::NONE)
        ))?;

        Ok(Self {
            date_line,
            time_line,
            bare_currency,
            amount: AmountExtractor::new(markers)?,
            transaction_id: LabeledTokenExtractor::new(&template.transaction_id_labels)?,
            utr: LabeledTokenExtractor::new(&template.utr_labels)?,
            account_reference: LabeledTokenExtractor::phrase(&template.account_reference_phrases)?,
            debit_detail_prefixes: lowercased(&template.debit_detail_prefixes),
            credit_detail_prefixes: lowercased(&template.credit_detail_prefixes),
            credit_keywords: lowercased(&template.credit_keywords),
            debit_keywords: lowercased(&template.debit_keywords),
            credit_labels: lowercased(&template.credit_labels),
            debit_labels: lowercased(&template.debit_labels),
        })
    }

    /// Patterns for the default template, compiled once per process.
    pub fn default_template() -> &'static Patterns {
        &DEFAULT_PATTERNS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::rules::FieldExtractor;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_alternation_escapes_and_orders() {
        let alt = alternation(&strings(&["paid", "paid to", "a.b"]), Bounds::NONE);
        assert_eq!(alt, r"(?:paid\s+to|paid|a\.b)");
    }

    #[test]
    fn test_alternation_word_bounds() {
        let alt = alternation(&strings(&["INR", "₹"]), Bounds::BOTH);
        assert_eq!(alt, r"(?:\bINR\b|₹)");

        let re = Regex::new(&format!("(?i){alt}")).unwrap();
        assert!(re.is_match("inr 14.00"));
        assert!(re.is_match("₹8000.00"));
        assert!(!re.is_match("MINREST"));
    }

    #[test]
    fn test_empty_alternation_matches_nothing() {
        let re = Regex::new(&alternation(&[], Bounds::BOTH)).unwrap();
        assert!(!re.is_match("anything"));
        assert!(!re.is_match(""));
    }

    #[test]
    fn test_date_line() {
        let p = Patterns::default_template();
        assert!(p.date_line.is_match("Mar 08, 2025"));
        assert!(p.date_line.is_match("dec 1, 2024"));
        assert!(p.date_line.is_match("SEP  30,  2023"));
        assert!(!p.date_line.is_match("Mar 08 2025"));
        assert!(!p.date_line.is_match("Paid on Mar 08, 2025"));
        assert!(!p.date_line.is_match("March 08, 2025"));
    }

    #[test]
    fn test_time_line() {
        let p = Patterns::default_template();
        assert!(p.time_line.is_match("2:30 PM"));
        assert!(p.time_line.is_match("11:05 am"));
        assert!(p.time_line.is_match("09:59 AM"));
        assert!(!p.time_line.is_match("13:00 PM"));
        assert!(!p.time_line.is_match("0:30 AM"));
        assert!(!p.time_line.is_match("2:30"));
        assert!(!p.time_line.is_match("2:75 PM"));
    }

    #[test]
    fn test_bare_number() {
        assert!(BARE_NUMBER.is_match("8,000.00"));
        assert!(BARE_NUMBER.is_match("14"));
        assert!(BARE_NUMBER.is_match("14.5"));
        assert!(!BARE_NUMBER.is_match("14.555"));
        assert!(!BARE_NUMBER.is_match("INR 14"));
        assert!(!BARE_NUMBER.is_match(",14"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Debited  from\tXX5779 "), "Debited from XX5779");
    }

    #[test]
    fn test_custom_template_compiles() {
        let mut template = StatementTemplate::default();
        template.currency_markers = strings(&["Rs.", "USD", "$"]);
        template.month_abbreviations = strings(&["Jan", "Sept"]);

        let p = Patterns::compile(&template).unwrap();
        assert!(p.date_line.is_match("Sept 3, 2024"));
        assert!(p.bare_currency.is_match("Rs."));
        assert!(p.bare_currency.is_match("$"));
        assert!(p.amount.extract("USD 12").is_some());
    }
}
