//! Amount extraction and normalization.
//!
//! Amounts are re-emitted with exactly two fraction digits. Rounding is
//! half away from zero, so "12.345" becomes "12.35".

use std::str::FromStr;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use super::patterns::{alternation, Bounds};
use super::{ExtractionMatch, FieldExtractor};
use crate::error::Result;

/// Amount used when a currency marker is present but no number parses.
pub const DEFAULT_AMOUNT: &str = "0.00";

/// Finds a number adjacent to a currency marker: "INR 1,234.5", "₹8000.00",
/// "14.00 INR".
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    marker_first: Regex,
    number_first: Regex,
}

impl AmountExtractor {
    pub fn new(markers: &[String]) -> Result<Self> {
        let marker_first = Regex::new(&format!(
            r"(?i){}\s*:?\s*(?P<number>\d[\d,.]*)",
            alternation(markers, Bounds::LEADING)
        ))?;
        let number_first = Regex::new(&format!(
            r"(?i)(?P<number>\d[\d,.]*)\s*{}",
            alternation(markers, Bounds::TRAILING)
        ))?;
        Ok(Self {
            marker_first,
            number_first,
        })
    }

    /// Numbers after a marker win; "14.00 INR" is read only when the line
    /// has no marker-first amount.
    fn captures<'t>(&self, text: &'t str) -> Vec<regex::Match<'t>> {
        let found: Vec<regex::Match<'t>> = self
            .marker_first
            .captures_iter(text)
            .filter_map(|caps| caps.name("number"))
            .collect();

        if !found.is_empty() {
            return found;
        }

        self.number_first
            .captures_iter(text)
            .filter_map(|caps| caps.name("number"))
            .collect()
    }
}

impl FieldExtractor for AmountExtractor {
    /// Raw numeric token and its normalized value (`0.00` when it does not
    /// parse).
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.captures(text)
            .into_iter()
            .map(|m| {
                let value = normalize_amount(m.as_str()).unwrap_or(Decimal::ZERO);
                ExtractionMatch::new(value, m.as_str()).with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Parse a formatted number ("1,234.5") into a two-place decimal.
///
/// Returns `None` for anything that is not a non-negative decimal once
/// thousands separators are removed.
pub fn normalize_amount(token: &str) -> Option<Decimal> {
    let cleaned: String = token
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.trim_end_matches('.');

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let value = Decimal::from_str(cleaned).ok()?;
    let rounded = to_two_places(value);
    // rescale is a no-op when 28 integer digits leave no room for cents
    (rounded.scale() == 2).then_some(rounded)
}

/// Render a decimal with exactly two fraction digits.
pub fn format_amount(value: Decimal) -> String {
    to_two_places(value).to_string()
}

/// Normalize a numeric token straight to its output string.
pub fn normalize_amount_str(token: &str) -> String {
    normalize_amount(token)
        .map(format_amount)
        .unwrap_or_else(|| DEFAULT_AMOUNT.to_string())
}

fn to_two_places(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> AmountExtractor {
        AmountExtractor::new(&["INR".to_string(), "₹".to_string()]).unwrap()
    }

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount_str("1,234.5"), "1234.50");
        assert_eq!(normalize_amount_str("8000.00"), "8000.00");
        assert_eq!(normalize_amount_str("14"), "14.00");
        assert_eq!(normalize_amount_str("1,00,000"), "100000.00");
        assert_eq!(normalize_amount_str("14."), "14.00");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(normalize_amount_str("12.345"), "12.35");
        assert_eq!(normalize_amount_str("12.344"), "12.34");
        assert_eq!(normalize_amount_str("0.005"), "0.01");
    }

    #[test]
    fn test_unparseable_amount() {
        assert_eq!(normalize_amount("1.2.3"), None);
        assert_eq!(normalize_amount("abc"), None);
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("99999999999999999999999999999999"), None);
        assert_eq!(normalize_amount_str("1.2.3"), DEFAULT_AMOUNT);
    }

    #[test]
    fn test_amount_without_room_for_cents() {
        assert_eq!(normalize_amount("9999999999999999999999999999"), None);
        assert_eq!(normalize_amount_str("9999999999999999999999999999"), DEFAULT_AMOUNT);
        assert_eq!(
            normalize_amount_str("99999999999999999999999999"),
            "99999999999999999999999999.00"
        );
    }

    #[test]
    fn test_extract_marker_first() {
        let found = extractor().extract("INR 1,234.5").unwrap();
        assert_eq!(found.source, "1,234.5");
        assert_eq!(format_amount(found.value), "1234.50");

        let found = extractor().extract("₹ 8000.00").unwrap();
        assert_eq!(format_amount(found.value), "8000.00");

        let found = extractor().extract("inr:14").unwrap();
        assert_eq!(format_amount(found.value), "14.00");
    }

    #[test]
    fn test_extract_number_first() {
        let found = extractor().extract("Amount 250.75 INR").unwrap();
        assert_eq!(format_amount(found.value), "250.75");
    }

    #[test]
    fn test_marker_first_beats_earlier_number() {
        let found = extractor().extract("Order 2 ₹ 14.00").unwrap();
        assert_eq!(found.source, "14.00");
        assert_eq!(format_amount(found.value), "14.00");

        let found = extractor().extract("Order 2 INR").unwrap();
        assert_eq!(format_amount(found.value), "2.00");
    }

    #[test]
    fn test_extract_requires_marker() {
        assert!(extractor().extract("Total 250.75").is_none());
        assert!(extractor().extract("INR").is_none());
        assert!(extractor().extract("MINR 14.00").is_none());
    }

    #[test]
    fn test_extract_all_in_order() {
        let all = extractor().extract_all("₹ 10.00 refunded of INR 25");
        let values: Vec<String> = all.iter().map(|m| format_amount(m.value)).collect();
        assert_eq!(values, vec!["10.00", "25.00"]);
    }
}
