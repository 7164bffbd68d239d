//! Rule-based line classifiers for statement text.

pub mod amounts;
pub mod anchor;
pub mod classifier;
pub mod labels;
pub mod patterns;

pub use amounts::{format_amount, normalize_amount, normalize_amount_str, AmountExtractor, DEFAULT_AMOUNT};
pub use anchor::{Anchor, AnchorDetector};
pub use classifier::{Field, LineClassifier};
pub use labels::LabeledTokenExtractor;
pub use patterns::{collapse_whitespace, Patterns};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in a line, with the text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source line.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
