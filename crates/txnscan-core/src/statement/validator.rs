//! Statement validation: refuse documents that are not statements before
//! spending a parse on them, so "wrong file" never looks like "no
//! transactions".

use tracing::debug;

use crate::error::RejectionReason;
use crate::models::config::StatementTemplate;

use super::rules::collapse_whitespace;

/// Outcome of validating extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The text contains `marker` (as configured, not as found).
    Valid { marker: String },
    Invalid(RejectionReason),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }
}

/// Case-insensitive statement-marker search.
#[derive(Debug, Clone)]
pub struct StatementValidator {
    /// (as configured, normalized for matching)
    markers: Vec<(String, String)>,
}

impl StatementValidator {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|m| {
                let original = m.as_ref().trim().to_string();
                let normalized = collapse_whitespace(&original).to_lowercase();
                (original, normalized)
            })
            .filter(|(_, normalized)| !normalized.is_empty())
            .collect();
        Self { markers }
    }

    pub fn from_template(template: &StatementTemplate) -> Self {
        Self::new(&template.statement_markers)
    }

    pub fn validate(&self, text: &str) -> Validation {
        if text.trim().is_empty() {
            debug!("Rejecting statement: no text");
            return Validation::Invalid(RejectionReason::EmptyDocument);
        }

        let haystack = collapse_whitespace(text).to_lowercase();
        let found = self
            .markers
            .iter()
            .find(|(_, normalized)| haystack.contains(normalized.as_str()));

        match found {
            Some((marker, _)) => {
                debug!("Statement marker found: {}", marker);
                Validation::Valid {
                    marker: marker.clone(),
                }
            }
            None => {
                debug!(
                    "Rejecting statement: none of {} markers found in {} chars",
                    self.markers.len(),
                    text.len()
                );
                Validation::Invalid(RejectionReason::MissingStatementMarkers)
            }
        }
    }
}

impl Default for StatementValidator {
    fn default() -> Self {
        Self::from_template(&StatementTemplate::default())
    }
}
