//! Transaction-start detection.
//!
//! An anchor is a date line immediately followed by a time line. A date line
//! on its own is never an anchor; narrative text mentioning a date must not
//! open a transaction.

use crate::statement::lines::RawLine;

use super::patterns::Patterns;

/// A recognized date/time pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Position of the date line in the line sequence.
    pub position: usize,
    pub date: String,
    pub time: String,
}

/// Detects anchors in a line sequence.
pub struct AnchorDetector<'p> {
    patterns: &'p Patterns,
}

impl<'p> AnchorDetector<'p> {
    pub fn new(patterns: &'p Patterns) -> Self {
        Self { patterns }
    }

    pub fn is_date_line(&self, text: &str) -> bool {
        self.patterns.date_line.is_match(text.trim())
    }

    pub fn is_time_line(&self, text: &str) -> bool {
        self.patterns.time_line.is_match(text.trim())
    }

    /// Whether `lines[cursor]` opens a transaction.
    pub fn is_anchor(&self, lines: &[RawLine], cursor: usize) -> bool {
        self.anchor_at(lines, cursor).is_some()
    }

    /// The anchor starting at `cursor`, if any.
    pub fn anchor_at(&self, lines: &[RawLine], cursor: usize) -> Option<Anchor> {
        let date = lines.get(cursor)?;
        if !self.is_date_line(&date.text) {
            return None;
        }

        let time = lines.get(cursor + 1)?;
        if !self.is_time_line(&time.text) {
            return None;
        }

        Some(Anchor {
            position: cursor,
            date: date.text.trim().to_string(),
            time: time.text.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::lines::from_lines;

    #[test]
    fn test_anchor_requires_time_line() {
        let detector = AnchorDetector::new(Patterns::default_template());
        let lines = from_lines(["Mar 08, 2025", "2:30 PM", "Mar 09, 2025", "Paid to X"]);

        let anchor = detector.anchor_at(&lines, 0).unwrap();
        assert_eq!(anchor.date, "Mar 08, 2025");
        assert_eq!(anchor.time, "2:30 PM");
        assert_eq!(anchor.position, 0);

        assert!(!detector.is_anchor(&lines, 1));
        assert!(!detector.is_anchor(&lines, 2));
    }

    #[test]
    fn test_date_on_last_line() {
        let detector = AnchorDetector::new(Patterns::default_template());
        let lines = from_lines(["Mar 08, 2025"]);
        assert!(!detector.is_anchor(&lines, 0));
        assert!(!detector.is_anchor(&lines, 5));
    }

    #[test]
    fn test_time_before_date_is_not_anchor() {
        let detector = AnchorDetector::new(Patterns::default_template());
        let lines = from_lines(["2:30 PM", "Mar 08, 2025"]);
        assert!(!detector.is_anchor(&lines, 0));
    }
}
