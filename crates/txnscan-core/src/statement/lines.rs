//! Line preparation: the extractor sees trimmed, non-blank lines only.

/// One non-blank line of extracted statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Position in the filtered sequence (0-indexed).
    pub index: usize,
    /// Trimmed, non-empty content.
    pub text: String,
}

impl RawLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Split extracted text into numbered, trimmed, non-blank lines.
pub fn split_lines(text: &str) -> Vec<RawLine> {
    from_lines(text.split(['\n', '\r']))
}

/// Prepare an already split line sequence the same way as [`split_lines`].
pub fn from_lines<I, S>(lines: I) -> Vec<RawLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let trimmed = line.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .enumerate()
        .map(|(index, text)| RawLine::new(index, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_drops_blanks_and_renumbers() {
        let lines = split_lines("  Mar 08, 2025 \r\n\r\n2:30 PM\n   \n\tPaid to X\rINR 5\n");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(texts, vec!["Mar 08, 2025", "2:30 PM", "Paid to X", "INR 5"]);
        assert_eq!(lines.iter().map(|l| l.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\n \n\u{00a0}\n").is_empty());
    }
}
