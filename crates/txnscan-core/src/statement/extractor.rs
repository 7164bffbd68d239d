//! Single-pass line-window transaction extraction.

use serde::Serialize;
use tracing::{debug, trace};

use crate::models::config::{DiscardRule, ExtractionConfig};
use crate::models::transaction::TransactionRecord;

use super::draft::TransactionDraft;
use super::lines::RawLine;
use super::rules::{AnchorDetector, LineClassifier, Patterns};

/// Records extracted from one line sequence, with counters for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub records: Vec<TransactionRecord>,
    /// Anchors recognized (drafts opened).
    pub anchors: usize,
    /// Drafts dropped by the discard rule.
    pub discarded: usize,
}

/// Scans lines once: every anchor closes the previous draft and opens a new
/// one; lines after an anchor are classified into the open draft while they
/// are within the lookahead window.
pub struct LineWindowExtractor<'p> {
    patterns: &'p Patterns,
    lookahead_window: usize,
    discard_rule: DiscardRule,
}

impl<'p> LineWindowExtractor<'p> {
    pub fn new(patterns: &'p Patterns, config: &ExtractionConfig) -> Self {
        Self {
            patterns,
            lookahead_window: config.lookahead_window,
            discard_rule: config.discard_rule,
        }
    }

    pub fn extract(&self, lines: &[RawLine]) -> Extraction {
        let detector = AnchorDetector::new(self.patterns);
        let classifier = LineClassifier::new(self.patterns);

        let mut extraction = Extraction::default();
        let mut current: Option<TransactionDraft> = None;
        let mut cursor = 0;

        while cursor < lines.len() {
            if let Some(anchor) = detector.anchor_at(lines, cursor) {
                if let Some(draft) = current.take() {
                    self.close(draft, &mut extraction);
                }
                trace!("Anchor at line {}: {} {}", lines[cursor].index, anchor.date, anchor.time);
                extraction.anchors += 1;
                current = Some(TransactionDraft::open(anchor));
                cursor += 2;
                continue;
            }

            let line = &lines[cursor];
            let Some(draft) = current.as_mut() else {
                trace!("Line {} precedes first anchor: {}", line.index, line.text);
                cursor += 1;
                continue;
            };

            if cursor - draft.anchor_position() > self.lookahead_window {
                trace!("Line {} outside lookahead window: {}", line.index, line.text);
                cursor += 1;
                continue;
            }

            let next = lines.get(cursor + 1).map(|l| l.text.as_str());
            let field = classifier.classify(&line.text, next);
            let step = if field.consumes_next() { 2 } else { 1 };

            match field.name() {
                "unmatched" => trace!("Unmatched line {}: {}", line.index, line.text),
                name => trace!("Line {} -> {}", line.index, name),
            }
            draft.apply(field);
            cursor += step;
        }

        if let Some(draft) = current.take() {
            self.close(draft, &mut extraction);
        }

        debug!(
            "Extracted {} transactions from {} lines ({} anchors, {} discarded)",
            extraction.records.len(),
            lines.len(),
            extraction.anchors,
            extraction.discarded
        );

        extraction
    }

    fn close(&self, draft: TransactionDraft, extraction: &mut Extraction) {
        let position = draft.anchor_position();
        match draft.finalize(self.discard_rule) {
            Some(record) => {
                trace!(
                    "Emitting transaction from line {}: {} - {}",
                    position, record.details, record.amount
                );
                extraction.records.push(record);
            }
            None => {
                debug!("Discarding draft opened at line {}: no details, amount or type", position);
                extraction.discarded += 1;
            }
        }
    }
}
