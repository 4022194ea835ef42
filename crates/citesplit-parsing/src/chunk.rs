use crate::patterns::{CASE_NAME_RE, ID_START_RE, WL_RE};
use crate::protected::ProtectedRegions;
use crate::sentence::{Abbreviations, split_sentences};
use crate::signal::{SignalTable, is_gated};
use crate::text_processing::{markup_prefix_len, trim_span};
use crate::types::Span;

/// A contiguous piece of footnote text on its way to becoming citation units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chunk {
    pub span: Span,
    /// Where a merged supplemental reference begins, if one was attached.
    pub supplemental_start: Option<usize>,
}

impl Chunk {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            supplemental_start: None,
        }
    }
}

/// Split a semicolon-delimited citation string at every unprotected `;` or newline.
pub(crate) fn split_traditional(text: &str, span: Span, regions: &ProtectedRegions) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = span.start;

    let mut push = |start: usize, end: usize| {
        let trimmed = trim_span(text, Span::new(start, end));
        if !trimmed.is_empty() {
            chunks.push(Chunk::new(trimmed));
        }
    };

    for (offset, c) in span.slice(text).char_indices() {
        let pos = span.start + offset;
        if matches!(c, ';' | '\n') && !regions.is_protected(pos) {
            push(current, pos);
            current = pos + c.len_utf8();
        }
    }
    push(current, span.end);

    chunks
}

/// Whether a sentence opens like a citation: a signal, a case name, an
/// `Id.`, or anywhere a Westlaw cite.
pub(crate) fn is_citation_bearing(text: &str, sentence: Span, signals: &SignalTable) -> bool {
    let slice = sentence.slice(text);
    let rest = &slice[markup_prefix_len(slice)..];

    signals
        .leading_signal(slice)
        .is_some_and(|s| !is_gated(s.text))
        || CASE_NAME_RE.find(rest).is_some_and(|m| m.start() == 0)
        || ID_START_RE.is_match(rest)
        || WL_RE.is_match(slice)
}

/// Group narrative sentences into chunks.
///
/// Prose before the first citation-bearing sentence is dropped. Each run of
/// citation-bearing sentences closes at the next prose sentence, which starts
/// the following chunk; prose after the last run forms its own chunk. Text
/// with no citation-bearing sentence at all becomes one chunk.
pub(crate) fn split_narrative(
    text: &str,
    span: Span,
    regions: &ProtectedRegions,
    abbreviations: &Abbreviations,
    signals: &SignalTable,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Option<Span> = None;
    let mut in_run = false;

    for sentence in split_sentences(text, span, regions, abbreviations) {
        let bearing = is_citation_bearing(text, sentence, signals);
        match current {
            None if bearing => {
                current = Some(sentence);
                in_run = true;
            }
            None => {}
            Some(ref mut open) if bearing || !in_run => {
                open.end = sentence.end;
                in_run |= bearing;
            }
            Some(open) => {
                chunks.push(Chunk::new(open));
                current = Some(sentence);
                in_run = false;
            }
        }
    }
    if let Some(open) = current {
        chunks.push(Chunk::new(open));
    }

    if chunks.is_empty() {
        let whole = trim_span(text, span);
        if !whole.is_empty() {
            chunks.push(Chunk::new(whole));
        }
    }
    chunks
}
