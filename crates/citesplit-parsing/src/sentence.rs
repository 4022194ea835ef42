use std::collections::HashSet;

use crate::protected::ProtectedRegions;
use crate::text_processing::trim_span;
use crate::types::Span;

/// Lookup table of abbreviations whose trailing period is not a sentence end.
#[derive(Debug, Clone, Default)]
pub struct Abbreviations {
    entries: HashSet<String>,
}

fn normalize_token(token: &str) -> String {
    token
        .trim_end_matches('.')
        .replace('\u{2019}', "'")
        .to_lowercase()
}

impl Abbreviations {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|e| normalize_token(e.as_ref().trim()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Whether `token` (with or without its final period) is a known abbreviation.
    pub fn contains(&self, token: &str) -> bool {
        let normalized = normalize_token(token);
        !normalized.is_empty() && self.entries.contains(&normalized)
    }

    /// Whether the period at byte offset `period` ends an abbreviation rather
    /// than a sentence.
    ///
    /// True when the word before the period is a single capital letter (or a
    /// dotted run ending in one, like `U.S`), is `v`, or is in the table.
    pub fn ends_abbreviation(&self, text: &str, period: usize) -> bool {
        let token = token_before(text, period);
        if token.is_empty() {
            return false;
        }

        let last_segment = token.rsplit('.').next().unwrap_or(token);
        let mut chars = last_segment.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_uppercase() {
                return true;
            }
        }

        token.eq_ignore_ascii_case("v") || self.contains(token) || self.contains(last_segment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}

/// The word immediately before byte offset `end`, without leading punctuation.
fn token_before(text: &str, end: usize) -> &str {
    let Some(prefix) = text.get(..end) else {
        return "";
    };
    let start = prefix
        .rfind(char::is_whitespace)
        .map_or(0, |i| i + prefix[i..].chars().next().map_or(1, char::len_utf8));
    prefix[start..].trim_start_matches(|c: char| !c.is_alphanumeric())
}

/// The word starting at byte offset `start`, up to the next whitespace.
fn token_after(text: &str, start: usize) -> &str {
    let rest = text.get(start..).unwrap_or("");
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    &rest[..end]
}

/// Whether the period at `period` ends a sentence.
///
/// The period must sit outside every protected region, be followed by
/// whitespace or the end of `limit`, and not close an abbreviation.
pub(crate) fn is_sentence_end(
    text: &str,
    period: usize,
    limit: usize,
    regions: &ProtectedRegions,
    abbreviations: &Abbreviations,
) -> bool {
    if regions.is_protected(period) {
        return false;
    }
    let after = period + 1;
    let followed_by_break = after >= limit
        || text
            .get(after..limit)
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_whitespace);
    followed_by_break && !abbreviations.ends_abbreviation(text, period)
}

/// Split `span` into trimmed sentence spans.
pub(crate) fn split_sentences(
    text: &str,
    span: Span,
    regions: &ProtectedRegions,
    abbreviations: &Abbreviations,
) -> Vec<Span> {
    let mut sentences = Vec::new();
    let mut current = span.start;

    for (offset, c) in span.slice(text).char_indices() {
        let pos = span.start + offset;
        if c == '.' && is_sentence_end(text, pos, span.end, regions, abbreviations) {
            let sentence = trim_span(text, Span::new(current, pos + 1));
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current = pos + 1;
        }
    }

    let tail = trim_span(text, Span::new(current, span.end));
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Count sentence boundaries: an unprotected, non-abbreviation period
/// followed by whitespace and a capitalised word that is not itself an
/// abbreviation (`. See` counts, `. Id.` and `. Cf.` do not).
pub(crate) fn count_sentence_boundaries(
    text: &str,
    regions: &ProtectedRegions,
    abbreviations: &Abbreviations,
) -> usize {
    let mut count = 0;
    for (pos, c) in text.char_indices() {
        if c != '.' || !is_sentence_end(text, pos, text.len(), regions, abbreviations) {
            continue;
        }
        let rest = &text[pos + 1..];
        let ws = rest.len() - rest.trim_start().len();
        if ws == 0 {
            continue;
        }
        let next_start = pos + 1 + ws;
        let next_word = token_after(text, next_start);
        let starts_upper = next_word.chars().next().is_some_and(char::is_uppercase);
        if starts_upper && !abbreviations.contains(next_word) {
            count += 1;
        }
    }
    count
}
