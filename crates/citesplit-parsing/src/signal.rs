use crate::chunk::Chunk;
use crate::protected::ProtectedRegions;
use crate::text_processing::{
    has_alphanumeric, markup_prefix_len, strip_markup, trim_markup_end, trim_span_matches,
};
use crate::types::Span;

/// Signal that only splits after an earlier [`GATE_OPENER`] in the same chunk.
pub const GATED_SIGNAL: &str = "with";

/// Signal that enables [`GATED_SIGNAL`].
pub const GATE_OPENER: &str = "compare";

/// An occurrence of a signal keyword inside a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalCandidate<'t> {
    pub start: usize,
    pub end: usize,
    /// The configured keyword that matched.
    pub signal: &'t str,
    /// Position of the keyword in the table, used as the final tie-breaker.
    order: usize,
}

impl SignalCandidate<'_> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A signal found at the very start of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingSignal<'a> {
    /// Byte offset just past the matched keyword.
    pub end: usize,
    /// The keyword as written in the text.
    pub text: &'a str,
}

/// Ordered, immutable signal keyword table.
#[derive(Debug, Clone, Default)]
pub struct SignalTable {
    keywords: Vec<String>,
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Match `keyword` case-insensitively at byte `pos` of `text`, with any
/// whitespace run in the text standing in for a space in the keyword.
/// Returns the end offset of the match.
fn match_keyword_at(text: &str, pos: usize, limit: usize, keyword: &str) -> Option<usize> {
    let hay = text.get(pos..limit)?;
    let mut hay_chars = hay.char_indices().peekable();
    let mut kw_chars = keyword.chars().peekable();

    while let Some(k) = kw_chars.next() {
        if k.is_whitespace() {
            let mut consumed = false;
            while hay_chars.next_if(|&(_, h)| h.is_whitespace()).is_some() {
                consumed = true;
            }
            if !consumed {
                return None;
            }
            while kw_chars.next_if(|c| c.is_whitespace()).is_some() {}
            continue;
        }
        let (_, h) = hay_chars.next()?;
        if !chars_eq_ignore_case(h, k) {
            return None;
        }
    }

    let consumed = hay_chars.peek().map_or(hay.len(), |&(i, _)| i);
    Some(pos + consumed)
}

/// Keywords ending in a letter or digit must not run into a following word
/// (`see` in `seemingly`, `with` in `without`).
fn ends_at_word_boundary(text: &str, end: usize, limit: usize, keyword: &str) -> bool {
    let needs_boundary = keyword.chars().last().is_some_and(char::is_alphanumeric);
    if !needs_boundary {
        return true;
    }
    text.get(end..limit)
        .and_then(|rest| rest.chars().next())
        .is_none_or(|c| !c.is_alphanumeric())
}

/// A keyword must begin a word: at the chunk start, or after whitespace,
/// punctuation or markup. A party name after `v.` is not a signal.
fn starts_word(text: &str, chunk_start: usize, pos: usize) -> bool {
    let before = text.get(chunk_start..pos).unwrap_or("");
    let trimmed = trim_markup_end(before);
    match trimmed.chars().next_back() {
        None => true,
        Some('.') => !ends_with_versus(trimmed),
        Some(_) => before.chars().next_back().is_some_and(|c| !c.is_alphanumeric()),
    }
}

/// `Smith v.` / `Smith vs.`: the next word is a party name, not a signal.
fn ends_with_versus(before: &str) -> bool {
    let word = before[..before.len() - 1]
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("");
    word == "v" || word == "vs"
}

impl SignalTable {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// The longest signal keyword at the start of `text`, after markup.
    pub fn leading_signal<'a>(&self, text: &'a str) -> Option<LeadingSignal<'a>> {
        let start = markup_prefix_len(text);
        self.keywords
            .iter()
            .filter_map(|k| {
                let end = match_keyword_at(text, start, text.len(), k)?;
                ends_at_word_boundary(text, end, text.len(), k).then_some(end)
            })
            .max()
            .map(|end| LeadingSignal {
                end,
                text: &text[start..end],
            })
    }

    /// Every keyword occurrence in `chunk` that sits outside protected
    /// regions, before any merged supplemental tail, and at a boundary.
    pub(crate) fn find_candidates(
        &self,
        text: &str,
        chunk: &Chunk,
        regions: &ProtectedRegions,
    ) -> Vec<SignalCandidate<'_>> {
        let span = chunk.span;
        let search_end = chunk.supplemental_start.unwrap_or(span.end).min(span.end);
        let mut candidates = Vec::new();

        for (offset, c) in span.slice(text).char_indices() {
            let pos = span.start + offset;
            if pos >= search_end {
                break;
            }
            if !c.is_alphabetic() || regions.is_protected(pos) {
                continue;
            }
            if !starts_word(text, span.start, pos) {
                continue;
            }
            for (order, keyword) in self.keywords.iter().enumerate() {
                let Some(end) = match_keyword_at(text, pos, span.end, keyword) else {
                    continue;
                };
                if !ends_at_word_boundary(text, end, span.end, keyword) {
                    continue;
                }
                candidates.push(SignalCandidate {
                    start: pos,
                    end,
                    signal: keyword,
                    order,
                });
            }
        }

        candidates
    }
}

/// Whether `keyword` is the gated signal, which never opens a citation on its own.
pub fn is_gated(keyword: &str) -> bool {
    keyword.eq_ignore_ascii_case(GATED_SIGNAL)
}

fn is_gate_opener(keyword: &str) -> bool {
    keyword.eq_ignore_ascii_case(GATE_OPENER)
}

/// Sort candidates by start (longer match first on ties) and greedily keep
/// non-overlapping ones. The gated keyword survives only when an accepted
/// opener precedes it with no semicolon in between.
pub(crate) fn resolve_candidates<'t>(
    text: &str,
    mut candidates: Vec<SignalCandidate<'t>>,
) -> Vec<SignalCandidate<'t>> {
    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.order.cmp(&b.order))
    });

    let mut accepted: Vec<SignalCandidate<'t>> = Vec::new();
    let mut last_end = 0usize;
    let mut opener_end: Option<usize> = None;

    for candidate in candidates {
        if !accepted.is_empty() && candidate.start < last_end {
            continue;
        }
        if is_gated(candidate.signal) {
            let gate_open = opener_end.is_some_and(|end| {
                text.get(end..candidate.start)
                    .is_some_and(|between| !between.contains(';'))
            });
            if !gate_open {
                tracing::trace!(pos = candidate.start, "dropping ungated signal");
                continue;
            }
        }
        if is_gate_opener(candidate.signal) {
            opener_end = Some(candidate.end);
        }
        last_end = candidate.end;
        accepted.push(candidate);
    }

    accepted
}

/// Split `chunk` at the start of every accepted signal.
///
/// Fragments are trimmed of whitespace and trailing separators; fragments
/// with no alphanumeric content are dropped.
pub(crate) fn split_at_signals(
    text: &str,
    chunk: &Chunk,
    accepted: &[SignalCandidate<'_>],
) -> Vec<Chunk> {
    let mut bounds: Vec<usize> = vec![chunk.span.start];
    bounds.extend(
        accepted
            .iter()
            .map(|c| c.start)
            .filter(|&s| s < chunk.span.end)
            .filter(|&s| !trim_markup_end(Span::new(chunk.span.start, s).slice(text)).is_empty()),
    );
    bounds.push(chunk.span.end);

    bounds
        .windows(2)
        .filter_map(|w| {
            let span = trim_span_matches(text, Span::new(w[0], w[1]), |c| {
                c.is_whitespace() || c == ',' || c == ';'
            });
            if span.is_empty() || !has_alphanumeric(&strip_markup(span.slice(text))) {
                return None;
            }
            let supplemental_start = chunk
                .supplemental_start
                .filter(|&s| span.start <= s && s < span.end);
            Some(Chunk {
                span,
                supplemental_start,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SIGNALS;

    fn table() -> SignalTable {
        SignalTable::new(DEFAULT_SIGNALS.iter().copied())
    }

    fn split(text: &str) -> Vec<&str> {
        let regions = ProtectedRegions::scan(text);
        let chunk = Chunk::new(Span::new(0, text.len()));
        let table = table();
        let candidates = table.find_candidates(text, &chunk, &regions);
        let accepted = resolve_candidates(text, candidates);
        split_at_signals(text, &chunk, &accepted)
            .into_iter()
            .map(|c| c.span.slice(text))
            .collect()
    }

    #[test]
    fn test_match_keyword_case_and_whitespace() {
        let text = "SEE\n  ALSO Smith";
        assert_eq!(match_keyword_at(text, 0, text.len(), "see also"), Some(10));
        assert_eq!(match_keyword_at(text, 0, text.len(), "see, e.g.,"), None);
        assert_eq!(match_keyword_at(text, 0, 2, "see"), None);
    }

    #[test]
    fn test_longest_match_wins_at_same_start() {
        assert_eq!(
            split("See also Smith, 100 U.S. 1, see Jones, 200 U.S. 2"),
            vec!["See also Smith, 100 U.S. 1", "see Jones, 200 U.S. 2"]
        );
    }

    #[test]
    fn test_see_eg_is_one_signal() {
        assert_eq!(
            split("See, e.g., Smith, 100 U.S. 1"),
            vec!["See, e.g., Smith, 100 U.S. 1"]
        );
    }

    #[test]
    fn test_compare_with() {
        assert_eq!(
            split("Compare Smith, 100 U.S. 1 (2000), with Jones, 200 U.S. 2 (2000)"),
            vec!["Compare Smith, 100 U.S. 1 (2000)", "with Jones, 200 U.S. 2 (2000)"]
        );
    }

    #[test]
    fn test_with_without_compare_is_ignored() {
        assert_eq!(
            split("Jones, 200 U.S. 2 (2000), with additional context"),
            vec!["Jones, 200 U.S. 2 (2000), with additional context"]
        );
    }

    #[test]
    fn test_with_blocked_by_semicolon() {
        let text = "Compare Smith, 1 U.S. 1; Jones, 2 U.S. 2, with Doe, 3 U.S. 3";
        let regions = ProtectedRegions::scan(text);
        let chunk = Chunk::new(Span::new(0, text.len()));
        let table = table();
        let accepted = resolve_candidates(text, table.find_candidates(text, &chunk, &regions));
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].signal, "compare");
    }

    #[test]
    fn test_no_split_inside_parenthetical() {
        assert_eq!(
            split("Smith, 100 U.S. 1 (2000) (citing, see also, Doe)"),
            vec!["Smith, 100 U.S. 1 (2000) (citing, see also, Doe)"]
        );
    }

    #[test]
    fn test_signal_after_whitespace_splits() {
        assert_eq!(
            split("Smith, 100 U.S. 1 see Jones, 200 U.S. 2"),
            vec!["Smith, 100 U.S. 1", "see Jones, 200 U.S. 2"]
        );
        assert_eq!(
            split("Compare Smith, 100 U.S. 1 with Jones, 200 U.S. 2"),
            vec!["Compare Smith, 100 U.S. 1", "with Jones, 200 U.S. 2"]
        );
    }

    #[test]
    fn test_signal_inside_word_does_not_split() {
        assert_eq!(split("Smith, seemingly, 1 U.S. 1"), vec!["Smith, seemingly, 1 U.S. 1"]);
        assert_eq!(
            split("Tennessee v. Doe, 1 U.S. 1"),
            vec!["Tennessee v. Doe, 1 U.S. 1"]
        );
    }

    #[test]
    fn test_markup_before_leading_signal_is_not_a_split() {
        assert_eq!(
            split("*<i>See</i>* Smith, 1 U.S. 1"),
            vec!["*<i>See</i>* Smith, 1 U.S. 1"]
        );
    }

    #[test]
    fn test_party_name_after_versus_is_not_a_signal() {
        assert_eq!(
            split("Smith v. Contra Costa County, 1 F.3d 2"),
            vec!["Smith v. Contra Costa County, 1 F.3d 2"]
        );
    }

    #[test]
    fn test_split_after_sentence_period() {
        assert_eq!(
            split("The rule is settled. See Smith, 100 U.S. 1."),
            vec!["The rule is settled.", "See Smith, 100 U.S. 1."]
        );
    }

    #[test]
    fn test_punctuation_only_fragments_dropped() {
        assert_eq!(split(", ; see Smith"), vec!["see Smith"]);
    }

    #[test]
    fn test_supplemental_tail_is_not_searched() {
        let text = "Smith, 1 U.S. 1; see supra note 5";
        let regions = ProtectedRegions::scan(text);
        let tail = text.find("see").unwrap();
        let chunk = Chunk {
            span: Span::new(0, text.len()),
            supplemental_start: Some(tail),
        };
        let table = table();
        assert!(table.find_candidates(text, &chunk, &regions).is_empty());
    }

    #[test]
    fn test_leading_signal() {
        let t = table();
        let sig = t.leading_signal("*See also* Smith").unwrap();
        assert_eq!(sig.text, "See also");
        assert_eq!(sig.end, 9);
        assert!(t.leading_signal("Seemingly so").is_none());
        assert_eq!(t.leading_signal("with Jones").unwrap().text, "with");
        assert_eq!(t.leading_signal("But see, e.g., Doe").unwrap().text, "But see, e.g.,");
    }

    #[test]
    fn test_custom_table() {
        let t = SignalTable::new(["vgl."]);
        let text = "Smith, 1 U.S. 1; vgl. Doe";
        let regions = ProtectedRegions::scan(text);
        let chunk = Chunk::new(Span::new(0, text.len()));
        let found = t.find_candidates(text, &chunk, &regions);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].signal, "vgl.");
    }
}
