use crate::chunk::Chunk;
use crate::config::SegmenterConfig;
use crate::patterns::{CASE_NAME_RE, ID_START_RE, STATUTE_RE};
use crate::protected::ProtectedRegions;
use crate::sentence::{Abbreviations, count_sentence_boundaries};
use crate::signal::{SignalTable, is_gated};
use crate::text_processing::{byte_offset_for_chars, char_position, markup_prefix_len};
use crate::types::{FootnoteMode, Span};

/// Which rule settled the mode; logged alongside the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeRule {
    FewSentences,
    ManySemicolons,
    CitationLead,
    LateCitation,
    NoCitationToken,
    EarlyCitation,
}

impl ModeRule {
    fn as_str(self) -> &'static str {
        match self {
            Self::FewSentences => "few sentence boundaries",
            Self::ManySemicolons => "semicolon-delimited",
            Self::CitationLead => "opens with a citation",
            Self::LateCitation => "first citation token is late",
            Self::NoCitationToken => "no citation token",
            Self::EarlyCitation => "first citation token is early",
        }
    }

    fn mode(self) -> FootnoteMode {
        match self {
            Self::LateCitation => FootnoteMode::Narrative,
            _ => FootnoteMode::Traditional,
        }
    }
}

/// Inputs shared by every mode rule.
pub(crate) struct ModeInputs<'a> {
    pub text: &'a str,
    pub regions: &'a ProtectedRegions,
    pub signals: &'a SignalTable,
    pub abbreviations: &'a Abbreviations,
    pub config: &'a SegmenterConfig,
}

/// Decide whether a footnote is a flat citation string or narrative prose.
pub(crate) fn classify_mode(inputs: &ModeInputs<'_>) -> FootnoteMode {
    let rule = decide(inputs);
    tracing::debug!(mode = %rule.mode(), reason = rule.as_str(), "footnote mode");
    rule.mode()
}

fn decide(inputs: &ModeInputs<'_>) -> ModeRule {
    let ModeInputs {
        text,
        regions,
        signals,
        abbreviations,
        config,
    } = *inputs;

    let boundaries = count_sentence_boundaries(text, regions, abbreviations);
    if boundaries < config.min_sentence_boundaries {
        return ModeRule::FewSentences;
    }

    let semicolons = text
        .match_indices(';')
        .filter(|&(pos, _)| !regions.is_protected(pos))
        .count();
    if semicolons > config.max_semicolons {
        return ModeRule::ManySemicolons;
    }

    let lead_start = markup_prefix_len(text);
    let body = &text[lead_start..];
    let window = &body[..byte_offset_for_chars(body, config.lead_window_chars)];
    if opens_with_citation(window, signals, config.case_name_window_chars) {
        return ModeRule::CitationLead;
    }

    match first_citation_token(text, lead_start, regions, signals) {
        None => ModeRule::NoCitationToken,
        Some(pos) if char_position(body, pos - lead_start) > config.case_name_window_chars => {
            ModeRule::LateCitation
        }
        Some(_) => ModeRule::EarlyCitation,
    }
}

fn opens_with_citation(window: &str, signals: &SignalTable, case_name_window: usize) -> bool {
    if signals
        .leading_signal(window)
        .is_some_and(|s| !is_gated(s.text))
    {
        return true;
    }
    if ID_START_RE.is_match(window) {
        return true;
    }
    CASE_NAME_RE
        .find(window)
        .is_some_and(|m| char_position(window, m.start()) < case_name_window)
}

/// Byte offset of the earliest citation-like token at or after `from`:
/// a capitalised signal at a boundary, a `v.` case name, or a statute cite.
fn first_citation_token(
    text: &str,
    from: usize,
    regions: &ProtectedRegions,
    signals: &SignalTable,
) -> Option<usize> {
    let whole = Chunk::new(Span::new(from, text.len()));
    let signal = signals
        .find_candidates(text, &whole, regions)
        .into_iter()
        .filter(|c| !is_gated(c.signal))
        .find(|c| text[c.start..].starts_with(char::is_uppercase))
        .map(|c| c.start);

    let rest = &text[from..];
    let case_name = CASE_NAME_RE.find(rest).map(|m| from + m.start());
    let statute = STATUTE_RE.find(rest).map(|m| from + m.start());

    [signal, case_name, statute].into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ABBREVIATIONS, DEFAULT_SIGNALS, SegmenterConfigBuilder};

    fn mode_with(text: &str, config: &SegmenterConfig) -> FootnoteMode {
        let regions = ProtectedRegions::scan(text);
        let signals = SignalTable::new(DEFAULT_SIGNALS.iter().copied());
        let abbreviations = Abbreviations::new(DEFAULT_ABBREVIATIONS.iter().copied());
        classify_mode(&ModeInputs {
            text,
            regions: &regions,
            signals: &signals,
            abbreviations: &abbreviations,
            config,
        })
    }

    fn mode(text: &str) -> FootnoteMode {
        mode_with(text, &SegmenterConfig::default())
    }

    const NARRATIVE: &str = "The doctrine has a long history. Courts have struggled for decades. \
        Smith v. Jones, 100 U.S. 1 (2000). The court there adopted a broad rule. \
        Doe v. Roe, 200 U.S. 2 (2001).";

    #[test]
    fn test_short_citation_string_is_traditional() {
        assert_eq!(
            mode("See Smith v. Jones, 100 U.S. 1 (2000); Doe v. Roe, 200 U.S. 2 (2001)."),
            FootnoteMode::Traditional
        );
    }

    #[test]
    fn test_late_case_name_is_narrative() {
        assert_eq!(mode(NARRATIVE), FootnoteMode::Narrative);
    }

    #[test]
    fn test_semicolons_force_traditional() {
        let text = "The doctrine has a long history. Courts have struggled for decades; \
            they still do; nobody agrees. Smith v. Jones, 100 U.S. 1 (2000). The rule held. \
            Doe v. Roe, 200 U.S. 2 (2001).";
        assert_eq!(mode(text), FootnoteMode::Traditional);
    }

    #[test]
    fn test_protected_semicolons_do_not_count() {
        let text = "The doctrine has a long history. Courts have struggled (for years; decades; \
            centuries). Smith v. Jones, 100 U.S. 1 (2000). The court there adopted a broad rule. \
            Doe v. Roe, 200 U.S. 2 (2001).";
        assert_eq!(mode(text), FootnoteMode::Narrative);
    }

    #[test]
    fn test_leading_signal_is_traditional() {
        let text = "See Smith v. Jones, 100 U.S. 1 (2000). The court adopted a rule. \
            It was broad. It was also new. Doe v. Roe, 200 U.S. 2 (2001).";
        assert_eq!(mode(text), FootnoteMode::Traditional);
    }

    #[test]
    fn test_leading_id_is_traditional() {
        let text = "Id. at 5. The court adopted a rule. It was broad. It was also new.";
        assert_eq!(mode(text), FootnoteMode::Traditional);
    }

    #[test]
    fn test_prose_without_citations_is_traditional() {
        let text = "This is prose. It has sentences. Many of them. None cite anything.";
        assert_eq!(mode(text), FootnoteMode::Traditional);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let config = SegmenterConfigBuilder::new()
            .min_sentence_boundaries(10)
            .build()
            .unwrap();
        assert_eq!(mode_with(NARRATIVE, &config), FootnoteMode::Traditional);

        let config = SegmenterConfigBuilder::new()
            .lead_window_chars(150)
            .case_name_window_chars(100)
            .build()
            .unwrap();
        assert_eq!(mode_with(NARRATIVE, &config), FootnoteMode::Traditional);
    }
}
