//! Type assignment and per-type field extraction for a single citation unit.
//!
//! Every extractor is tolerant: a field whose pattern does not match is left
//! unset and never causes the unit to change type.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::chunk::Chunk;
use crate::patterns::{ID_START_RE, STATUTE_RE, find_case_reporter, find_journal, find_short_case};
use crate::protected::{ProtectedRegions, RegionKind};
use crate::sentence::{Abbreviations, split_sentences};
use crate::signal::SignalTable;
use crate::text_processing::{clean_field, has_alphanumeric, markup_prefix_len, normalize_whitespace};
use crate::types::{
    ArticleFields, CaseFields, Citation, CitationDetails, ShortFormFields, Span, StatuteFields,
};

static SUPRA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsupra\b").unwrap());
static INFRA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\binfra\b").unwrap());

/// Pinpoint right after a reporter's first page: `, 5`, `, at 5-7`, `, 460 n.3`.
static PINPOINT_AFTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*,\s*(?:at\s+)?(?P<pin>\*?\d+(?:\s*[-–—]\s*\d+)?(?:\s*,\s*\d+(?:\s*[-–—]\s*\d+)?)*(?:\s*n\.\s*\d+)?)",
    )
    .unwrap()
});

/// First parenthetical following a match, not necessarily adjacent.
static NEXT_PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^()]*?\((?P<inner>[^()]*)\)").unwrap());

static TRAILING_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(?P<year>\d{4})$").unwrap());

/// `Jan. 5,` style decision date left on a court name once the year is gone.
static DATE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\s*(?:Jan|Feb|Mar|Apr|May|June?|July?|Aug|Sept?|Oct|Nov|Dec)[a-z]*\.?\s+\d{1,2},?$",
    )
    .unwrap()
});

static AT_PIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bat\s+(?P<pin>\d[\w–—-]*)").unwrap());

static NOTE_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:supra|infra)\s*[,]?\s+(?:(?:notes?|nn?\.)\s*(?P<num>\d+(?:\s*(?:[-–—]|,|&|and|to)\s*\d+)*)|(?P<part>(?:Part|Section|§)\s+[\w.]+))",
    )
    .unwrap()
});

static ID_NOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bnn?\.\s*(?P<num>\d+(?:\s*[-–—]\s*\d+)?)").unwrap());

/// Lookups shared by every unit of one footnote.
pub(crate) struct UnitContext<'a> {
    pub text: &'a str,
    pub regions: &'a ProtectedRegions,
    pub signals: &'a SignalTable,
    pub abbreviations: &'a Abbreviations,
}

/// Classify `unit` and extract its fields into a [`Citation`].
pub(crate) fn build_citation(
    ctx: &UnitContext<'_>,
    unit: &Chunk,
    footnote_num: usize,
    citation_num: usize,
) -> Citation {
    let text = ctx.text;
    let unit_text = unit.span.slice(text);

    let leading = ctx.signals.leading_signal(unit_text);
    let signal = leading.map(|s| s.text.trim_end_matches(',').to_string());
    let body_start = unit.span.start + leading.map_or(0, |s| s.end);
    let body_start = body_start + skip_separators(&text[body_start..unit.span.end]);
    let body = Span::new(body_start, head_end(ctx, unit).max(body_start));

    let details = classify_body(ctx, body);
    tracing::trace!(
        citation_num,
        citation_type = %details.citation_type(),
        "classified unit"
    );

    Citation::new(
        footnote_num,
        citation_num,
        unit_text.to_string(),
        unit.span,
        details,
        signal,
        first_quotation(ctx, unit.span),
        last_parenthetical(ctx, unit.span),
    )
}

/// Bytes of whitespace, markup and commas at the start of `text`.
fn skip_separators(text: &str) -> usize {
    let mut offset = 0;
    loop {
        let rest = &text[offset..];
        let markup = markup_prefix_len(rest);
        let after = &rest[markup..];
        let step = markup + (after.len() - after.trim_start_matches(',').len());
        if step == 0 {
            return offset;
        }
        offset += step;
    }
}

/// End of the part of a unit that decides its type: the first unprotected
/// semicolon or the start of a merged supplemental pointer.
fn head_end(ctx: &UnitContext<'_>, unit: &Chunk) -> usize {
    let limit = unit.supplemental_start.unwrap_or(unit.span.end).min(unit.span.end);
    Span::new(unit.span.start, limit)
        .slice(ctx.text)
        .match_indices(';')
        .map(|(i, _)| unit.span.start + i)
        .find(|&pos| !ctx.regions.is_protected(pos))
        .unwrap_or(limit)
}

fn classify_body(ctx: &UnitContext<'_>, body: Span) -> CitationDetails {
    let slice = body.slice(ctx.text);
    let open = |pos: usize| !ctx.regions.is_protected(body.start + pos);
    let unprotected = |re: &Regex| re.find_iter(slice).any(|m| open(m.start()));

    if ID_START_RE.is_match(slice) {
        return CitationDetails::Id(extract_id(slice));
    }
    if unprotected(&SUPRA_RE) {
        return CitationDetails::Supra(extract_short_form(slice));
    }
    if unprotected(&INFRA_RE) {
        return CitationDetails::Infra(extract_short_form(slice));
    }
    if let Some(caps) = STATUTE_RE
        .captures_iter(slice)
        .find(|c| c.get(0).is_some_and(|m| open(m.start())))
    {
        return CitationDetails::Statute(extract_statute(slice, &caps));
    }
    if let Some(caps) = find_case_reporter(slice, open) {
        return CitationDetails::Case(extract_case(ctx, body, &caps));
    }
    if let Some(caps) = find_short_case(slice, open) {
        return CitationDetails::Case(extract_short_case(ctx, body, &caps));
    }
    if let Some(caps) = find_journal(slice, open) {
        return CitationDetails::Article(extract_article(ctx, body, &caps));
    }
    CitationDetails::Unknown
}

/// The last sentence of `body` before byte offset `end` (relative to `body`).
fn last_sentence_before<'a>(ctx: &UnitContext<'a>, body: Span, end: usize) -> Option<&'a str> {
    let prefix = Span::new(body.start, body.start + end);
    split_sentences(ctx.text, prefix, ctx.regions, ctx.abbreviations)
        .last()
        .map(|s| s.slice(ctx.text))
}

fn name_field(raw: Option<&str>) -> Option<String> {
    clean_field(raw?).filter(|s| s.chars().any(char::is_alphabetic))
}

/// Court and year from the first parenthetical after a reporter or section.
fn court_and_year(after: &str) -> (Option<String>, Option<String>) {
    let Some(caps) = NEXT_PAREN_RE.captures(after) else {
        return (None, None);
    };
    let inner = normalize_whitespace(&caps["inner"]);
    let Some(year) = TRAILING_YEAR_RE.captures(&inner) else {
        return (None, None);
    };
    let year_match = &year["year"];
    let court = inner[..inner.len() - year_match.len()].trim_end();
    let court = DATE_SUFFIX_RE.replace(court, "");
    let court = court.trim().trim_end_matches(',').trim();
    let court = (!court.is_empty()).then(|| court.to_string());
    (court, Some(year_match.to_string()))
}

fn extract_case(ctx: &UnitContext<'_>, body: Span, caps: &Captures<'_>) -> CaseFields {
    let slice = body.slice(ctx.text);
    let Some(m) = caps.get(0) else {
        return CaseFields::default();
    };
    let after = &slice[m.end()..];
    let (court, year) = court_and_year(after);

    CaseFields {
        case_name: name_field(last_sentence_before(ctx, body, m.start())),
        reporter: clean_field(m.as_str()),
        pinpoint: PINPOINT_AFTER_RE
            .captures(after)
            .map(|p| normalize_whitespace(&p["pin"])),
        court,
        year,
    }
}

fn extract_short_case(ctx: &UnitContext<'_>, body: Span, caps: &Captures<'_>) -> CaseFields {
    let slice = body.slice(ctx.text);
    let Some(m) = caps.get(0) else {
        return CaseFields::default();
    };
    let (court, year) = court_and_year(&slice[m.end()..]);

    CaseFields {
        case_name: name_field(last_sentence_before(ctx, body, m.start())),
        reporter: clean_field(&format!("{} {}", &caps["volume"], &caps["source"])),
        pinpoint: clean_field(&caps["pin"]),
        court,
        year,
    }
}

fn extract_article(ctx: &UnitContext<'_>, body: Span, caps: &Captures<'_>) -> ArticleFields {
    let slice = body.slice(ctx.text);
    let Some(m) = caps.get(0) else {
        return ArticleFields::default();
    };
    let prefix = last_sentence_before(ctx, body, m.start()).unwrap_or("");
    let (author, title) = match prefix.split_once(',') {
        Some((author, title)) => (name_field(Some(author)), name_field(Some(title))),
        None => (None, name_field(Some(prefix))),
    };
    let (_, year) = court_and_year(&slice[m.end()..]);

    ArticleFields {
        author,
        title,
        journal: clean_field(&caps["source"]),
        volume: Some(caps["volume"].to_string()),
        start_page: Some(caps["page"].to_string()),
        year,
    }
}

fn extract_statute(slice: &str, caps: &Captures<'_>) -> StatuteFields {
    let section = caps.name("section");
    let year = section.and_then(|s| court_and_year(&slice[s.end()..]).1);

    StatuteFields {
        statute_code: caps.name("code").and_then(|c| clean_field(c.as_str())),
        section: section
            .map(|s| s.as_str().trim_end_matches(['.', ',']).to_string())
            .filter(|s| !s.is_empty()),
        year,
    }
}

fn pinpoint(slice: &str) -> Option<String> {
    AT_PIN_RE
        .captures(slice)
        .map(|c| c["pin"].trim_end_matches(['.', ',']).to_string())
        .filter(|s| has_alphanumeric(s))
}

fn extract_id(slice: &str) -> ShortFormFields {
    ShortFormFields {
        note: ID_NOTE_RE.captures(slice).map(|c| c["num"].to_string()),
        pinpoint: pinpoint(slice),
    }
}

fn extract_short_form(slice: &str) -> ShortFormFields {
    let note = NOTE_REF_RE.captures(slice).and_then(|c| {
        c.name("num")
            .or_else(|| c.name("part"))
            .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
    });

    ShortFormFields {
        note,
        pinpoint: pinpoint(slice),
    }
}

fn first_quotation(ctx: &UnitContext<'_>, span: Span) -> Option<String> {
    ctx.regions
        .within(span)
        .find(|r| r.kind == RegionKind::Quoted)
        .map(|r| r.inner(ctx.text).trim().to_string())
        .filter(|s| !s.is_empty())
}

fn last_parenthetical(ctx: &UnitContext<'_>, span: Span) -> Option<String> {
    ctx.regions
        .within(span)
        .filter(|r| r.kind == RegionKind::Parenthetical)
        .last()
        .map(|r| r.inner(ctx.text).trim().to_string())
        .filter(|s| !s.is_empty())
}
