use std::fmt;

use serde::Serialize;

/// Half-open byte range `[start, end)` into a footnote's text.
///
/// Every intermediate stage of the pipeline (regions, sentences, chunks,
/// units) is expressed as spans over the original input, so an emitted
/// citation's text is always a slice of what the caller passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `pos` lies inside this span.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Whether `other` lies entirely inside this span.
    pub fn encloses(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The text covered by this span. Out-of-range spans yield `""`.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or("")
    }
}

/// Whether a footnote is a flat citation string or prose interleaved with citations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FootnoteMode {
    Traditional,
    Narrative,
}

impl FootnoteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traditional => "traditional",
            Self::Narrative => "narrative",
        }
    }
}

impl fmt::Display for FootnoteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The semantic type assigned to a citation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationType {
    Case,
    Article,
    Statute,
    Id,
    Supra,
    Infra,
    Unknown,
}

impl CitationType {
    pub const ALL: [CitationType; 7] = [
        Self::Case,
        Self::Article,
        Self::Statute,
        Self::Id,
        Self::Supra,
        Self::Infra,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Article => "article",
            Self::Statute => "statute",
            Self::Id => "id",
            Self::Supra => "supra",
            Self::Infra => "infra",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this is one of the short-form back/forward references.
    pub fn is_short_form(&self) -> bool {
        matches!(self, Self::Id | Self::Supra | Self::Infra)
    }
}

impl fmt::Display for CitationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseFields {
    pub case_name: Option<String>,
    /// Volume, reporter abbreviation and first page as written, e.g. `100 U.S. 1`.
    pub reporter: Option<String>,
    pub pinpoint: Option<String>,
    pub court: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleFields {
    pub author: Option<String>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub start_page: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatuteFields {
    pub statute_code: Option<String>,
    pub section: Option<String>,
    pub year: Option<String>,
}

/// Fields shared by `id`, `supra` and `infra` short forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShortFormFields {
    /// Note (or part/section) being pointed at, e.g. `5-8` or `Part II`.
    pub note: Option<String>,
    pub pinpoint: Option<String>,
}

/// Type-specific fields, tagged by citation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationDetails {
    Case(CaseFields),
    Article(ArticleFields),
    Statute(StatuteFields),
    Id(ShortFormFields),
    Supra(ShortFormFields),
    Infra(ShortFormFields),
    Unknown,
}

impl CitationDetails {
    pub fn citation_type(&self) -> CitationType {
        match self {
            Self::Case(_) => CitationType::Case,
            Self::Article(_) => CitationType::Article,
            Self::Statute(_) => CitationType::Statute,
            Self::Id(_) => CitationType::Id,
            Self::Supra(_) => CitationType::Supra,
            Self::Infra(_) => CitationType::Infra,
            Self::Unknown => CitationType::Unknown,
        }
    }
}

/// A single citation unit produced from a footnote.
///
/// Constructed once by the segmenter and never mutated afterwards; a
/// consumer that wants to correct a record builds its own [`CitationRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    footnote_num: usize,
    citation_num: usize,
    full_text: String,
    span: Span,
    details: CitationDetails,
    signal: Option<String>,
    quoted_text: Option<String>,
    parenthetical: Option<String>,
}

impl Citation {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        footnote_num: usize,
        citation_num: usize,
        full_text: String,
        span: Span,
        details: CitationDetails,
        signal: Option<String>,
        quoted_text: Option<String>,
        parenthetical: Option<String>,
    ) -> Self {
        Self {
            footnote_num,
            citation_num,
            full_text,
            span,
            details,
            signal,
            quoted_text,
            parenthetical,
        }
    }

    pub fn footnote_num(&self) -> usize {
        self.footnote_num
    }

    /// 1-based position within the footnote.
    pub fn citation_num(&self) -> usize {
        self.citation_num
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Byte range of `full_text` within the footnote it came from.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn citation_type(&self) -> CitationType {
        self.details.citation_type()
    }

    pub fn details(&self) -> &CitationDetails {
        &self.details
    }

    pub fn signal(&self) -> Option<&str> {
        self.signal.as_deref()
    }

    pub fn quoted_text(&self) -> Option<&str> {
        self.quoted_text.as_deref()
    }

    pub fn parenthetical(&self) -> Option<&str> {
        self.parenthetical.as_deref()
    }

    pub fn case_fields(&self) -> Option<&CaseFields> {
        match &self.details {
            CitationDetails::Case(f) => Some(f),
            _ => None,
        }
    }

    pub fn article_fields(&self) -> Option<&ArticleFields> {
        match &self.details {
            CitationDetails::Article(f) => Some(f),
            _ => None,
        }
    }

    pub fn statute_fields(&self) -> Option<&StatuteFields> {
        match &self.details {
            CitationDetails::Statute(f) => Some(f),
            _ => None,
        }
    }

    pub fn short_form_fields(&self) -> Option<&ShortFormFields> {
        match &self.details {
            CitationDetails::Id(f) | CitationDetails::Supra(f) | CitationDetails::Infra(f) => {
                Some(f)
            }
            _ => None,
        }
    }

    /// Flatten into a single map-like record for exporters.
    pub fn to_record(&self) -> CitationRecord {
        let mut record = CitationRecord {
            footnote_num: self.footnote_num,
            citation_num: self.citation_num,
            citation_type: self.citation_type(),
            full_text: self.full_text.clone(),
            signal: self.signal.clone(),
            quoted_text: self.quoted_text.clone(),
            parenthetical: self.parenthetical.clone(),
            ..Default::default()
        };

        match &self.details {
            CitationDetails::Case(f) => {
                record.case_name = f.case_name.clone();
                record.reporter = f.reporter.clone();
                record.pinpoint = f.pinpoint.clone();
                record.court = f.court.clone();
                record.year = f.year.clone();
            }
            CitationDetails::Article(f) => {
                record.author = f.author.clone();
                record.title = f.title.clone();
                record.journal = f.journal.clone();
                record.volume = f.volume.clone();
                record.start_page = f.start_page.clone();
                record.year = f.year.clone();
            }
            CitationDetails::Statute(f) => {
                record.statute_code = f.statute_code.clone();
                record.section = f.section.clone();
                record.year = f.year.clone();
            }
            CitationDetails::Id(f) | CitationDetails::Supra(f) | CitationDetails::Infra(f) => {
                record.note = f.note.clone();
                record.pinpoint = f.pinpoint.clone();
            }
            CitationDetails::Unknown => {}
        }

        record
    }
}

/// Flat, serializable view of a [`Citation`].
///
/// Every type-specific field is present; fields that do not apply to the
/// citation's type are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationRecord {
    pub footnote_num: usize,
    pub citation_num: usize,
    #[serde(rename = "type")]
    pub citation_type: CitationType,
    pub full_text: String,
    pub signal: Option<String>,
    pub quoted_text: Option<String>,
    pub parenthetical: Option<String>,
    pub case_name: Option<String>,
    pub reporter: Option<String>,
    pub pinpoint: Option<String>,
    pub court: Option<String>,
    pub year: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub start_page: Option<String>,
    pub statute_code: Option<String>,
    pub section: Option<String>,
    pub note: Option<String>,
}

impl Default for CitationRecord {
    fn default() -> Self {
        Self {
            footnote_num: 0,
            citation_num: 0,
            citation_type: CitationType::Unknown,
            full_text: String::new(),
            signal: None,
            quoted_text: None,
            parenthetical: None,
            case_name: None,
            reporter: None,
            pinpoint: None,
            court: None,
            year: None,
            author: None,
            title: None,
            journal: None,
            volume: None,
            start_page: None,
            statute_code: None,
            section: None,
            note: None,
        }
    }
}

impl CitationRecord {
    /// Column names in export order, matching [`CitationRecord::values`].
    pub const COLUMNS: [&'static str; 20] = [
        "footnote_num",
        "citation_num",
        "type",
        "full_text",
        "signal",
        "quoted_text",
        "parenthetical",
        "case_name",
        "reporter",
        "pinpoint",
        "court",
        "year",
        "author",
        "title",
        "journal",
        "volume",
        "start_page",
        "statute_code",
        "section",
        "note",
    ];

    /// Field values as strings in [`CitationRecord::COLUMNS`] order; unset fields are empty.
    pub fn values(&self) -> Vec<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            self.footnote_num.to_string(),
            self.citation_num.to_string(),
            self.citation_type.as_str().to_string(),
            self.full_text.clone(),
            opt(&self.signal),
            opt(&self.quoted_text),
            opt(&self.parenthetical),
            opt(&self.case_name),
            opt(&self.reporter),
            opt(&self.pinpoint),
            opt(&self.court),
            opt(&self.year),
            opt(&self.author),
            opt(&self.title),
            opt(&self.journal),
            opt(&self.volume),
            opt(&self.start_page),
            opt(&self.statute_code),
            opt(&self.section),
            opt(&self.note),
        ]
    }
}

/// Result of segmenting one footnote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedFootnote {
    pub footnote_num: usize,
    pub mode: FootnoteMode,
    pub citations: Vec<Citation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_citation() -> Citation {
        Citation::new(
            3,
            1,
            "See Smith v. Jones, 100 U.S. 1, 5 (2000)".to_string(),
            Span::new(0, 40),
            CitationDetails::Case(CaseFields {
                case_name: Some("Smith v. Jones".to_string()),
                reporter: Some("100 U.S. 1".to_string()),
                pinpoint: Some("5".to_string()),
                court: None,
                year: Some("2000".to_string()),
            }),
            Some("See".to_string()),
            None,
            Some("2000".to_string()),
        )
    }

    #[test]
    fn test_span_slice_out_of_range_is_empty() {
        let text = "abc";
        assert_eq!(Span::new(1, 3).slice(text), "bc");
        assert_eq!(Span::new(2, 10).slice(text), "");
    }

    #[test]
    fn test_span_contains_is_half_open() {
        let span = Span::new(2, 5);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(4));
        assert!(!span.contains(5));
        assert!(span.encloses(Span::new(2, 5)));
        assert!(!span.encloses(Span::new(1, 3)));
    }

    #[test]
    fn test_citation_type_names() {
        let names: Vec<_> = CitationType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(
            names,
            vec!["case", "article", "statute", "id", "supra", "infra", "unknown"]
        );
        assert!(CitationType::Supra.is_short_form());
        assert!(!CitationType::Case.is_short_form());
    }

    #[test]
    fn test_to_record_flattens_case_fields() {
        let record = case_citation().to_record();
        assert_eq!(record.citation_type, CitationType::Case);
        assert_eq!(record.case_name.as_deref(), Some("Smith v. Jones"));
        assert_eq!(record.pinpoint.as_deref(), Some("5"));
        assert!(record.journal.is_none());
        assert!(record.note.is_none());
    }

    #[test]
    fn test_record_values_align_with_columns() {
        let record = case_citation().to_record();
        let values = record.values();
        assert_eq!(values.len(), CitationRecord::COLUMNS.len());
        assert_eq!(values[2], "case");
        assert_eq!(values[8], "100 U.S. 1");
    }

    #[test]
    fn test_record_serializes_type_in_lowercase() {
        let json = serde_json::to_value(case_citation().to_record()).unwrap();
        assert_eq!(json["type"], "case");
        assert_eq!(json["signal"], "See");
        assert!(json["author"].is_null());
    }
}
