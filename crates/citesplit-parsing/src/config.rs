use regex::Regex;

use crate::ConfigError;

/// Sentence boundaries a footnote needs before it can be considered narrative.
pub const DEFAULT_MIN_SENTENCE_BOUNDARIES: usize = 3;

/// Unprotected semicolons above which a footnote is always traditional.
pub const DEFAULT_MAX_SEMICOLONS: usize = 1;

/// Characters inspected when looking at how a footnote opens.
pub const DEFAULT_LEAD_WINDOW_CHARS: usize = 150;

/// A citation token starting after this many characters marks a narrative footnote.
pub const DEFAULT_CASE_NAME_WINDOW_CHARS: usize = 50;

/// Citation signals, grouped supportive, comparative, contradictory.
///
/// Order matters only as a final tie-breaker between equally long matches at
/// the same position.
pub const DEFAULT_SIGNALS: &[&str] = &[
    // supportive
    "e.g.,",
    "accord",
    "see, e.g.,",
    "see",
    "see also",
    "see also, e.g.,",
    "cf.",
    "cf., e.g.,",
    "see generally",
    // comparative
    "compare",
    "with",
    // contradictory
    "contra",
    "but see",
    "but see, e.g.,",
    "but cf.",
];

/// Words whose trailing period does not end a sentence, lowercase and
/// without the final period.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    // citation vocabulary
    "v", "vs", "id", "e.g", "i.e", "cf", "etc", "al", "no", "nos", "n", "nn", "supp", "ct",
    "app", "cir", "dist", "rev", "stat", "ann", "ed", "eds", "ch", "cl", "art", "sec", "para",
    "pt", "pp", "p", "amend", "const", "cong", "reg", "rptr", "fed", "u.s", "u.s.c", "c.f.r",
    "l.j", "l.q", "civ", "crim", "proc", "evid", "admin", "rem", "prac", "super", "sup", "jud",
    "legis", "comm", "comm'n", "ass'n", "dep't", "gov't", "int'l", "nat'l", "envtl", "univ",
    "inc", "co", "corp", "ltd", "bros", "mfg", "ins", "sav", "transp", "hosp", "mun", "pub",
    "prop", "res", "sch", "soc", "harv", "yale", "stan", "colum", "mich", "chi", "geo", "nw",
    // honorifics
    "mr", "mrs", "ms", "dr", "jr", "sr", "st", "hon", "prof",
    // months
    "jan", "feb", "mar", "apr", "aug", "sept", "sep", "oct", "nov", "dec",
    // jurisdictions
    "ala", "ariz", "ark", "cal", "colo", "conn", "del", "fla", "ga", "ill", "ind", "kan", "ky",
    "la", "mass", "md", "minn", "miss", "mo", "mont", "neb", "nev", "okla", "or", "pa", "tenn",
    "tex", "va", "vt", "wash", "wis", "wyo", "n.y", "n.j", "d.c",
];

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for the footnote segmentation pipeline.
///
/// Immutable once built and owned by the [`FootnoteSegmenter`](crate::FootnoteSegmenter)
/// it is handed to. Use [`SegmenterConfigBuilder`] to customise it.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    // ── signal.rs ──
    /// Signal keywords that begin a new citation.
    pub(crate) signals: ListOverride<String>,

    // ── sentence.rs ──
    /// Abbreviations whose period does not end a sentence.
    pub(crate) abbreviations: ListOverride<String>,

    // ── supplemental.rs ──
    /// Pattern for bare note pointers merged into the preceding chunk.
    pub(crate) supplemental_ref_re: Option<Regex>,

    // ── mode.rs ──
    pub(crate) min_sentence_boundaries: usize,
    pub(crate) max_semicolons: usize,
    pub(crate) lead_window_chars: usize,
    pub(crate) case_name_window_chars: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            signals: ListOverride::Default,
            abbreviations: ListOverride::Default,
            supplemental_ref_re: None,
            min_sentence_boundaries: DEFAULT_MIN_SENTENCE_BOUNDARIES,
            max_semicolons: DEFAULT_MAX_SEMICOLONS,
            lead_window_chars: DEFAULT_LEAD_WINDOW_CHARS,
            case_name_window_chars: DEFAULT_CASE_NAME_WINDOW_CHARS,
        }
    }
}

fn owned(defaults: &[&str]) -> Vec<String> {
    defaults.iter().map(|s| s.to_string()).collect()
}

impl SegmenterConfig {
    /// The effective signal list, defaults resolved.
    pub fn signals(&self) -> Vec<String> {
        self.signals.resolve(&owned(DEFAULT_SIGNALS))
    }

    /// The effective abbreviation list, defaults resolved.
    pub fn abbreviations(&self) -> Vec<String> {
        self.abbreviations.resolve(&owned(DEFAULT_ABBREVIATIONS))
    }

    pub fn min_sentence_boundaries(&self) -> usize {
        self.min_sentence_boundaries
    }

    pub fn max_semicolons(&self) -> usize {
        self.max_semicolons
    }

    pub fn lead_window_chars(&self) -> usize {
        self.lead_window_chars
    }

    pub fn case_name_window_chars(&self) -> usize {
        self.case_name_window_chars
    }
}

/// Builder for [`SegmenterConfig`].
///
/// The supplemental-reference pattern is compiled in [`build()`](Self::build);
/// list entries and thresholds are validated there too.
#[derive(Debug, Clone, Default)]
pub struct SegmenterConfigBuilder {
    signals: ListOverride<String>,
    abbreviations: ListOverride<String>,
    supplemental_ref_re: Option<String>,
    min_sentence_boundaries: Option<usize>,
    max_semicolons: Option<usize>,
    lead_window_chars: Option<usize>,
    case_name_window_chars: Option<usize>,
}

impl SegmenterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Signals ──

    pub fn set_signals(mut self, signals: Vec<String>) -> Self {
        self.signals = ListOverride::Replace(signals);
        self
    }

    pub fn add_signal(mut self, signal: String) -> Self {
        match &mut self.signals {
            ListOverride::Extend(v) => v.push(signal),
            _ => self.signals = ListOverride::Extend(vec![signal]),
        }
        self
    }

    // ── Abbreviations ──

    pub fn set_abbreviations(mut self, abbreviations: Vec<String>) -> Self {
        self.abbreviations = ListOverride::Replace(abbreviations);
        self
    }

    pub fn add_abbreviation(mut self, abbreviation: String) -> Self {
        match &mut self.abbreviations {
            ListOverride::Extend(v) => v.push(abbreviation),
            _ => self.abbreviations = ListOverride::Extend(vec![abbreviation]),
        }
        self
    }

    // ── Supplemental references ──

    pub fn supplemental_ref_regex(mut self, pattern: &str) -> Self {
        self.supplemental_ref_re = Some(pattern.to_string());
        self
    }

    // ── Mode thresholds ──

    pub fn min_sentence_boundaries(mut self, n: usize) -> Self {
        self.min_sentence_boundaries = Some(n);
        self
    }

    pub fn max_semicolons(mut self, n: usize) -> Self {
        self.max_semicolons = Some(n);
        self
    }

    pub fn lead_window_chars(mut self, n: usize) -> Self {
        self.lead_window_chars = Some(n);
        self
    }

    pub fn case_name_window_chars(mut self, n: usize) -> Self {
        self.case_name_window_chars = Some(n);
        self
    }

    /// Validate and produce a [`SegmenterConfig`].
    pub fn build(self) -> Result<SegmenterConfig, ConfigError> {
        let check_list = |list: &ListOverride<String>, name: &'static str| match list {
            ListOverride::Default => Ok(()),
            ListOverride::Replace(v) | ListOverride::Extend(v) => {
                if v.iter().any(|s| s.trim().is_empty()) {
                    Err(ConfigError::EmptyKeyword(name))
                } else {
                    Ok(())
                }
            }
        };
        check_list(&self.signals, "signal")?;
        check_list(&self.abbreviations, "abbreviation")?;

        let lead_window_chars = self.lead_window_chars.unwrap_or(DEFAULT_LEAD_WINDOW_CHARS);
        let case_name_window_chars = self
            .case_name_window_chars
            .unwrap_or(DEFAULT_CASE_NAME_WINDOW_CHARS);
        if lead_window_chars == 0 {
            return Err(ConfigError::InvalidThreshold(
                "lead_window_chars must be greater than zero".to_string(),
            ));
        }
        if case_name_window_chars > lead_window_chars {
            return Err(ConfigError::InvalidThreshold(format!(
                "case_name_window_chars ({}) exceeds lead_window_chars ({})",
                case_name_window_chars, lead_window_chars
            )));
        }

        Ok(SegmenterConfig {
            signals: self.signals,
            abbreviations: self.abbreviations,
            supplemental_ref_re: self
                .supplemental_ref_re
                .map(|p| Regex::new(&p))
                .transpose()?,
            min_sentence_boundaries: self
                .min_sentence_boundaries
                .unwrap_or(DEFAULT_MIN_SENTENCE_BOUNDARIES),
            max_semicolons: self.max_semicolons.unwrap_or(DEFAULT_MAX_SEMICOLONS),
            lead_window_chars,
            case_name_window_chars,
        })
    }
}
