use std::fmt;
use std::str::FromStr;

use citesplit_parsing::{CitationType, SegmentedFootnote};

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Json,
            ExportFormat::Csv,
            ExportFormat::Markdown,
            ExportFormat::Text,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Markdown => "Markdown",
            Self::Text => "Plain Text",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "md",
            Self::Text => "txt",
        }
    }

    /// The format whose file extension `ext` is, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// Per-type citation counts for one or more footnotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CitationStats {
    pub total: usize,
    pub case: usize,
    pub article: usize,
    pub statute: usize,
    pub short_form: usize,
    pub unknown: usize,
}

impl CitationStats {
    pub fn from_footnotes(footnotes: &[SegmentedFootnote]) -> Self {
        let mut stats = Self::default();
        for footnote in footnotes {
            stats.add(footnote);
        }
        stats
    }

    pub fn add(&mut self, footnote: &SegmentedFootnote) {
        for citation in &footnote.citations {
            self.total += 1;
            let citation_type = citation.citation_type();
            if citation_type.is_short_form() {
                self.short_form += 1;
                continue;
            }
            match citation_type {
                CitationType::Case => self.case += 1,
                CitationType::Article => self.article += 1,
                CitationType::Statute => self.statute += 1,
                CitationType::Unknown => self.unknown += 1,
                CitationType::Id | CitationType::Supra | CitationType::Infra => {}
            }
        }
    }

    /// Share of citations that could not be typed, as a percentage.
    pub fn unknown_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.unknown as f64 / self.total as f64) * 100.0
        }
    }
}
