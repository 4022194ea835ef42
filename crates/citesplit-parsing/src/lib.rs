use once_cell::sync::Lazy;
use thiserror::Error;

mod chunk;
mod classify;
pub mod config;
mod mode;
mod patterns;
pub mod protected;
pub mod segmenter;
pub mod sentence;
pub mod signal;
mod supplemental;
pub mod text_processing;
pub mod types;

pub use config::{ListOverride, SegmenterConfig, SegmenterConfigBuilder};
pub use protected::{ProtectedRegion, ProtectedRegions, RegionKind};
pub use segmenter::FootnoteSegmenter;
pub use sentence::Abbreviations;
pub use signal::{LeadingSignal, SignalCandidate, SignalTable};
pub use types::{
    ArticleFields, CaseFields, Citation, CitationDetails, CitationRecord, CitationType,
    FootnoteMode, SegmentedFootnote, ShortFormFields, Span, StatuteFields,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),
    #[error("empty {0} keyword")]
    EmptyKeyword(&'static str),
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}

static DEFAULT_SEGMENTER: Lazy<FootnoteSegmenter> = Lazy::new(FootnoteSegmenter::new);

/// Segment one footnote with the default configuration.
///
/// Pipeline:
/// 1. Scan quotations and parentheticals that must never be split
/// 2. Decide whether the footnote is a citation string or narrative prose
/// 3. Split into chunks (semicolons, or citation-bearing sentence runs)
/// 4. Fold bare `supra note` pointers into the preceding chunk
/// 5. Split each chunk at signal keywords
/// 6. Classify each unit and extract its fields
pub fn segment_footnote(footnote_num: usize, text: &str) -> Vec<Citation> {
    DEFAULT_SEGMENTER.segment_citations(footnote_num, text)
}
