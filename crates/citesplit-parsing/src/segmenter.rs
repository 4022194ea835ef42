use crate::chunk::{Chunk, split_narrative, split_traditional};
use crate::classify::{UnitContext, build_citation};
use crate::config::SegmenterConfig;
use crate::mode::{ModeInputs, classify_mode};
use crate::protected::ProtectedRegions;
use crate::sentence::Abbreviations;
use crate::signal::{SignalTable, resolve_candidates, split_at_signals};
use crate::supplemental::{DEFAULT_SUPPLEMENTAL_RE, merge_supplemental};
use crate::text_processing::trim_span;
use crate::types::{Citation, FootnoteMode, SegmentedFootnote, Span};

/// A configurable footnote segmentation pipeline.
///
/// Holds a [`SegmenterConfig`] plus the signal and abbreviation tables built
/// from it, and exposes each pipeline step as a method. The default
/// constructor uses built-in defaults; use [`FootnoteSegmenter::with_config`]
/// to supply custom signals, abbreviations and thresholds.
///
/// A segmenter is read-only after construction and can be shared across threads.
#[derive(Debug, Clone)]
pub struct FootnoteSegmenter {
    config: SegmenterConfig,
    signals: SignalTable,
    abbreviations: Abbreviations,
}

impl Default for FootnoteSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl FootnoteSegmenter {
    /// Create a segmenter with default configuration.
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    /// Create a segmenter with a custom configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        let signals = SignalTable::new(config.signals());
        let abbreviations = Abbreviations::new(config.abbreviations());
        Self {
            config,
            signals,
            abbreviations,
        }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn signals(&self) -> &SignalTable {
        &self.signals
    }

    pub fn abbreviations(&self) -> &Abbreviations {
        &self.abbreviations
    }

    /// Scan quotations and parentheticals (step 1).
    pub fn protected_regions(&self, text: &str) -> ProtectedRegions {
        ProtectedRegions::scan(text)
    }

    /// Decide between traditional and narrative layout (step 2).
    pub fn classify_mode(&self, text: &str) -> FootnoteMode {
        self.mode_for(text, &ProtectedRegions::scan(text))
    }

    /// Split into chunks and merge supplemental pointers (steps 3 and 4).
    pub fn split_chunks(&self, text: &str) -> Vec<Span> {
        let regions = ProtectedRegions::scan(text);
        let mode = self.mode_for(text, &regions);
        self.chunks_for(text, &regions, mode)
            .into_iter()
            .map(|c| c.span)
            .collect()
    }

    /// Run the full pipeline on one footnote.
    ///
    /// Absent or blank text yields no citations. Never panics.
    pub fn segment(&self, footnote_num: usize, text: Option<&str>) -> SegmentedFootnote {
        let text = text.unwrap_or("");
        if text.trim().is_empty() {
            return SegmentedFootnote {
                footnote_num,
                mode: FootnoteMode::Traditional,
                citations: Vec::new(),
            };
        }

        let regions = ProtectedRegions::scan(text);
        let mode = self.mode_for(text, &regions);
        let chunks = self.chunks_for(text, &regions, mode);

        let units: Vec<Chunk> = chunks
            .iter()
            .flat_map(|chunk| {
                let candidates = self.signals.find_candidates(text, chunk, &regions);
                let accepted = resolve_candidates(text, candidates);
                split_at_signals(text, chunk, &accepted)
            })
            .collect();

        let ctx = UnitContext {
            text,
            regions: &regions,
            signals: &self.signals,
            abbreviations: &self.abbreviations,
        };
        let citations: Vec<Citation> = units
            .iter()
            .enumerate()
            .map(|(i, unit)| build_citation(&ctx, unit, footnote_num, i + 1))
            .collect();

        tracing::debug!(
            footnote_num,
            mode = %mode,
            regions = regions.len(),
            chunks = chunks.len(),
            citations = citations.len(),
            "segmented footnote"
        );

        SegmentedFootnote {
            footnote_num,
            mode,
            citations,
        }
    }

    /// Run the full pipeline and return only the citations.
    pub fn segment_citations(&self, footnote_num: usize, text: &str) -> Vec<Citation> {
        self.segment(footnote_num, Some(text)).citations
    }

    fn mode_for(&self, text: &str, regions: &ProtectedRegions) -> FootnoteMode {
        classify_mode(&ModeInputs {
            text,
            regions,
            signals: &self.signals,
            abbreviations: &self.abbreviations,
            config: &self.config,
        })
    }

    fn chunks_for(&self, text: &str, regions: &ProtectedRegions, mode: FootnoteMode) -> Vec<Chunk> {
        let whole = trim_span(text, Span::new(0, text.len()));
        let chunks = match mode {
            FootnoteMode::Traditional => split_traditional(text, whole, regions),
            FootnoteMode::Narrative => {
                split_narrative(text, whole, regions, &self.abbreviations, &self.signals)
            }
        };
        let pattern = self
            .config
            .supplemental_ref_re
            .as_ref()
            .unwrap_or(&*DEFAULT_SUPPLEMENTAL_RE);
        merge_supplemental(text, chunks, pattern)
    }
}
