use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunk::Chunk;
use crate::patterns::has_reporter_token;
use crate::text_processing::{normalize_whitespace, strip_markup};

/// Bare note pointer such as `supra notes 5-8 and accompanying text` or
/// `see infra note 12`.
pub(crate) static DEFAULT_SUPPLEMENTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:see|see also|cf\.|accord|compare)\s+)?(?:supra|infra)\s+(?:notes?|nn?\.)\s+\d+(?:\s*(?:-|–|—|,|&|and|to|through)\s*\d+)*(?:,?\s+(?:and\s+)?(?:the\s+)?(?:accompanying\s+text|text\s+accompanying(?:\s+notes?\s+\d+(?:\s*[-–—]\s*\d+)?)?))?\s*[.;,]?$",
    )
    .unwrap()
});

/// Whether `text` is nothing but a pointer to other notes.
pub(crate) fn is_supplemental_ref(text: &str, pattern: &Regex) -> bool {
    let cleaned = normalize_whitespace(&strip_markup(text));
    pattern.is_match(&cleaned) && !has_reporter_token(&cleaned)
}

/// Fold every supplemental chunk into the chunk before it.
///
/// The merged span runs from the preceding chunk's start to the pointer's
/// end, separator included. A pointer with no predecessor is left alone.
pub(crate) fn merge_supplemental(text: &str, chunks: Vec<Chunk>, pattern: &Regex) -> Vec<Chunk> {
    let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        let is_pointer = is_supplemental_ref(chunk.span.slice(text), pattern);
        match merged.last_mut() {
            Some(prev) if is_pointer => {
                prev.supplemental_start.get_or_insert(chunk.span.start);
                prev.span.end = chunk.span.end;
            }
            _ => merged.push(chunk),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Span;

    fn pointer(text: &str) -> bool {
        is_supplemental_ref(text, &DEFAULT_SUPPLEMENTAL_RE)
    }

    #[test]
    fn test_pointer_shapes() {
        assert!(pointer("supra notes 5-8 and accompanying text"));
        assert!(pointer("See supra note 12."));
        assert!(pointer("*infra* nn. 3, 4"));
        assert!(pointer("supra note 7 and text accompanying note 9"));
        assert!(!pointer("Smith, supra note 5, at 10"));
        assert!(!pointer("supra note 5; Smith, 100 U.S. 1"));
    }

    #[test]
    fn test_merge_into_previous_chunk() {
        let text = "Smith, 100 U.S. 1 (2000); supra notes 5-8 and accompanying text";
        let split = text.find(';').unwrap();
        let pointer_start = text.find("supra").unwrap();
        let chunks = vec![
            Chunk::new(Span::new(0, split)),
            Chunk::new(Span::new(pointer_start, text.len())),
        ];
        let merged = merge_supplemental(text, chunks, &DEFAULT_SUPPLEMENTAL_RE);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].span.slice(text), text);
        assert_eq!(merged[0].supplemental_start, Some(pointer_start));
    }

    #[test]
    fn test_leading_pointer_stays() {
        let text = "supra note 3; Doe, 2 U.S. 2";
        let split = text.find(';').unwrap();
        let chunks = vec![
            Chunk::new(Span::new(0, split)),
            Chunk::new(Span::new(split + 2, text.len())),
        ];
        let merged = merge_supplemental(text, chunks, &DEFAULT_SUPPLEMENTAL_RE);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].supplemental_start, None);
    }

    #[test]
    fn test_chained_pointers_keep_first_tail() {
        let text = "Smith, 1 U.S. 1; supra note 2; infra note 9";
        let a = text.find("supra").unwrap();
        let b = text.find("infra").unwrap();
        let chunks = vec![
            Chunk::new(Span::new(0, a - 2)),
            Chunk::new(Span::new(a, b - 2)),
            Chunk::new(Span::new(b, text.len())),
        ];
        let merged = merge_supplemental(text, chunks, &DEFAULT_SUPPLEMENTAL_RE);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].supplemental_start, Some(a));
        assert_eq!(merged[0].span.end, text.len());
    }
}
