use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Span;

/// Strip inline markup that footnote text commonly carries: HTML-style tags
/// (`<i>`, `</em>`) and Markdown emphasis markers (`*`, `_`).
pub fn strip_markup(text: &str) -> String {
    static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").unwrap());
    TAG_RE
        .replace_all(text, "")
        .chars()
        .filter(|c| !matches!(c, '*' | '_'))
        .collect()
}

/// Collapse runs of whitespace (including newlines) into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Markup-strip, normalize and trim a raw field value.
///
/// Surrounding separators and quotation marks are removed; an empty result
/// becomes `None`.
pub fn clean_field(raw: &str) -> Option<String> {
    let cleaned = normalize_whitespace(&strip_markup(raw));
    let cleaned = cleaned
        .trim_matches(|c: char| {
            c.is_whitespace()
                || matches!(c, ',' | ';' | ':' | '"' | '\u{201C}' | '\u{201D}')
        })
        .to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn has_alphanumeric(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

/// Shrink `span` so it excludes leading and trailing whitespace.
pub fn trim_span(text: &str, span: Span) -> Span {
    trim_span_matches(text, span, char::is_whitespace)
}

/// Shrink `span` from both ends while `pred` holds.
pub fn trim_span_matches(text: &str, span: Span, pred: impl Fn(char) -> bool) -> Span {
    let slice = span.slice(text);
    let start_trimmed = slice.trim_start_matches(&pred);
    let start = span.start + (slice.len() - start_trimmed.len());
    let fully_trimmed = start_trimmed.trim_end_matches(&pred);
    Span::new(start, start + fully_trimmed.len())
}

/// Number of characters (not bytes) preceding byte offset `byte`.
pub fn char_position(text: &str, byte: usize) -> usize {
    text.get(..byte).map_or(0, |prefix| prefix.chars().count())
}

/// Byte offset just past the first `chars` characters of `text`.
pub fn byte_offset_for_chars(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Length in bytes of the leading whitespace and markup (`*`, `_`, tags) of `text`.
pub fn markup_prefix_len(text: &str) -> usize {
    let mut rest = text;
    loop {
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '*' || c == '_');
        if trimmed.starts_with('<') {
            if let Some(close) = trimmed.find('>') {
                rest = &trimmed[close + 1..];
                continue;
            }
        }
        rest = trimmed;
        break;
    }
    text.len() - rest.len()
}

/// `text` with trailing whitespace and markup removed.
pub fn trim_markup_end(text: &str) -> &str {
    let mut rest = text;
    loop {
        let trimmed = rest.trim_end_matches(|c: char| c.is_whitespace() || c == '*' || c == '_');
        if trimmed.ends_with('>') {
            if let Some(open) = trimmed.rfind('<') {
                rest = &trimmed[..open];
                continue;
            }
        }
        return trimmed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<i>Smith v. Jones</i>"), "Smith v. Jones");
        assert_eq!(strip_markup("*See* _id._"), "See id.");
        assert_eq!(strip_markup("5 < 6 and 7 > 2"), "5 < 6 and 7 > 2");
    }

    #[test]
    fn test_clean_field() {
        assert_eq!(
            clean_field("  <em>The  Law\nof Things</em>, ").as_deref(),
            Some("The Law of Things")
        );
        assert_eq!(clean_field(" , ").as_deref(), None);
        assert_eq!(clean_field("\u{201C}Quoted Title\u{201D}").as_deref(), Some("Quoted Title"));
    }

    #[test]
    fn test_trim_span() {
        let text = "  hello world \n";
        let span = trim_span(text, Span::new(0, text.len()));
        assert_eq!(span.slice(text), "hello world");
        let empty = trim_span(text, Span::new(0, 2));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_char_offsets_respect_multibyte() {
        let text = "\u{201C}ab\u{201D} c";
        assert_eq!(char_position(text, 3), 1);
        assert_eq!(byte_offset_for_chars(text, 3), 5);
        assert_eq!(byte_offset_for_chars(text, 100), text.len());
    }

    #[test]
    fn test_markup_prefix_and_suffix() {
        assert_eq!(markup_prefix_len("  *<i>See</i>"), 6);
        assert_eq!(markup_prefix_len("See"), 0);
        assert_eq!(trim_markup_end("Smith, </i>* "), "Smith,");
        assert_eq!(trim_markup_end("a < b"), "a < b");
    }
}
