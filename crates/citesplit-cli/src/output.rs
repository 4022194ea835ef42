use std::io::Write;

use citesplit_parsing::{CitationType, FootnoteSegmenter, SegmentedFootnote};
use citesplit_reporting::{CitationStats, detail_pairs};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn paint_type(citation_type: CitationType) -> String {
    let label = citation_type.as_str();
    match citation_type {
        CitationType::Case => label.green().to_string(),
        CitationType::Article => label.cyan().to_string(),
        CitationType::Statute => label.blue().to_string(),
        CitationType::Id | CitationType::Supra | CitationType::Infra => {
            label.yellow().to_string()
        }
        CitationType::Unknown => label.red().to_string(),
    }
}

/// Print one segmented footnote and its citations.
pub fn print_footnote(
    w: &mut dyn Write,
    footnote: &SegmentedFootnote,
    show_mode: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    let title = if show_mode {
        format!("Footnote {} [{}]", footnote.footnote_num, footnote.mode)
    } else {
        format!("Footnote {}", footnote.footnote_num)
    };
    if color.enabled() {
        writeln!(w, "{}", title.bold())?;
    } else {
        writeln!(w, "{}", title)?;
    }

    if footnote.citations.is_empty() {
        if color.enabled() {
            writeln!(w, "  {}", "(no citations)".dimmed())?;
        } else {
            writeln!(w, "  (no citations)")?;
        }
    }

    for citation in &footnote.citations {
        let record = citation.to_record();
        if color.enabled() {
            writeln!(
                w,
                "  [{}] {} {}",
                record.citation_num,
                paint_type(citation.citation_type()),
                record.full_text
            )?;
        } else {
            writeln!(
                w,
                "  [{}] {} {}",
                record.citation_num, record.citation_type, record.full_text
            )?;
        }

        let mut details: Vec<(&str, &str)> = Vec::new();
        if let Some(signal) = record.signal.as_deref() {
            details.push(("Signal", signal));
        }
        details.extend(detail_pairs(&record));
        if let Some(quote) = record.quoted_text.as_deref() {
            details.push(("Quote", quote));
        }
        if let Some(paren) = record.parenthetical.as_deref() {
            details.push(("Parenthetical", paren));
        }
        for (label, value) in details {
            if color.enabled() {
                writeln!(w, "      {} {}", format!("{}:", label).dimmed(), value)?;
            } else {
                writeln!(w, "      {}: {}", label, value)?;
            }
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print the per-type totals after all footnotes.
pub fn print_summary(
    w: &mut dyn Write,
    footnote_count: usize,
    stats: &CitationStats,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = format!(
        "{} footnotes, {} citations: {} case, {} article, {} statute, {} short form, {} unknown",
        footnote_count,
        stats.total,
        stats.case,
        stats.article,
        stats.statute,
        stats.short_form,
        stats.unknown
    );
    if color.enabled() {
        writeln!(w, "{}", line.bold())?;
        if stats.unknown > 0 {
            writeln!(
                w,
                "{}",
                format!("{:.1}% unclassified", stats.unknown_pct()).yellow()
            )?;
        }
    } else {
        writeln!(w, "{}", line)?;
        if stats.unknown > 0 {
            writeln!(w, "{:.1}% unclassified", stats.unknown_pct())?;
        }
    }
    Ok(())
}

/// Print the effective signal and abbreviation tables of a segmenter.
pub fn print_tables(
    w: &mut dyn Write,
    segmenter: &FootnoteSegmenter,
    color: ColorMode,
) -> std::io::Result<()> {
    let signals = segmenter.signals();
    let header = format!("Signals ({})", signals.len());
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    for keyword in signals.keywords() {
        if citesplit_parsing::signal::is_gated(keyword) && color.enabled() {
            writeln!(w, "  {} {}", keyword, "(after compare)".dimmed())?;
        } else if citesplit_parsing::signal::is_gated(keyword) {
            writeln!(w, "  {} (after compare)", keyword)?;
        } else {
            writeln!(w, "  {}", keyword)?;
        }
    }

    let abbreviations = segmenter.abbreviations();
    let header = format!("Abbreviations ({})", abbreviations.len());
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    for line in abbreviations.sorted().chunks(10) {
        writeln!(w, "  {}", line.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(footnote: &SegmentedFootnote, show_mode: bool) -> String {
        let mut buf = Vec::new();
        print_footnote(&mut buf, footnote, show_mode, ColorMode(false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_print_footnote_plain() {
        let segmenter = FootnoteSegmenter::new();
        let footnote = segmenter.segment(4, Some("See Smith v. Jones, 100 U.S. 1, 5 (2000)."));
        let out = render(&footnote, false);
        assert!(out.starts_with("Footnote 4\n"));
        assert!(out.contains("  [1] case See Smith v. Jones"));
        assert!(out.contains("      Signal: See\n"));
        assert!(out.contains("      Case name: Smith v. Jones\n"));
    }

    #[test]
    fn test_print_footnote_show_mode() {
        let segmenter = FootnoteSegmenter::new();
        let footnote = segmenter.segment(2, Some("Id."));
        assert!(render(&footnote, true).starts_with("Footnote 2 [traditional]\n"));
    }

    #[test]
    fn test_print_footnote_empty() {
        let segmenter = FootnoteSegmenter::new();
        let footnote = segmenter.segment(1, None);
        assert!(render(&footnote, false).contains("(no citations)"));
    }

    #[test]
    fn test_print_summary_plain() {
        let stats = CitationStats {
            total: 4,
            case: 2,
            unknown: 1,
            short_form: 1,
            ..Default::default()
        };
        let mut buf = Vec::new();
        print_summary(&mut buf, 3, &stats, ColorMode(false)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("3 footnotes, 4 citations: 2 case"));
        assert!(out.contains("25.0% unclassified"));
    }

    #[test]
    fn test_print_tables_marks_gated_signal() {
        let mut buf = Vec::new();
        print_tables(&mut buf, &FootnoteSegmenter::new(), ColorMode(false)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("Signals ("));
        assert!(out.contains("  with (after compare)\n"));
        assert!(out.contains("  see also\n"));
        assert!(out.contains("Abbreviations ("));
    }
}
