use std::io::Write;
use std::path::Path;

use citesplit_parsing::{Citation, CitationRecord, FootnoteMode, SegmentedFootnote};
use serde::Serialize;

use crate::types::{CitationStats, ExportFormat};

/// Export segmented footnotes to the given path.
pub fn export_results(
    footnotes: &[SegmentedFootnote],
    format: ExportFormat,
    path: &Path,
) -> Result<(), String> {
    let content = render(footnotes, format)?;

    let mut file =
        std::fs::File::create(path).map_err(|e| format!("Failed to create file: {}", e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| format!("Failed to write: {}", e))?;
    Ok(())
}

/// Render segmented footnotes in the given format.
pub fn render(footnotes: &[SegmentedFootnote], format: ExportFormat) -> Result<String, String> {
    match format {
        ExportFormat::Json => export_json(footnotes),
        ExportFormat::Csv => Ok(export_csv(footnotes)),
        ExportFormat::Markdown => Ok(export_markdown(footnotes)),
        ExportFormat::Text => Ok(export_text(footnotes)),
    }
}

#[derive(Serialize)]
struct FootnoteJson {
    footnote_num: usize,
    mode: FootnoteMode,
    citations: Vec<CitationRecord>,
}

pub fn export_json(footnotes: &[SegmentedFootnote]) -> Result<String, String> {
    let items: Vec<FootnoteJson> = footnotes
        .iter()
        .map(|f| FootnoteJson {
            footnote_num: f.footnote_num,
            mode: f.mode,
            citations: f.citations.iter().map(Citation::to_record).collect(),
        })
        .collect();
    let mut out = serde_json::to_string_pretty(&items)
        .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
    out.push('\n');
    Ok(out)
}

fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One row per citation, columns in [`CitationRecord::COLUMNS`] order plus the
/// footnote's mode.
fn export_csv(footnotes: &[SegmentedFootnote]) -> String {
    let mut out = CitationRecord::COLUMNS.join(",");
    out.push_str(",mode\n");
    for footnote in footnotes {
        for citation in &footnote.citations {
            let row: Vec<String> = citation
                .to_record()
                .values()
                .iter()
                .map(|v| csv_escape(v))
                .collect();
            out.push_str(&row.join(","));
            out.push(',');
            out.push_str(footnote.mode.as_str());
            out.push('\n');
        }
    }
    out
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// The populated type-specific fields of a record, as `label: value` pairs.
pub fn detail_pairs(record: &CitationRecord) -> Vec<(&'static str, &str)> {
    let fields: [(&'static str, &Option<String>); 13] = [
        ("Case name", &record.case_name),
        ("Reporter", &record.reporter),
        ("Court", &record.court),
        ("Author", &record.author),
        ("Title", &record.title),
        ("Journal", &record.journal),
        ("Volume", &record.volume),
        ("Start page", &record.start_page),
        ("Code", &record.statute_code),
        ("Section", &record.section),
        ("Note", &record.note),
        ("Pinpoint", &record.pinpoint),
        ("Year", &record.year),
    ];
    fields
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
}

fn export_markdown(footnotes: &[SegmentedFootnote]) -> String {
    let mut out = String::from("# Citation Segmentation Results\n\n");

    let stats = CitationStats::from_footnotes(footnotes);
    out.push_str(&format!(
        "**{}** footnotes | **{}** citations | {} case | {} article | {} statute | {} short form | {} unknown ({:.1}%)\n\n",
        footnotes.len(),
        stats.total,
        stats.case,
        stats.article,
        stats.statute,
        stats.short_form,
        stats.unknown,
        stats.unknown_pct(),
    ));

    for footnote in footnotes {
        out.push_str(&format!(
            "## Footnote {} ({})\n\n",
            footnote.footnote_num, footnote.mode
        ));
        if footnote.citations.is_empty() {
            out.push_str("_No citations._\n\n");
            continue;
        }
        out.push_str("| # | Type | Signal | Citation | Details |\n");
        out.push_str("|---|------|--------|----------|---------|\n");
        for citation in &footnote.citations {
            let record = citation.to_record();
            let details: Vec<String> = detail_pairs(&record)
                .into_iter()
                .map(|(label, value)| format!("{}: {}", label, value))
                .collect();
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                record.citation_num,
                record.citation_type,
                md_escape(record.signal.as_deref().unwrap_or("")),
                md_escape(&record.full_text),
                md_escape(&details.join("; ")),
            ));
        }
        out.push('\n');
    }
    out
}

fn export_text(footnotes: &[SegmentedFootnote]) -> String {
    let mut out = String::from("Citation Segmentation Results\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');

    for footnote in footnotes {
        let title = format!("Footnote {} [{}]", footnote.footnote_num, footnote.mode);
        out.push_str(&format!("\n{}\n", title));
        out.push_str(&"-".repeat(title.len()));
        out.push('\n');

        let mut stats = CitationStats::default();
        stats.add(footnote);
        out.push_str(&format!(
            "  {} citations | {} case | {} article | {} statute | {} short form | {} unknown\n\n",
            stats.total, stats.case, stats.article, stats.statute, stats.short_form, stats.unknown,
        ));

        for citation in &footnote.citations {
            let record = citation.to_record();
            out.push_str(&format!(
                "  [{}] {} - {}\n",
                record.citation_num, record.citation_type, record.full_text
            ));
            if let Some(signal) = &record.signal {
                out.push_str(&format!("       Signal: {}\n", signal));
            }
            for (label, value) in detail_pairs(&record) {
                out.push_str(&format!("       {}: {}\n", label, value));
            }
            if let Some(quote) = &record.quoted_text {
                out.push_str(&format!("       Quote: \"{}\"\n", quote));
            }
            if let Some(paren) = &record.parenthetical {
                out.push_str(&format!("       Parenthetical: ({})\n", paren));
            }
        }
    }
    out
}
