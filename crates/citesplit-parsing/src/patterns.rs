//! Citation-shaped patterns shared by the mode classifier, the chunk
//! splitter, the supplemental merger and the field extractors.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `Word(s) v. Word(s)`; the match starts at the first party's name.
pub(crate) static CASE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[A-Z][\w'’.&-]*(?:,?\s+(?:[A-Z][\w'’.&-]*|of|the|for|and|&|ex\s+rel\.))*\s+vs?\.\s+[\w'’(]",
    )
    .unwrap()
});

/// Starts with `Id.` / `id.` / `Id,`, optionally wrapped in markup.
pub(crate) static ID_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[*_]*id(?:[.,*_]|\s|$)").unwrap());

/// Westlaw-style short form: `2020 WL 123456`.
pub(crate) static WL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\s+WL\s+\d+").unwrap());

/// Code + section symbol: `42 U.S.C. § 1983(a)`, `Cal. Civ. Code §§ 1714`.
pub(crate) static STATUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<code>(?:\b\d+\s+)?[A-Z][A-Za-z.'’]*(?:\s+(?:[A-Z][A-Za-z.'’]*|&))*)\s*§§?\s*(?P<section>\d[\w.:–-]*(?:\([A-Za-z0-9]+\))*)",
    )
    .unwrap()
});

/// Volume, source abbreviation and page: `100 U.S. 1`, `123 F.3d 456`,
/// `100 Harv. L. Rev. 1`, `2020 WL 123456`. The source is classified as a
/// court reporter or a journal afterwards.
pub(crate) static VOLUME_SOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?P<volume>\d{1,5})\s+(?P<source>(?:[A-Z][A-Za-z.'’]*|\d+(?:d|st|nd|rd|th)\b)(?:(?:\s+(?:of|on|and|&)\s+|\s?)(?:[A-Z][A-Za-z.'’]*|\d+(?:d|st|nd|rd|th)\b))*)\s+(?P<page>\d{1,7})\b",
    )
    .unwrap()
});

/// Short-form case cite: `100 U.S. at 5`.
pub(crate) static SHORT_CASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?P<volume>\d{1,5})\s+(?P<source>(?:[A-Z][A-Za-z.'’]*|\d+(?:d|st|nd|rd|th)\b)(?:\s?(?:[A-Z][A-Za-z.'’]*|\d+(?:d|st|nd|rd|th)\b))*)\s+at\s+(?P<pin>\d+(?:\s*[-–—]\s*\d+)?)",
    )
    .unwrap()
});

/// Journal markers: `L. Rev.`, `L.J.`, `J.`, `Q.`, `Review`, `Law`.
static JOURNAL_HINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(?:J\.|Q\.)|L\.\s?(?:J|Q|Rev)\.|\bRev\.|\b(?:Law|Journal|Review|Quarterly)\b")
        .unwrap()
});

/// Whether a volume/page source abbreviation names a journal.
pub(crate) fn is_journal_source(source: &str) -> bool {
    JOURNAL_HINT_RE.is_match(source)
}

/// Whether a volume/page source abbreviation looks like a court reporter.
pub(crate) fn is_reporter_source(source: &str) -> bool {
    if is_journal_source(source) {
        return false;
    }
    source.contains('.') || source == "WL" || source.ends_with("LEXIS")
}

/// First volume/reporter/page triple whose source is a court reporter and
/// whose start offset passes `allowed`.
pub(crate) fn find_case_reporter(
    text: &str,
    allowed: impl Fn(usize) -> bool,
) -> Option<Captures<'_>> {
    VOLUME_SOURCE_RE
        .captures_iter(text)
        .find(|caps| is_reporter_source(&caps["source"]) && starts_allowed(caps, &allowed))
}

/// First `volume reporter at page` short form whose source is a court reporter.
pub(crate) fn find_short_case(
    text: &str,
    allowed: impl Fn(usize) -> bool,
) -> Option<Captures<'_>> {
    SHORT_CASE_RE
        .captures_iter(text)
        .find(|caps| is_reporter_source(&caps["source"]) && starts_allowed(caps, &allowed))
}

/// First volume/journal/page triple.
pub(crate) fn find_journal(text: &str, allowed: impl Fn(usize) -> bool) -> Option<Captures<'_>> {
    VOLUME_SOURCE_RE
        .captures_iter(text)
        .find(|caps| is_journal_source(&caps["source"]) && starts_allowed(caps, &allowed))
}

fn starts_allowed(caps: &Captures<'_>, allowed: &impl Fn(usize) -> bool) -> bool {
    caps.get(0).is_some_and(|m| allowed(m.start()))
}

/// Whether `text` contains any reporter-like token (case reporter, journal, or statute).
pub(crate) fn has_reporter_token(text: &str) -> bool {
    VOLUME_SOURCE_RE.is_match(text) || STATUTE_RE.is_match(text) || WL_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_name_re() {
        let m = CASE_NAME_RE.find("O'Neal v. State, 100 U.S. 1").unwrap();
        assert_eq!(m.start(), 0);
        assert!(CASE_NAME_RE.is_match("Brown v. Board of Education"));
        assert!(CASE_NAME_RE.is_match("United States ex rel. Doe v. Roe"));
        assert!(!CASE_NAME_RE.is_match("the court held v. nothing"));
        assert!(!CASE_NAME_RE.is_match("Id. at 5"));
    }

    #[test]
    fn test_id_start_re() {
        assert!(ID_START_RE.is_match("Id. at 458"));
        assert!(ID_START_RE.is_match("id., at 3"));
        assert!(ID_START_RE.is_match("*Id.* at 2"));
        assert!(ID_START_RE.is_match("Id"));
        assert!(!ID_START_RE.is_match("Idaho Code § 5"));
        assert!(!ID_START_RE.is_match("See id."));
    }

    #[test]
    fn test_statute_re() {
        let caps = STATUTE_RE.captures("42 U.S.C. § 1983(a)(1) (2018)").unwrap();
        assert_eq!(&caps["code"], "42 U.S.C.");
        assert_eq!(&caps["section"], "1983(a)(1)");

        let caps = STATUTE_RE.captures("Cal. Civ. Proc. Code §§ 425.16").unwrap();
        assert_eq!(&caps["code"], "Cal. Civ. Proc. Code");
        assert_eq!(&caps["section"], "425.16");

        assert!(!STATUTE_RE.is_match("Smith v. Jones, 100 U.S. 1"));
    }

    #[test]
    fn test_case_reporter_sources() {
        for (text, reporter) in [
            ("Smith, 100 U.S. 1 (2000)", "U.S."),
            ("Doe, 123 F.3d 456 (2d Cir. 1999)", "F.3d"),
            ("Roe, 45 F. Supp. 2d 789", "F. Supp. 2d"),
            ("Poe, 12 S. Ct. 34", "S. Ct."),
            ("Moe, 2020 WL 1234567", "WL"),
            ("Zoe, 9 N.E.2d 10", "N.E.2d"),
        ] {
            let caps = find_case_reporter(text, |_| true).unwrap_or_else(|| panic!("no match: {text}"));
            assert_eq!(&caps["source"], reporter, "{text}");
        }
    }

    #[test]
    fn test_journal_is_not_a_case_reporter() {
        let text = "John Doe, The Law, 100 Harv. L. Rev. 1 (2000)";
        assert!(find_case_reporter(text, |_| true).is_none());
        assert!(find_journal(text, |pos| pos > 40).is_none());
        let caps = find_journal(text, |_| true).unwrap();
        assert_eq!(&caps["volume"], "100");
        assert_eq!(&caps["source"], "Harv. L. Rev.");
        assert_eq!(&caps["page"], "1");

        assert!(is_journal_source("Yale L.J."));
        assert!(is_journal_source("Colum. J. Transnat'l L."));
        assert!(!is_journal_source("N.J. Super."));
        assert!(!is_journal_source("L. Ed. 2d"));
    }

    #[test]
    fn test_short_case() {
        let caps = find_short_case("Smith, 100 U.S. at 5", |_| true).unwrap();
        assert_eq!(&caps["source"], "U.S.");
        assert_eq!(&caps["pin"], "5");
    }

    #[test]
    fn test_has_reporter_token() {
        assert!(has_reporter_token("Smith, 100 U.S. 1"));
        assert!(has_reporter_token("42 U.S.C. § 1983"));
        assert!(!has_reporter_token("supra notes 5-8 and accompanying text"));
    }
}
