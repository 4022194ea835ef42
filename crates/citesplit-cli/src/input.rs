use once_cell::sync::Lazy;
use regex::Regex;

/// `12.` or `[12]` at the start of a footnote block.
static NUMBER_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\[(\d+)\]|(\d+)\.)(?:\s+|$)").unwrap());

/// A footnote read from an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFootnote {
    pub number: usize,
    pub text: String,
}

/// Split input into footnotes.
///
/// Footnotes are separated by blank lines. A block may open with `N.` or `[N]`
/// to give its number; unnumbered blocks continue from the previous number,
/// starting at 1. Lines within a block are joined with single spaces.
pub fn parse_footnotes(input: &str) -> Vec<RawFootnote> {
    let mut footnotes = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut next_number = 1;

    for line in input.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line.trim());
            continue;
        }
        if block.is_empty() {
            continue;
        }
        let joined = block.join(" ");
        block.clear();

        let footnote = match number_prefix(&joined) {
            Some((number, rest)) => RawFootnote {
                number,
                text: rest.to_string(),
            },
            None => RawFootnote {
                number: next_number,
                text: joined,
            },
        };
        next_number = footnote.number + 1;
        footnotes.push(footnote);
    }

    footnotes
}

/// Footnote number and the text after it. Zero is not a footnote number.
fn number_prefix(block: &str) -> Option<(usize, &str)> {
    let caps = NUMBER_PREFIX_RE.captures(block)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?;
    let number: usize = digits.as_str().parse().ok()?;
    if number == 0 {
        return None;
    }
    let end = caps.get(0)?.end();
    Some((number, block[end..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unnumbered_blocks_are_sequential() {
        let footnotes = parse_footnotes("Id. at 5.\n\nSee Smith, 1 U.S. 1.\n");
        assert_eq!(
            footnotes,
            vec![
                RawFootnote {
                    number: 1,
                    text: "Id. at 5.".to_string()
                },
                RawFootnote {
                    number: 2,
                    text: "See Smith, 1 U.S. 1.".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_numbered_prefixes() {
        let footnotes = parse_footnotes("12. Id. at 5.\n\n[14] Supra note 3.\n\nId.");
        let numbers: Vec<usize> = footnotes.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![12, 14, 15]);
        assert_eq!(footnotes[0].text, "Id. at 5.");
        assert_eq!(footnotes[1].text, "Supra note 3.");
    }

    #[test]
    fn test_wrapped_lines_are_joined() {
        let footnotes = parse_footnotes("3. See Smith v. Jones,\n   100 U.S. 1 (2000).\n");
        assert_eq!(footnotes.len(), 1);
        assert_eq!(footnotes[0].number, 3);
        assert_eq!(footnotes[0].text, "See Smith v. Jones, 100 U.S. 1 (2000).");
    }

    #[test]
    fn test_statute_is_not_a_number_prefix() {
        let footnotes = parse_footnotes("42 U.S.C. § 1983.");
        assert_eq!(footnotes[0].number, 1);
        assert_eq!(footnotes[0].text, "42 U.S.C. § 1983.");
    }

    #[test]
    fn test_blank_runs_and_crlf() {
        let footnotes = parse_footnotes("\r\n\r\nId.\r\n  \r\n\r\n\r\nId. at 2.\r\n");
        assert_eq!(footnotes.len(), 2);
        assert_eq!(footnotes[1].number, 2);
        assert_eq!(footnotes[1].text, "Id. at 2.");
    }

    #[test]
    fn test_number_only_block() {
        let footnotes = parse_footnotes("7.");
        assert_eq!(
            footnotes,
            vec![RawFootnote {
                number: 7,
                text: String::new()
            }]
        );
    }

    #[test]
    fn test_zero_is_text() {
        let footnotes = parse_footnotes("0. Something");
        assert_eq!(footnotes[0].number, 1);
        assert_eq!(footnotes[0].text, "0. Something");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_footnotes("").is_empty());
        assert!(parse_footnotes("\n\n   \n").is_empty());
    }
}
