use crate::types::Span;

/// What produced a protected region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Parenthetical,
    Quoted,
}

/// A span of footnote text inside which no split may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedRegion {
    pub span: Span,
    pub kind: RegionKind,
}

impl ProtectedRegion {
    /// The region's text without its opening and closing delimiters.
    pub fn inner<'a>(&self, text: &'a str) -> &'a str {
        let mut chars = self.span.slice(text).chars();
        chars.next();
        chars.next_back();
        chars.as_str()
    }
}

/// Protected regions for one input string, ordered by start offset.
///
/// Offsets are only meaningful for the text that was scanned; a fresh set is
/// produced per footnote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedRegions {
    regions: Vec<ProtectedRegion>,
}

fn is_double_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}')
}

fn is_single_quote(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}')
}

impl ProtectedRegions {
    /// Scan `text` once, recording balanced parentheticals and closed quotations.
    ///
    /// - Parentheses only change depth outside an open quotation; a region
    ///   covers a top-level parenthetical including both parentheses.
    /// - Straight and curly double quotes toggle the double-quote state.
    /// - A single quote between two alphanumerics is an apostrophe. One that
    ///   follows an alphanumeric can close an open single quote but never
    ///   opens one (`plaintiffs' claims`).
    /// - Unterminated quotes and parentheses produce no region.
    pub fn scan(text: &str) -> Self {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut regions = Vec::new();

        let mut depth = 0usize;
        let mut paren_start = 0usize;
        let mut double_open: Option<usize> = None;
        let mut single_open: Option<usize> = None;

        for (i, &(pos, c)) in chars.iter().enumerate() {
            let end = pos + c.len_utf8();
            let in_quote = double_open.is_some() || single_open.is_some();

            if c == '(' && !in_quote {
                if depth == 0 {
                    paren_start = pos;
                }
                depth += 1;
            } else if c == ')' && !in_quote {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        regions.push(ProtectedRegion {
                            span: Span::new(paren_start, end),
                            kind: RegionKind::Parenthetical,
                        });
                    }
                }
            } else if is_double_quote(c) {
                match double_open.take() {
                    Some(start) => regions.push(ProtectedRegion {
                        span: Span::new(start, end),
                        kind: RegionKind::Quoted,
                    }),
                    None => double_open = Some(pos),
                }
            } else if is_single_quote(c) {
                let prev_alnum = i > 0 && chars[i - 1].1.is_alphanumeric();
                let next_alnum = chars.get(i + 1).is_some_and(|&(_, n)| n.is_alphanumeric());
                if prev_alnum && next_alnum {
                    continue;
                }
                match single_open.take() {
                    Some(start) => regions.push(ProtectedRegion {
                        span: Span::new(start, end),
                        kind: RegionKind::Quoted,
                    }),
                    None if !prev_alnum => single_open = Some(pos),
                    None => {}
                }
            }
        }

        regions.sort_by_key(|r| (r.span.start, r.span.end));
        Self { regions }
    }

    /// Whether `pos` falls inside any region.
    pub fn is_protected(&self, pos: usize) -> bool {
        // Regions are sorted by start; only those starting at or before `pos` can contain it.
        let upper = self.regions.partition_point(|r| r.span.start <= pos);
        self.regions[..upper].iter().any(|r| r.span.contains(pos))
    }

    /// Regions lying entirely within `span`, in start order.
    pub fn within(&self, span: Span) -> impl Iterator<Item = &ProtectedRegion> {
        self.regions.iter().filter(move |r| span.encloses(r.span))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtectedRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
