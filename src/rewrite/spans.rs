//! Protected regions inside a documentation block.
//!
//! Several rules must leave markup alone: generics inside `{@link ...}`,
//! symbols inside `{@code ...}`, e-mail addresses inside `<a ...>`. The
//! regions are collected once per text and then queried by position.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static RE_INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@([A-Za-z]+)").unwrap());

static RE_ELEMENT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(code|pre|a)(?:\s[^>]*)?>").unwrap());

static RE_SEE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@see\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// `{@code ...}` and `{@literal ...}`
    InlineCode,
    /// `{@link ...}`, `{@linkplain ...}` and `{@value ...}`
    InlineLink,
    /// `<code>...</code>` and `<pre>...</pre>`
    CodeElement,
    /// `<a ...>...</a>`
    Anchor,
    /// From `@see` to the end of its line
    SeeReference,
}

/// Code-like regions: rules that rewrite prose skip these.
pub const CODE: &[SpanKind] = &[SpanKind::InlineCode, SpanKind::CodeElement];

#[derive(Debug, Default)]
pub struct ProtectedSpans {
    spans: Vec<(Range<usize>, SpanKind)>,
}

impl ProtectedSpans {
    pub fn scan(doc: &str) -> Self {
        let mut spans = Vec::new();

        for caps in RE_INLINE_TAG.captures_iter(doc) {
            let kind = match &caps[1] {
                "code" | "literal" => SpanKind::InlineCode,
                "link" | "linkplain" | "value" => SpanKind::InlineLink,
                _ => continue,
            };
            let Some(start) = caps.get(0).map(|m| m.start()) else {
                continue;
            };
            if let Some(end) = closing_brace(doc, start) {
                spans.push((start..end, kind));
            }
        }

        let lowered = doc.to_ascii_lowercase();
        for caps in RE_ELEMENT_OPEN.captures_iter(doc) {
            let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = name.as_str().to_ascii_lowercase();
            let kind = if name == "a" {
                SpanKind::Anchor
            } else {
                SpanKind::CodeElement
            };
            let closing = format!("</{}", name);
            if let Some(rel) = lowered[open.end()..].find(&closing) {
                spans.push((open.start()..open.end() + rel, kind));
            }
        }

        for m in RE_SEE.find_iter(doc) {
            let end = doc[m.start()..]
                .find('\n')
                .map_or(doc.len(), |i| m.start() + i);
            spans.push((m.start()..end, SpanKind::SeeReference));
        }

        spans.sort_by_key(|(range, _)| range.start);
        Self { spans }
    }

    /// True when `pos` lies inside a region of one of `kinds`.
    pub fn covers(&self, pos: usize, kinds: &[SpanKind]) -> bool {
        self.spans
            .iter()
            .take_while(|(range, _)| range.start <= pos)
            .any(|(range, kind)| range.contains(&pos) && kinds.contains(kind))
    }
}

/// Index just past the `}` that balances the `{` at `open`.
fn closing_brace(doc: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in doc[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
