//! Entity-agnostic markup repairs.
//!
//! Each rule is a pure `&str -> String` transformation over a whole
//! documentation block and is a no-op when re-applied to its own output.

use super::spans::{ProtectedSpans, SpanKind, CODE};
use crate::parser::generics::split_commas_balanced;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_INCOMPLETE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&lt;([^<>&\n]*)>").unwrap());

static RE_COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ ]+(>=|<=|-+>|>|<)[ ]+").unwrap());

static RE_AMPERSANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*&+[ \t]*").unwrap());

static RE_ENTITY_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);").unwrap());

static RE_GENERIC_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Za-z0-9_]*<").unwrap());

static RE_EMPTY_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z][A-Za-z0-9]*)(?:\s[^<>]*)?></([A-Za-z][A-Za-z0-9]*)\s*>").unwrap()
});

static RE_EMPTY_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p\s*/>").unwrap());

static RE_SELF_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9]*)((?:\s[^<>]*?)?)\s*/>").unwrap());

static RE_AT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@+([A-Za-z][A-Za-z0-9]*)").unwrap());

/// Block and inline tags understood by the javadoc tool.
const KNOWN_TAGS: &[&str] = &[
    "author", "version", "param", "return", "deprecated", "since", "throws", "exception", "see",
    "serial", "serialField", "serialData", "link", "linkplain", "code", "literal", "value",
    "inheritDoc", "docRoot", "hidden", "index", "summary", "apiNote", "implSpec", "implNote",
    "provides", "uses", "systemProperty", "snippet", "spec",
];

/// Element names that must never be read as type arguments.
const HTML_ELEMENTS: &[&str] = &[
    "a", "b", "i", "u", "s", "p", "br", "hr", "em", "strong", "code", "pre", "tt", "ul", "ol",
    "li", "dl", "dt", "dd", "table", "thead", "tbody", "tr", "td", "th", "div", "span", "sub",
    "sup", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6", "img", "small", "big", "del",
    "ins", "cite", "dfn", "kbd", "samp", "var", "caption", "center", "font",
];

/// Replace regex matches that do not start inside a protected region.
fn replace_unprotected(
    doc: &str,
    re: &Regex,
    protected: &[SpanKind],
    replace: impl Fn(&Captures) -> String,
) -> String {
    let spans = ProtectedSpans::scan(doc);
    re.replace_all(doc, |caps: &Captures| {
        let whole = &caps[0];
        let start = caps.get(0).map_or(0, |m| m.start());
        if spans.covers(start, protected) {
            whole.to_string()
        } else {
            replace(caps)
        }
    })
    .into_owned()
}

/// Re-run `rule` until its output stops changing.
fn until_stable(doc: &str, rule: impl Fn(&str) -> String) -> String {
    let mut current = doc.to_string();
    loop {
        let next = rule(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// `&lt;tag>` → `&lt;tag&gt;`: close an escaped opener with a bare `>`.
pub fn fix_incomplete_escapes(doc: &str) -> String {
    RE_INCOMPLETE_ESCAPE
        .replace_all(doc, "&lt;$1&gt;")
        .into_owned()
}

/// Spell out free-standing comparison and arrow symbols.
pub fn fix_comparison_symbols(doc: &str) -> String {
    until_stable(doc, |text| {
        replace_unprotected(text, &RE_COMPARISON, CODE, |caps| {
            let word = match &caps[1] {
                ">" => "greater than",
                "<" => "less than",
                ">=" => "equal or greater than",
                "<=" => "equal or less than",
                _ => "---",
            };
            format!(" {} ", word)
        })
    })
}

/// Regions the ampersand rule leaves alone; anchors carry query strings.
const LINK_OR_CODE: &[SpanKind] = &[SpanKind::Anchor, SpanKind::InlineCode, SpanKind::CodeElement];

/// Replace literal ampersands with "and", leaving entity references alone.
pub fn fix_ampersands(doc: &str) -> String {
    let spans = ProtectedSpans::scan(doc);
    let mut out = String::with_capacity(doc.len());
    let mut last = 0;

    for m in RE_AMPERSANDS.find_iter(doc) {
        let is_entity = m.as_str().ends_with('&') && RE_ENTITY_BODY.is_match(&doc[m.end()..]);
        if is_entity || spans.covers(m.start(), LINK_OR_CODE) {
            continue;
        }
        out.push_str(&doc[last..m.start()]);
        out.push_str(" and ");
        last = m.end();
    }

    out.push_str(&doc[last..]);
    out
}

/// Render `Type<Args>` as prose so it is not read as an HTML tag.
///
/// Inside links, code and `@see` references only the bare type name is
/// kept. `<?>` is always dropped.
pub fn fix_generics(doc: &str) -> String {
    let spans = ProtectedSpans::scan(doc);
    render_generics(doc, Some(&spans))
}

fn render_generics(doc: &str, spans: Option<&ProtectedSpans>) -> String {
    let mut out = String::with_capacity(doc.len());
    let mut pos = 0;

    while let Some(m) = RE_GENERIC_START.find_at(doc, pos) {
        let open = m.end() - 1;
        let Some(close) = type_arguments_end(doc, open) else {
            out.push_str(&doc[pos..m.end()]);
            pos = m.end();
            continue;
        };

        let name = &doc[m.start()..open];
        let inner = &doc[open + 1..close];
        let bare = spans.is_some_and(|s| {
            s.covers(
                m.start(),
                &[
                    SpanKind::InlineLink,
                    SpanKind::InlineCode,
                    SpanKind::CodeElement,
                    SpanKind::SeeReference,
                ],
            )
        });

        out.push_str(&doc[pos..m.start()]);
        if bare {
            out.push_str(name);
        } else {
            out.push_str(&describe_generic(name, inner));
        }
        pos = close + 1;
    }

    out.push_str(&doc[pos..]);
    out
}

fn describe_generic(name: &str, inner: &str) -> String {
    if inner.trim().is_empty() {
        return format!("{} - generics", name);
    }

    let raw_args = split_commas_balanced(inner);
    let args: Vec<String> = raw_args
        .iter()
        .map(|a| render_generics(a.trim(), None))
        .collect();

    if args.iter().all(|a| a == "?") {
        return name.to_string();
    }

    match args.as_slice() {
        [key, value] if name.contains("Map") => {
            let lead = &raw_args[1][..raw_args[1].len() - raw_args[1].trim_start().len()];
            format!("{} ({} - key, {}{} - value)", name, key, lead, value)
        }
        [single] => format!("{} of generics type {}", name, single),
        _ => format!("{} of generics types: {}", name, args.join(", ")),
    }
}

/// Find the `>` that closes the type-argument list opened at `open`.
///
/// Returns `None` when the bracket does not look like type arguments:
/// it crosses a line, contains characters types never use, or names an
/// HTML element.
fn type_arguments_end(doc: &str, open: usize) -> Option<usize> {
    let inner_start = open + 1;
    let first_word: String = doc[inner_start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if HTML_ELEMENTS.contains(&first_word.to_ascii_lowercase().as_str()) {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in doc[open..].char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            c if c.is_alphanumeric() || " \t,.?[]_$&".contains(c) => {}
            _ => return None,
        }
    }
    None
}

/// Drop empty elements and the slash of self-closing ones.
pub fn fix_empty_tags(doc: &str) -> String {
    until_stable(doc, |text| {
        let text = replace_unprotected(text, &RE_EMPTY_PAIR, CODE, |caps| {
            if caps[1].eq_ignore_ascii_case(&caps[2]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        });
        let text = replace_unprotected(&text, &RE_EMPTY_PARAGRAPH, CODE, |_| String::new());
        replace_unprotected(&text, &RE_SELF_CLOSING, CODE, |caps| {
            format!("<{}{}>", &caps[1], &caps[2])
        })
    })
}

/// Turn unknown `@tags` into capitalized prose (`@custom` → `Custom`).
///
/// Addresses inside anchors and anything inside code are left alone, as is
/// an `@` glued to a preceding word.
pub fn fix_invented_tags(doc: &str) -> String {
    let spans = ProtectedSpans::scan(doc);
    RE_AT_WORD
        .replace_all(doc, |caps: &Captures| {
            let whole = &caps[0];
            let name = &caps[1];
            let start = caps.get(0).map_or(0, |m| m.start());
            let glued = doc[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '_');
            let protected = spans.covers(
                start,
                &[SpanKind::Anchor, SpanKind::InlineCode, SpanKind::CodeElement],
            );

            if glued || protected || KNOWN_TAGS.contains(&name) {
                return whole.to_string();
            }
            capitalize(name)
        })
        .into_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
