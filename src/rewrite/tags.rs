//! Entity-aware rules: keep `@param`, `@throws` and `@return` in step with
//! the declaration that follows the block.
//!
//! The block is edited as a list of lines. Every inserted line reuses the
//! block's own decoration, so a block indented with tabs stays that way.

use crate::model::{CallableSignature, Parameter};
use regex::Regex;
use std::sync::LazyLock;

static RE_PARAM_SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s+)(\(?)([A-Za-z_$][\w$]*)(\)?)(.*)$").unwrap());

static RE_REPEATED_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)@return\b").unwrap());

const THROWS_TAGS: &[&str] = &["throws", "exception"];

/// A named entity-aware rule.
pub struct TagRule {
    pub name: &'static str,
    pub apply: fn(&mut DocLines, &CallableSignature),
}

/// Entity-aware rules in application order.
pub const TAG_RULES: &[TagRule] = &[
    TagRule {
        name: "param-sync",
        apply: sync_params,
    },
    TagRule {
        name: "throws-sync",
        apply: sync_throws,
    },
    TagRule {
        name: "return-sync",
        apply: sync_return,
    },
];

/// A documentation block split into lines.
///
/// After parsing, the first line is exactly `/**`, the last line holds only
/// the closing delimiter, and everything in between is body.
#[derive(Debug, Clone)]
pub struct DocLines {
    lines: Vec<String>,
    newline: &'static str,
    prefix: String,
}

impl DocLines {
    /// Parse a block that starts with `/**` and ends with `*/`.
    ///
    /// `indent` is the whitespace before the opening delimiter on its line
    /// and `newline` is the line terminator of the enclosing unit.
    pub fn parse(block: &str, indent: &str, newline: &'static str) -> Self {
        let mut lines: Vec<String> = block.split(newline).map(str::to_string).collect();
        let closing_line = format!("{} */", indent);

        if lines.len() == 1 {
            let body = block
                .get(3..block.len().saturating_sub(2))
                .unwrap_or_default()
                .trim();
            lines = vec!["/**".to_string()];
            if !body.is_empty() {
                lines.push(format!("{} * {}", indent, body));
            }
            lines.push(closing_line);
        } else if let Some(last) = lines.last_mut() {
            let before = last.strip_suffix("*/").unwrap_or(last.as_str());
            if !before.trim().trim_start_matches('*').trim().is_empty() {
                let kept = before.trim_end().to_string();
                *last = kept;
                lines.push(closing_line);
            }
        }

        let prefix = lines[1..lines.len() - 1]
            .iter()
            .find(|line| line.trim_start().starts_with('*'))
            .map(|line| {
                let ws = &line[..line.len() - line.trim_start().len()];
                format!("{}* ", ws)
            })
            .unwrap_or_else(|| {
                let closing = &lines[lines.len() - 1];
                format!("{}* ", &closing[..closing.len() - closing.trim_start().len()])
            });

        let first_content = lines[0]
            .get(3..)
            .unwrap_or_default()
            .trim_start_matches('*')
            .trim()
            .to_string();
        if !first_content.is_empty() {
            lines[0] = "/**".to_string();
            lines.insert(1, format!("{}{}", prefix, first_content));
        }

        Self {
            lines,
            newline,
            prefix,
        }
    }

    pub fn render(&self) -> String {
        self.lines.join(self.newline)
    }

    fn closing(&self) -> usize {
        self.lines.len() - 1
    }

    /// Line text without decoration.
    fn content(&self, i: usize) -> &str {
        if i == 0 || i >= self.closing() {
            return "";
        }
        self.lines[i].trim_start().trim_start_matches('*').trim()
    }

    /// Byte offset where the content of line `i` begins.
    fn content_start(&self, i: usize) -> usize {
        let line = &self.lines[i];
        line.len() - line.trim_start().trim_start_matches('*').trim_start().len()
    }

    /// Tag name and the text after it, when line `i` opens a block tag.
    fn tag(&self, i: usize) -> Option<(&str, &str)> {
        let rest = self.content(i).strip_prefix('@')?;
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let name = &rest[..len];
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        Some((name, &rest[len..]))
    }

    fn is_tag_line(&self, i: usize) -> bool {
        self.tag(i).is_some()
    }

    fn tag_lines(&self, names: &[&str]) -> Vec<usize> {
        (1..self.closing())
            .filter(|&i| self.tag(i).is_some_and(|(name, _)| names.contains(&name)))
            .collect()
    }

    fn first_tag_line(&self) -> Option<usize> {
        (1..self.closing()).find(|&i| self.is_tag_line(i))
    }

    /// End (exclusive) of the tag entry that starts on line `i`: the next tag
    /// line, blank line or closing line.
    fn entry_end(&self, i: usize) -> usize {
        let mut end = i + 1;
        while end < self.closing() && !self.is_tag_line(end) && !self.content(end).is_empty() {
            end += 1;
        }
        end
    }

    fn has_continuation(&self, i: usize) -> bool {
        self.entry_end(i) > i + 1
    }

    fn remove_entry(&mut self, i: usize) {
        let end = self.entry_end(i);
        self.lines.drain(i..end);
    }

    fn insert(&mut self, at: usize, text: &str) {
        let line = format!("{}{}", self.prefix, text);
        self.lines.insert(at, line);
    }

    fn insert_before_closing(&mut self, text: &str) {
        let at = self.closing();
        self.insert(at, text);
    }

    fn append(&mut self, i: usize, text: &str) {
        let line = &mut self.lines[i];
        line.truncate(line.trim_end().len());
        line.push_str(text);
    }

    /// Value parameter named by the `@param` tag on line `i`.
    fn param_name(&self, i: usize) -> Option<String> {
        let (_, rest) = self.tag(i).filter(|(name, _)| *name == "param")?;
        let caps = RE_PARAM_SUBJECT.captures(rest)?;
        Some(caps[3].to_string())
    }

    fn param_line(&self, name: &str) -> Option<usize> {
        self.tag_lines(&["param"])
            .into_iter()
            .find(|&i| self.param_name(i).as_deref() == Some(name))
    }
}

/// Last segment of a possibly qualified type name.
fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Match `@param` tags to the declared parameters.
///
/// Tags naming an unknown parameter are removed, tags without a
/// description get a placeholder, and undocumented parameters are added
/// in declaration order. `@param <T>` tags are left alone. When a declared
/// parameter cannot be split into type and name, no tag is removed.
pub fn sync_params(doc: &mut DocLines, sig: &CallableSignature) {
    let params: Vec<Parameter> = sig
        .parameters
        .iter()
        .filter_map(|p| Parameter::parse(p))
        .collect();
    let all_parsed = params.len() == sig.parameters.len();

    for i in doc.tag_lines(&["param"]).into_iter().rev() {
        let Some((_, rest)) = doc.tag(i) else {
            continue;
        };
        let Some(caps) = RE_PARAM_SUBJECT.captures(rest) else {
            continue;
        };
        let name = caps[3].to_string();
        let description = caps[5].to_string();
        let parenthesized = !caps[2].is_empty() || !caps[4].is_empty();
        let spacing = caps[1].to_string();

        let Some(param) = params.iter().find(|p| p.name == name) else {
            if all_parsed {
                doc.remove_entry(i);
            }
            continue;
        };

        if parenthesized {
            let start = doc.content_start(i);
            let line = &doc.lines[i];
            doc.lines[i] = format!("{}@param{}{}{}", &line[..start], spacing, name, description);
        }
        if description.trim().is_empty() && !doc.has_continuation(i) {
            doc.append(i, &format!(" - the {} ({})", name, param.display_type()));
        }
    }

    for (k, param) in params.iter().enumerate() {
        if doc.param_line(&param.name).is_some() {
            continue;
        }
        let at = params[..k]
            .iter()
            .rev()
            .find_map(|prev| doc.param_line(&prev.name))
            .map(|line| doc.entry_end(line))
            .or_else(|| doc.first_tag_line())
            .unwrap_or_else(|| doc.closing());
        doc.insert(
            at,
            &format!(
                "@param {} - the {} ({})",
                param.name,
                param.name,
                param.display_type()
            ),
        );
    }
}

/// Match `@throws`/`@exception` tags to the declared exceptions.
///
/// Names are compared by their simple form, so `java.io.IOException`
/// documents `IOException`.
pub fn sync_throws(doc: &mut DocLines, sig: &CallableSignature) {
    let declared: Vec<&str> = sig
        .exceptions_thrown
        .iter()
        .map(|e| simple_name(e))
        .collect();

    for i in doc.tag_lines(THROWS_TAGS).into_iter().rev() {
        let Some((_, rest)) = doc.tag(i) else {
            continue;
        };
        let subject = rest.split_whitespace().next().unwrap_or_default();
        if subject.is_empty() || !declared.contains(&simple_name(subject)) {
            doc.remove_entry(i);
            continue;
        }
        let described = !rest.trim_start()[subject.len()..].trim().is_empty();
        if !described && !doc.has_continuation(i) {
            doc.append(i, " - exception");
        }
    }

    for exception in &sig.exceptions_thrown {
        let documented = doc.tag_lines(THROWS_TAGS).into_iter().any(|i| {
            doc.tag(i)
                .and_then(|(_, rest)| rest.split_whitespace().next())
                .is_some_and(|subject| simple_name(subject) == simple_name(exception))
        });
        if !documented {
            doc.insert_before_closing(&format!("@throws {} - exception", exception));
        }
    }
}

/// Keep exactly one described `@return` on value-returning methods and none
/// on `void` ones. Constructors have no return type and are left alone.
///
/// An `@return` in the middle of a line counts as present: nothing is
/// inserted next to it.
pub fn sync_return(doc: &mut DocLines, sig: &CallableSignature) {
    let Some(return_type) = sig.return_type.as_deref() else {
        return;
    };

    if sig.returns_void() {
        for i in doc.tag_lines(&["return"]).into_iter().rev() {
            doc.remove_entry(i);
        }
        return;
    }

    let returns = doc.tag_lines(&["return"]);
    let Some((&first, later)) = returns.split_first() else {
        let mentioned = (1..doc.closing()).any(|i| RE_REPEATED_RETURN.is_match(doc.content(i)));
        if mentioned {
            return;
        }
        let at = doc
            .tag_lines(THROWS_TAGS)
            .first()
            .copied()
            .unwrap_or_else(|| doc.closing());
        doc.insert(at, &format!("@return {}", return_type));
        return;
    };

    for &i in later {
        doc.lines[i] = RE_REPEATED_RETURN.replace_all(&doc.lines[i], "").into_owned();
    }

    let token_end = doc.content_start(first) + "@return".len();
    let line = &doc.lines[first];
    let tail = RE_REPEATED_RETURN.replace_all(&line[token_end..], "");
    doc.lines[first] = format!("{}{}", &line[..token_end], tail);

    let described = doc
        .tag(first)
        .is_some_and(|(_, rest)| !rest.trim().is_empty());
    if !described && !doc.has_continuation(first) {
        doc.append(first, &format!(" {}", return_type));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(return_type: &str, parameters: &[&str], exceptions: &[&str]) -> CallableSignature {
        CallableSignature {
            return_type: Some(return_type.to_string()),
            parameters: parameters.iter().map(|s| s.to_string()).collect(),
            exceptions_thrown: exceptions.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn run(rule: fn(&mut DocLines, &CallableSignature), block: &str, sig: &CallableSignature) -> String {
        let mut doc = DocLines::parse(block, "    ", "\n");
        rule(&mut doc, sig);
        doc.render()
    }

    #[test]
    fn parse_normalizes_single_line_block() {
        let doc = DocLines::parse("/** Runs. */", "    ", "\n");
        assert_eq!(doc.render(), "/**\n     * Runs.\n     */");
    }

    #[test]
    fn parse_splits_trailing_closer_and_leading_text() {
        let doc = DocLines::parse("/** Summary\n     * more */", "    ", "\n");
        assert_eq!(doc.render(), "/**\n     * Summary\n     * more\n     */");
    }

    #[test]
    fn parse_keeps_crlf() {
        let doc = DocLines::parse("/**\r\n     * a\r\n     */", "    ", "\r\n");
        assert_eq!(doc.render(), "/**\r\n     * a\r\n     */");
    }

    #[test]
    fn return_removed_for_void() {
        let out = run(sync_return, "/**\n*     @return result\n*/", &method("void", &[], &[]));
        assert_eq!(out, "/**\n*/");
    }

    #[test]
    fn return_added_when_missing() {
        let out = run(sync_return, "/**\n     */", &method("Object", &[], &[]));
        assert_eq!(out, "/**\n     * @return Object\n     */");
    }

    #[test]
    fn return_added_before_throws() {
        let out = run(
            sync_return,
            "/**\n     * @throws IOException\n     */",
            &method("Object", &[], &[]),
        );
        assert_eq!(out, "/**\n     * @return Object\n     * @throws IOException\n     */");
    }

    #[test]
    fn return_description_filled_in() {
        let out = run(
            sync_return,
            "/**\n     * @return\n     * @throws IOException\n     */",
            &method("Object", &[], &[]),
        );
        assert_eq!(out, "/**\n     * @return Object\n     * @throws IOException\n     */");
    }

    #[test]
    fn repeated_returns_are_merged() {
        let sig = method("Object", &[], &[]);
        let out = run(
            sync_return,
            "/**\n     * @return some result\n     * @return\n     * @throws IOException\n     */",
            &sig,
        );
        assert_eq!(out, "/**\n     * @return some result\n     *\n     * @throws IOException\n     */");

        let out = run(
            sync_return,
            "/**\n     * @return some result\n     * @return some result\n     * @throws IOException\n     */",
            &sig,
        );
        assert_eq!(
            out,
            "/**\n     * @return some result\n     * some result\n     * @throws IOException\n     */"
        );

        let out = run(
            sync_return,
            "/**\n     * @return @return some result\n     * @throws IOException\n     */",
            &sig,
        );
        assert_eq!(out, "/**\n     * @return some result\n     * @throws IOException\n     */");
    }

    #[test]
    fn return_already_correct() {
        let block = "/**\n     * @return Object\n     * @throws IOException\n     */";
        assert_eq!(run(sync_return, block, &method("Object", &[], &[])), block);
    }

    #[test]
    fn constructor_return_untouched() {
        let sig = CallableSignature::default();
        let block = "/**\n     * @return odd\n     */";
        assert_eq!(run(sync_return, block, &sig), block);
    }

    #[test]
    fn throws_synced() {
        let out = run(
            sync_throws,
            "/**\n     *\n     * @throws Exception - occurs when something happened\n     * @throws RuntimeException\n     * @throws IOException\n     */",
            &method("void", &[], &["Exception", "FileNotFoundException", "IOException"]),
        );
        assert_eq!(
            out,
            "/**\n     *\n     * @throws Exception - occurs when something happened\n     * @throws IOException - exception\n     * @throws FileNotFoundException - exception\n     */"
        );
    }

    #[test]
    fn throws_matches_qualified_names() {
        let out = run(
            sync_throws,
            "/**\n     *\n     * @throws java.io.IOException\n     */",
            &method("void", &[], &["Exception", "IOException"]),
        );
        assert_eq!(
            out,
            "/**\n     *\n     * @throws java.io.IOException - exception\n     * @throws Exception - exception\n     */"
        );
    }

    #[test]
    fn exception_tag_counts_as_throws() {
        let block = "/**\n     * @exception IOException when the disk fails\n     */";
        assert_eq!(run(sync_throws, block, &method("void", &[], &["IOException"])), block);
    }

    #[test]
    fn params_added_in_order() {
        let out = run(
            sync_params,
            "/**\n     * Does things.\n     * @return count\n     */",
            &method("int", &["final String name", "int... counts"], &[]),
        );
        assert_eq!(
            out,
            "/**\n     * Does things.\n     * @param name - the name (String)\n     * @param counts - the counts (varargs of type int)\n     * @return count\n     */"
        );
    }

    #[test]
    fn params_inserted_after_documented_predecessor() {
        let out = run(
            sync_params,
            "/**\n     * @param a first\n     *        continued\n     * @param c third\n     */",
            &method("void", &["int a", "int b", "int c"], &[]),
        );
        assert_eq!(
            out,
            "/**\n     * @param a first\n     *        continued\n     * @param b - the b (int)\n     * @param c third\n     */"
        );
    }

    #[test]
    fn stale_params_removed_and_parentheses_unwrapped() {
        let out = run(
            sync_params,
            "/**\n     * @param (list)\n     * @param gone no longer here\n     *    at all\n     * @param <T> element type\n     */",
            &method("void", &["List<T> list"], &[]),
        );
        assert_eq!(
            out,
            "/**\n     * @param list - the list (List<T>)\n     * @param <T> element type\n     */"
        );
    }

    #[test]
    fn single_line_block_expands_with_unit_newline() {
        let doc = DocLines::parse("/** Size. */", "    ", "\r\n");
        assert_eq!(doc.render(), "/**\r\n     * Size.\r\n     */");
    }

    #[test]
    fn compact_varargs_keep_their_tag() {
        let block = "/**\n     * @param args the arguments\n     */";
        for declared in ["String...args", "String ...args", "String... args"] {
            assert_eq!(
                run(sync_params, block, &method("void", &[declared], &[])),
                block,
                "declared as {}",
                declared
            );
        }
    }

    #[test]
    fn unsplittable_parameter_removes_nothing() {
        let block = "/**\n     * @param other the other\n     */";
        let out = run(sync_params, block, &method("void", &["int value", "Map<K, V>"], &[]));
        assert_eq!(
            out,
            "/**\n     * @param value - the value (int)\n     * @param other the other\n     */"
        );
    }

    #[test]
    fn mid_line_return_counts_as_present() {
        let out = run(sync_return, "/** Doc @return */", &method("int", &[], &[]));
        assert_eq!(out, "/**\n     * Doc @return\n     */");
    }

    #[test]
    fn rules_are_idempotent() {
        let sig = method("Set<String>", &["List<String> strings"], &["IOException"]);
        let mut doc = DocLines::parse("/** Reads. */", "  ", "\n");
        for rule in TAG_RULES {
            (rule.apply)(&mut doc, &sig);
        }
        let once = doc.render();
        let mut again = DocLines::parse(&once, "  ", "\n");
        for rule in TAG_RULES {
            (rule.apply)(&mut again, &sig);
        }
        assert_eq!(again.render(), once);
        assert_eq!(
            once,
            "/**\n   * Reads.\n   * @param strings - the strings (List<String>)\n   * @return Set<String>\n   * @throws IOException - exception\n   */"
        );
    }
}
