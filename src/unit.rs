//! Whole-unit processing: locate every block, rewrite it, splice the results.

use crate::parser::comment_blocks;
use crate::rewrite::{rewrite_block, FixOptions};
use std::ops::Range;
use tracing::debug;

/// Result of processing one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub changed: bool,
    pub result: String,
}

/// Rewrites documentation blocks with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Fixer {
    options: FixOptions,
}

impl Fixer {
    pub fn new(options: FixOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FixOptions {
        &self.options
    }

    /// Rewrite every documentation block in `text`.
    ///
    /// Blocks are located and classified against the original text; the
    /// replacements are collected first and spliced in a single pass.
    pub fn process(&self, text: &str) -> Outcome {
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();

        for block in comment_blocks(text) {
            debug!(
                offset = block.span.start,
                kind = ?block.entity.as_ref().map(|e| e.kind),
                "documentation block"
            );
            let original = &text[block.span.clone()];
            let rewritten = rewrite_block(
                original,
                &block.indent,
                block.newline,
                block.entity.as_ref(),
                &self.options,
            );
            if rewritten != original {
                edits.push((block.span, rewritten));
            }
        }

        if edits.is_empty() {
            return Outcome {
                changed: false,
                result: text.to_string(),
            };
        }

        Outcome {
            changed: true,
            result: apply_edits(text, &edits),
        }
    }
}

/// Splice non-overlapping, ordered edits into `text`.
fn apply_edits(text: &str, edits: &[(Range<usize>, String)]) -> String {
    let grown: usize = edits.iter().map(|(_, r)| r.len()).sum();
    let mut out = String::with_capacity(text.len() + grown);
    let mut last = 0;
    for (span, replacement) in edits {
        out.push_str(&text[last..span.start]);
        out.push_str(replacement);
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Process a unit with every rule enabled.
pub fn process(text: &str) -> Outcome {
    Fixer::default().process(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "package demo;

/**
 * Demo & friends.
 */
public class Demo {

    /**
     * Loads values.
     * @param stale gone
     */
    public Map<String, Integer> load(String path) throws IOException {
        return null;
    }

    /** Counter. */
    private int count;
}
";

    #[test]
    fn rewrites_blocks_in_place() {
        let outcome = process(SAMPLE);
        assert!(outcome.changed);
        let expected = "package demo;

/**
 * Demo and friends.
 */
public class Demo {

    /**
     * Loads values.
     * @param path - the path (String)
     * @return Map (String - key,  Integer - value)
     * @throws IOException - exception
     */
    public Map<String, Integer> load(String path) throws IOException {
        return null;
    }

    /** Counter. */
    private int count;
}
";
        assert_eq!(outcome.result, expected);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let once = process(SAMPLE);
        let twice = process(&once.result);
        assert!(!twice.changed, "second pass changed:\n{}", twice.result);
        assert_eq!(twice.result, once.result);
    }

    #[test]
    fn unit_without_blocks_unchanged() {
        let text = "class A { int x = a > b ? 1 : 2; }\n";
        let outcome = process(text);
        assert!(!outcome.changed);
        assert_eq!(outcome.result, text);
    }

    #[test]
    fn unterminated_block_left_alone() {
        let text = "/** a & b\nclass A {}\n";
        assert_eq!(process(text).result, text);
    }

    #[test]
    fn crlf_units_keep_their_line_endings() {
        let text = "/**\r\n * Size.\r\n */\r\nint size() {\r\n";
        let outcome = process(text);
        assert_eq!(
            outcome.result,
            "/**\r\n * Size.\r\n * @return int\r\n */\r\nint size() {\r\n"
        );
    }

    #[test]
    fn crlf_units_expand_single_line_blocks_with_crlf() {
        let text = "class A {\r\n    /** Size. */\r\n    int size() {\r\n        return 0;\r\n    }\r\n}\r\n";
        let outcome = process(text);
        assert_eq!(
            outcome.result,
            "class A {\r\n    /**\r\n     * Size.\r\n     * @return int\r\n     */\r\n    int size() {\r\n        return 0;\r\n    }\r\n}\r\n"
        );
        assert!(!outcome.result.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn varargs_without_spaces_keep_documentation() {
        for declared in ["String...args", "String ...args"] {
            let text = format!("/**\n * @param args the arguments\n */\nvoid main({}) {{}}\n", declared);
            let outcome = process(&text);
            assert!(!outcome.changed, "declared as {}: {}", declared, outcome.result);
        }
    }

    #[test]
    fn custom_options() {
        let fixer = Fixer::new(FixOptions {
            sync_tags: false,
            ..FixOptions::default()
        });
        let text = "/** Size. */\nint size() {}\n";
        assert!(!fixer.process(text).changed);
        assert!(!fixer.options().sync_tags);
    }
}
