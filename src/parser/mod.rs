//! Locate blocks, classify what follows them, split signatures.

pub mod annotations;
pub mod entity;
pub mod generics;
pub mod locate;
pub mod signature;

use crate::model::CommentBlock;
use locate::CommentLocator;

/// Locate every documentation block in a unit and pair it with the
/// declaration that follows it.
pub fn comment_blocks(text: &str) -> Vec<CommentBlock> {
    let newline = line_terminator(text);
    CommentLocator::new(text)
        .map(|span| CommentBlock {
            indent: line_indent(text, span.start),
            newline,
            entity: entity::classify(text, span.end),
            span,
        })
        .collect()
}

/// `\r\n` when the unit uses it anywhere, `\n` otherwise.
fn line_terminator(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Leading whitespace of the line containing `pos`.
fn line_indent(text: &str, pos: usize) -> String {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..pos]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}
