//! Locating `/** ... */` documentation blocks in source text.
//!
//! The scan runs strictly left to right and never revisits text behind
//! its cursor, so returned blocks never overlap. String and character
//! literals, line comments and plain block comments are stepped over so a
//! `/**` inside them does not open a block.

use std::ops::Range;

pub const OPEN: &str = "/**";
pub const CLOSE: &str = "*/";

/// Iterator over the byte ranges of documentation blocks in a unit.
pub struct CommentLocator<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> CommentLocator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: 0 }
    }
}

impl Iterator for CommentLocator<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        loop {
            let Some(start) = find_open(self.text, self.cursor) else {
                self.cursor = self.text.len();
                return None;
            };
            let body = start + OPEN.len();
            let Some(close) = find_from(self.text, CLOSE, body) else {
                self.cursor = self.text.len();
                return None;
            };

            // An opening delimiter before the close invalidates this one.
            if let Some(reopen) = self.text[body..close].find(OPEN) {
                self.cursor = body + reopen;
                continue;
            }

            let end = close + CLOSE.len();
            self.cursor = end;
            return Some(start..end);
        }
    }
}

fn find_from(text: &str, needle: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(needle).map(|i| i + from)
}

/// Find the next documentation opener at or after `from`, skipping code
/// constructs that may contain delimiter-like text.
fn find_open(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = find_from(text, "\n", i).map_or(bytes.len(), |n| n + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let is_doc = bytes.get(i + 2) == Some(&b'*') && bytes.get(i + 3) != Some(&b'/');
                if is_doc {
                    return Some(i);
                }
                i = find_from(text, CLOSE, i + 2)? + CLOSE.len();
            }
            b'"' if text[i..].starts_with("\"\"\"") => {
                i = find_from(text, "\"\"\"", i + 3)? + 3;
            }
            b'"' | b'\'' => i = skip_literal(bytes, i),
            _ => i += 1,
        }
    }

    None
}

/// Skip a single-line string or character literal opening at `start`.
fn skip_literal(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
