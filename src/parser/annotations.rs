//! Removal of annotations from declaration text.
//!
//! Runs on declaration text only, never on comment prose, so that
//! `@Override`, `@Nullable` or `@SuppressWarnings("unchecked")` cannot show
//! up as a fake return type or parameter.

/// Remove `@Name` and `@Name(args)` markers together with the whitespace
/// that follows them.
///
/// The `@interface` keyword of annotation type declarations is kept.
pub fn strip_annotations(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let starts_annotation = c == '@'
            && chars.get(i + 1).is_some_and(|n| n.is_alphabetic() || *n == '_')
            && !(i > 0 && is_word_char(chars[i - 1]));

        if !starts_annotation || keyword_at(&chars, i + 1, "interface") {
            out.push(c);
            i += 1;
            continue;
        }

        // qualified name
        let mut j = i + 1;
        while j < chars.len() && (is_word_char(chars[j]) || chars[j] == '.') {
            j += 1;
        }
        if chars.get(j) == Some(&'(') {
            j = skip_arguments(&chars, j);
        }
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }
        i = j;
    }

    out
}

/// Replace line breaks with single spaces.
pub fn join_lines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn keyword_at(chars: &[char], at: usize, keyword: &str) -> bool {
    let len = keyword.chars().count();
    let matches = chars.len() >= at + len
        && chars[at..at + len].iter().copied().eq(keyword.chars());
    matches && !chars.get(at + len).copied().is_some_and(is_word_char)
}

/// Skip a parenthesized argument list starting at `open`, honoring nesting
/// and string literals. Returns the index after the closing parenthesis, or
/// the end of input when it never closes.
fn skip_arguments(chars: &[char], open: usize) -> usize {
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut i = open;

    while i < chars.len() {
        let c = chars[i];
        match in_string {
            Some(quote) => {
                if c == '\\' {
                    i += 1;
                } else if c == quote {
                    in_string = None;
                }
            }
            None => match c {
                '"' | '\'' => in_string = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return i + 1;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    chars.len()
}
