//! Generic-aware token recombination.
//!
//! Declarations are tokenized with plain splits on whitespace or commas,
//! which cuts through type arguments like `Map<String, String>`. These
//! helpers glue the pieces back together so that every emitted token has
//! balanced angle brackets.

/// The separator a token list was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Whitespace,
    Comma,
}

impl Delimiter {
    fn rejoin(self, head: &str, next: &str) -> String {
        match self {
            Delimiter::Whitespace => format!("{} {}", head, next),
            Delimiter::Comma => format!("{}, {}", head, next.trim_start()),
        }
    }
}

/// Net angle-bracket depth of a token: `<` opens, `>` closes.
pub fn bracket_depth(token: &str) -> i32 {
    token.chars().fold(0, |depth, c| match c {
        '<' => depth + 1,
        '>' => depth - 1,
        _ => depth,
    })
}

/// Re-join tokens that were split inside an open `<...>` nesting.
///
/// A token whose depth stays positive swallows the next one until the
/// depth returns to zero. If the input ends while still unbalanced, the
/// accumulated remainder is emitted as a single token.
pub fn complete_generics<S: AsRef<str>>(tokens: &[S], delimiter: Delimiter) -> Vec<String> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut pending: Option<String> = None;

    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let current = match pending.take() {
            Some(head) => delimiter.rejoin(&head, token),
            None => token.to_string(),
        };

        if bracket_depth(&current) > 0 && i + 1 < tokens.len() {
            pending = Some(current);
            continue;
        }
        result.push(current);
    }

    result
}

/// Split on whitespace, keeping generic type arguments intact.
pub fn split_whitespace_balanced(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    complete_generics(&tokens, Delimiter::Whitespace)
}

/// Split on commas that are not nested inside `<...>`.
pub fn split_commas_balanced(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = text.split(',').collect();
    complete_generics(&tokens, Delimiter::Comma)
}
