//! Decomposition of method and constructor declarations.

use crate::model::{CallableSignature, DocumentedEntity, EntityKind};
use crate::parser::generics::{split_commas_balanced, split_whitespace_balanced};

/// Parse the signature of a method or constructor entity.
///
/// Returns `None` for other kinds and for declarations without a
/// parenthesized parameter list.
pub fn parse_signature(entity: &DocumentedEntity) -> Option<CallableSignature> {
    if !entity.kind.is_callable() {
        return None;
    }
    parse_callable(&entity.raw_text, entity.kind == EntityKind::Method)
}

/// Split a declaration into return type, parameters and thrown exceptions.
pub fn parse_callable(decl: &str, has_return_type: bool) -> Option<CallableSignature> {
    let open = decl.find('(')?;
    let close = matching_paren(decl, open)?;

    let return_type = if has_return_type {
        Some(parse_return_type(&decl[..open])?)
    } else {
        None
    };

    Some(CallableSignature {
        return_type,
        parameters: parse_parameters(&decl[open + 1..close]),
        exceptions_thrown: parse_exceptions(&decl[close + 1..]),
    })
}

/// Words that can precede a callable name but never name its return type.
const MODIFIERS: &[&str] = &[
    "public", "protected", "private", "static", "final", "abstract", "synchronized", "native",
    "default", "strictfp",
];

/// The token before the name.
///
/// `None` when there is no such token or it is a modifier, as in a
/// lower-case constructor read as a method.
pub fn parse_return_type(before_params: &str) -> Option<String> {
    let tokens = split_whitespace_balanced(before_params);
    if tokens.len() < 2 {
        return None;
    }
    let candidate = &tokens[tokens.len() - 2];
    if MODIFIERS.contains(&candidate.as_str()) {
        return None;
    }
    Some(candidate.clone())
}

/// Split the text between the parentheses on top-level commas.
pub fn parse_parameters(inner: &str) -> Vec<String> {
    split_commas_balanced(inner)
        .iter()
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Exception names from a `throws` clause, in declaration order.
pub fn parse_exceptions(after_params: &str) -> Vec<String> {
    let cleaned = after_params.replace([',', ')'], " ");
    let mut words = cleaned.split_whitespace();
    match words.next() {
        Some("throws") => words.map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
