//! Classification of the declaration that follows a documentation block.
//!
//! No syntax tree is built: the declaration is cut at the next `{` or `;`
//! and its shape is matched against a handful of patterns. Anything
//! ambiguous falls through to [`EntityKind::Other`].

use crate::model::{DocumentedEntity, EntityKind};
use crate::parser::annotations::{join_lines, strip_annotations};
use regex::Regex;
use std::sync::LazyLock;

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\s)class\s").unwrap());

static RE_INTERFACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)interface\s").unwrap());

// <modifiers and type pieces> <type> <name>(<params>) <throws/default clause>
static RE_CALLABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(?:[^=(){};"'/*]*\s)?(?P<type>[\w$<>\[\]?.,]+)\s+(?P<name>[A-Za-z_$][\w$]*)"#,
        r"\s*\((?P<params>[^()]*)\)(?P<tail>[^(){};=]*)$"
    ))
    .unwrap()
});

// <modifiers and type pieces> <type> <name> [= initializer without calls]
static RE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[^=(){};"'/*]*\s)?[\w$<>\[\]?.,]+\s+[\w$]+(?:\s*=[^(){};]*)?$"#).unwrap()
});

/// Words that can precede a call but never act as a return type.
const NOT_A_TYPE: &[&str] = &["new", "return", "throw", "else", "case", "yield"];

/// Find and classify the declaration starting at `offset` (just after a
/// block's closing delimiter).
///
/// Returns `None` when neither `{` nor `;` follows.
pub fn classify(text: &str, offset: usize) -> Option<DocumentedEntity> {
    let rest = text.get(offset..)?;
    let end = match (rest.find('{'), rest.find(';')) {
        (None, None) => return None,
        (Some(brace), Some(semi)) if semi < brace => semi,
        (None, Some(semi)) => semi,
        (Some(brace), _) => brace,
    };

    let raw_text = join_lines(&strip_annotations(&rest[..end]))
        .trim()
        .to_string();
    let kind = classify_declaration(&raw_text);
    Some(DocumentedEntity { kind, raw_text })
}

/// Decide the entity kind from cleaned declaration text.
///
/// Constructors are recognized purely by shape: an upper-case name where a
/// method name would be. The enclosing class name is never consulted, so a
/// lower-case constructor reads as a method and an upper-case method reads
/// as a constructor.
pub fn classify_declaration(decl: &str) -> EntityKind {
    if RE_CLASS.is_match(decl) {
        return EntityKind::Class;
    }
    if RE_INTERFACE.is_match(decl) {
        return EntityKind::Interface;
    }

    if let Some(caps) = RE_CALLABLE.captures(decl) {
        let ty = &caps["type"];
        let name = &caps["name"];
        if !NOT_A_TYPE.contains(&ty) {
            let first = name.chars().next().unwrap_or('_');
            if first.is_uppercase() {
                return EntityKind::Constructor;
            }
            return EntityKind::Method;
        }
    }

    if RE_FIELD.is_match(decl) {
        return EntityKind::Field;
    }

    EntityKind::Other
}
