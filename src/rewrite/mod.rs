//! Comment rewriting: entity-aware tag sync followed by syntax repairs.

pub mod spans;
pub mod syntax;
pub mod tags;

use crate::model::DocumentedEntity;
use crate::parser::signature::parse_signature;
use std::collections::BTreeSet;
use tags::{DocLines, TAG_RULES};
use tracing::trace;

/// Which rewrite rules run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOptions {
    /// Rule names to skip (see [`rule_names`]).
    pub disabled_rules: BTreeSet<String>,
    /// Run the entity-aware rules at all.
    pub sync_tags: bool,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            disabled_rules: BTreeSet::new(),
            sync_tags: true,
        }
    }
}

impl FixOptions {
    pub fn is_enabled(&self, rule: &str) -> bool {
        !self.disabled_rules.contains(rule)
    }
}

/// A named syntax rule.
pub struct SyntaxRule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// Syntax rules in application order.
pub const SYNTAX_RULES: &[SyntaxRule] = &[
    SyntaxRule {
        name: "incomplete-escapes",
        apply: syntax::fix_incomplete_escapes,
    },
    SyntaxRule {
        name: "comparison-symbols",
        apply: syntax::fix_comparison_symbols,
    },
    SyntaxRule {
        name: "ampersands",
        apply: syntax::fix_ampersands,
    },
    SyntaxRule {
        name: "generic-prose",
        apply: syntax::fix_generics,
    },
    SyntaxRule {
        name: "empty-tags",
        apply: syntax::fix_empty_tags,
    },
    SyntaxRule {
        name: "invented-tags",
        apply: syntax::fix_invented_tags,
    },
];

/// Every rule name, entity-aware first.
pub fn rule_names() -> impl Iterator<Item = &'static str> {
    TAG_RULES
        .iter()
        .map(|r| r.name)
        .chain(SYNTAX_RULES.iter().map(|r| r.name))
}

/// Rewrite one documentation block.
///
/// `indent` is the whitespace before the block's opening delimiter and
/// `newline` the unit's line terminator; both shape the lines the
/// entity-aware rules insert.
pub fn rewrite_block(
    block: &str,
    indent: &str,
    newline: &'static str,
    entity: Option<&DocumentedEntity>,
    options: &FixOptions,
) -> String {
    let mut text = block.to_string();

    if options.sync_tags {
        if let Some(signature) = entity.and_then(parse_signature) {
            let mut doc = DocLines::parse(&text, indent, newline);
            let untouched = doc.render();
            let mut current = untouched.clone();
            for rule in TAG_RULES.iter().filter(|r| options.is_enabled(r.name)) {
                (rule.apply)(&mut doc, &signature);
                let next = doc.render();
                if next != current {
                    trace!(rule = rule.name, "rule changed block");
                    current = next;
                }
            }
            if current != untouched {
                text = current;
            }
        }
    }

    for rule in SYNTAX_RULES.iter().filter(|r| options.is_enabled(r.name)) {
        let next = (rule.apply)(&text);
        if next != text {
            trace!(rule = rule.name, "rule changed block");
            text = next;
        }
    }

    text
}
