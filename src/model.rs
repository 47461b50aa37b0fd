//! Data model for located comments and the declarations they document.

use std::ops::Range;

/// Kind of declaration that follows a documentation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Class,
    Interface,
    Method,
    Constructor,
    Field,
    /// Statements, enum constants, anonymous classes and anything else
    /// that does not look like a conventional declaration.
    Other,
}

impl EntityKind {
    /// Methods and constructors carry a signature worth parsing.
    pub fn is_callable(self) -> bool {
        matches!(self, EntityKind::Method | EntityKind::Constructor)
    }
}

/// One declaration immediately following a comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedEntity {
    pub kind: EntityKind,
    /// Declaration text up to its terminator, annotations and line breaks removed.
    pub raw_text: String,
}

/// Decomposed method or constructor declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallableSignature {
    /// `None` for constructors.
    pub return_type: Option<String>,
    /// "Type name" strings in declaration order.
    pub parameters: Vec<String>,
    /// Names from the `throws` clause in declaration order.
    pub exceptions_thrown: Vec<String>,
}

impl CallableSignature {
    /// True when the declared return type carries no value.
    pub fn returns_void(&self) -> bool {
        self.return_type.as_deref() == Some("void")
    }
}

/// A parameter split into its type and its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
}

impl Parameter {
    /// Split a "Type name" parameter string.
    ///
    /// A leading `final` is dropped, varargs written without spaces
    /// (`String...args`, `String ...args`) are split after the ellipsis, and
    /// C-style array suffixes on the name (`String args[]`) are moved onto the
    /// type. Returns `None` when the string has no separate name token.
    pub fn parse(param: &str) -> Option<Parameter> {
        let param = param.trim();
        let param = param.strip_prefix("final ").unwrap_or(param).trim_start();
        let param = param.replace("...", "... ");
        let (ty, name) = param.rsplit_once(char::is_whitespace)?;
        let mut ty = ty.trim().replace(" ...", "...");
        let mut name = name.trim();
        while let Some(stripped) = name.strip_suffix("[]") {
            ty.push_str("[]");
            name = stripped;
        }
        if ty.is_empty() || !is_identifier(name) {
            return None;
        }
        Some(Parameter {
            ty,
            name: name.to_string(),
        })
    }

    /// Type as rendered in placeholder descriptions.
    pub fn display_type(&self) -> String {
        match self.ty.strip_suffix("...") {
            Some(element) => format!("varargs of type {}", element.trim_end()),
            None => self.ty.clone(),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// A located documentation block `[start, end)` and what follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    pub span: Range<usize>,
    /// Whitespace between the start of the line and the opening delimiter.
    pub indent: String,
    /// Line terminator of the unit the block was found in.
    pub newline: &'static str,
    pub entity: Option<DocumentedEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_simple() {
        let p = Parameter::parse("List<String> strings").unwrap();
        assert_eq!(p.ty, "List<String>");
        assert_eq!(p.name, "strings");
    }

    #[test]
    fn parameter_final_modifier() {
        let p = Parameter::parse("final int count").unwrap();
        assert_eq!(p.ty, "int");
        assert_eq!(p.name, "count");
    }

    #[test]
    fn parameter_array_suffix_moves_to_type() {
        let p = Parameter::parse("String args[]").unwrap();
        assert_eq!(p.ty, "String[]");
        assert_eq!(p.name, "args");
    }

    #[test]
    fn parameter_varargs_display() {
        let p = Parameter::parse("String... values").unwrap();
        assert_eq!(p.display_type(), "varargs of type String");
    }

    #[test]
    fn parameter_varargs_without_spaces() {
        let p = Parameter::parse("String...args").unwrap();
        assert_eq!(p.ty, "String...");
        assert_eq!(p.name, "args");

        let p = Parameter::parse("String ...args").unwrap();
        assert_eq!(p.ty, "String...");
        assert_eq!(p.name, "args");
        assert_eq!(p.display_type(), "varargs of type String");
    }

    #[test]
    fn parameter_without_name() {
        assert!(Parameter::parse("Map<Integer, List<String>>").is_none());
        assert!(Parameter::parse("").is_none());
    }

    #[test]
    fn void_detection() {
        let sig = CallableSignature {
            return_type: Some("void".into()),
            ..Default::default()
        };
        assert!(sig.returns_void());
        assert!(!CallableSignature::default().returns_void());
    }
}
