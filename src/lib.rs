//! javadoc-fixer: repair javadoc blocks so their tags and markup match the
//! declarations they document.
//!
//! The engine is a pipeline over one source unit:
//!
//! - [`parser`] locates `/** ... */` blocks, classifies the declaration
//!   after each one and splits callable signatures.
//! - [`rewrite`] syncs `@param`/`@throws`/`@return` against the signature
//!   and then repairs markup that javadoc would reject.
//! - [`unit`] splices the rewritten blocks back into the unit.
//!
//! ```
//! let outcome = javadoc_fixer::process("/** a & b */\nint x;\n");
//! assert!(outcome.changed);
//! assert_eq!(outcome.result, "/** a and b */\nint x;\n");
//! ```

pub mod discover;
pub mod model;
pub mod parser;
pub mod progress;
pub mod rewrite;
pub mod unit;

pub use rewrite::FixOptions;
pub use unit::{process, Fixer, Outcome};
