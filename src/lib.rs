//! condlet-rs: desugaring of declarations in `if`/`while` conditions
//!
//! This library rewrites the proposed `if (let x = e) { ... }` and
//! `while (let x = e) { ... }` forms into standard JavaScript over the oxc AST,
//! wrapping only in blocks so evaluation order, scoping and control transfers
//! are preserved.

pub mod ast;
pub mod batch;
pub mod cli;
pub mod error;
pub mod host;
pub mod transformer;

pub use error::{Error as CondletError, Result as CondletResult};
pub use transformer::{ConditionalDeclarationTransformer, TransformOptions, TransformResult};

// Re-export commonly used types
pub use ast::{ConditionalKind, DeclarationConditional, EnclosingContext};
pub use host::{parse_conditional, print_statement, transform_source, ConditionalSource};
