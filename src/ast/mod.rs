//! Abstract Syntax Tree (AST) module
//!
//! This module provides the input model and the AST utilities the desugaring is
//! built from:
//!
//! - `conditional`: the `if (let ...)` / `while (let ...)` input node and binding checks
//! - `statement_builder`: construction of the emitted statements
//! - `control_transfer`: escaping `return`/`break`/`continue` analysis
//! - `const_assignment`: writes to a `const` condition binding

pub mod conditional;
pub mod const_assignment;
pub mod control_transfer;
pub mod statement_builder;

// Re-export the main types for public API
pub use conditional::{
    Binding, BindingKind, ConditionalKind, DeclarationConditional, EnclosingContext,
};
pub use const_assignment::{find_assignment, ConstAssignmentFinder};
pub use control_transfer::{collect_exit_signals, ExitSignal, ExitSignalCollector};
pub use statement_builder::StatementBuilder;
