//! Statement builder for creating OXC AST statement nodes
//!
//! This module provides the handful of statements the desugaring emits: the
//! re-homed binding declaration, the loop guard, blocks, labels and `while (true)`.

use crate::ast::conditional::BindingKind;
use oxc_allocator::Vec as ArenaVec;
use oxc_ast::{
    ast::{Expression, LabelIdentifier, Statement, UnaryOperator},
    AstBuilder as OxcAstBuilder,
};
use oxc_span::{Atom, Span, SPAN};

/// Builder for creating OXC AST statement nodes
pub struct StatementBuilder<'a> {
    pub ast_builder: &'a OxcAstBuilder<'a>,
}

impl<'a> StatementBuilder<'a> {
    /// Create a new StatementBuilder with the given AST builder
    pub fn new(ast_builder: &'a OxcAstBuilder<'a>) -> Self {
        Self { ast_builder }
    }

    /// Create a read of the bound name
    pub fn create_identifier(&self, span: Span, name: Atom<'a>) -> Expression<'a> {
        self.ast_builder.expression_identifier(span, name)
    }

    /// Create the binding declaration that replaces the test position
    /// Example: const m = re.exec(s);
    pub fn create_binding_declaration(
        &self,
        kind: BindingKind,
        name: Atom<'a>,
        name_span: Span,
        init: Expression<'a>,
    ) -> Statement<'a> {
        let decl_kind = kind.declaration_kind();
        let binding = self.ast_builder.binding_pattern(
            self.ast_builder
                .binding_pattern_kind_binding_identifier(name_span, name),
            None::<oxc_ast::ast::TSTypeAnnotation>,
            false,
        );
        let declarator =
            self.ast_builder
                .variable_declarator(name_span, decl_kind, binding, Some(init), false);
        let declaration = self.ast_builder.declaration_variable(
            SPAN,
            decl_kind,
            self.ast_builder.vec1(declarator),
            false,
        );
        Statement::from(declaration)
    }

    /// Create the exit test at the top of a desugared loop
    /// Example: if (!line) break;
    pub fn create_loop_guard(&self, name: Atom<'a>, name_span: Span) -> Statement<'a> {
        let test = self.ast_builder.expression_unary(
            SPAN,
            UnaryOperator::LogicalNot,
            self.create_identifier(name_span, name),
        );
        let exit = self.ast_builder.statement_break(SPAN, None);
        self.ast_builder.statement_if(SPAN, test, exit, None)
    }

    /// Create `while (true) { ... }`
    pub fn create_infinite_loop(
        &self,
        span: Span,
        body: ArenaVec<'a, Statement<'a>>,
    ) -> Statement<'a> {
        let test = self.ast_builder.expression_boolean_literal(SPAN, true);
        let body = self.create_block_statement(SPAN, body);
        self.ast_builder.statement_while(span, test, body)
    }

    /// Create a block statement from a vector of statements
    pub fn create_block_statement(
        &self,
        span: Span,
        statements: ArenaVec<'a, Statement<'a>>,
    ) -> Statement<'a> {
        self.ast_builder.statement_block(span, statements)
    }

    /// Attach a label to a statement, or pass it through when there is none
    pub fn label_statement(
        &self,
        label: Option<LabelIdentifier<'a>>,
        body: Statement<'a>,
    ) -> Statement<'a> {
        match label {
            Some(label) => self.ast_builder.statement_labeled(label.span, label, body),
            None => body,
        }
    }
}
