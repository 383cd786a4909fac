//! Conditional declaration transformer
//!
//! Rewrites `if (let x = e) A else B` into `{ let x = e; if (x) A else B }` and
//! `while (let x = e) S` into `{ while (true) { let x = e; if (!x) break; S } }`.
//! Only blocks are introduced, never a function, so control transfers inside the
//! branches keep their original targets and the initializer is evaluated once
//! per test.

use crate::ast::conditional::{
    has_block_scoped_declarations, statements_declare, Binding, BindingKind, ConditionalKind,
    DeclarationConditional, EnclosingContext,
};
use crate::ast::const_assignment::find_assignment;
use crate::ast::control_transfer::{collect_exit_signals, ExitSignal};
use crate::ast::statement_builder::StatementBuilder;
use crate::error::{source_span, Error, Result};
use oxc_allocator::{CloneIn, Vec as ArenaVec};
use oxc_ast::{ast::Statement, AstBuilder as OxcAstBuilder};
use serde::{Deserialize, Serialize};

/// Knobs for the shape of the emitted tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Wrap the synthetic `while (true)` in its own block
    pub wrap_loop_in_block: bool,
    /// Inline the statements of a block loop body after the guard
    pub splice_loop_body: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            wrap_loop_in_block: true,
            splice_loop_body: true,
        }
    }
}

/// Standard-syntax replacement for a conditional declaration
#[derive(Debug)]
pub struct TransformResult<'a> {
    pub statement: Statement<'a>,
}

impl<'a> TransformResult<'a> {
    pub fn into_statement(self) -> Statement<'a> {
        self.statement
    }
}

/// Desugars `if`/`while` statements with a declaration in test position
pub struct ConditionalDeclarationTransformer<'a> {
    ast_builder: &'a OxcAstBuilder<'a>,
    options: TransformOptions,
}

impl<'a> ConditionalDeclarationTransformer<'a> {
    /// Create a transformer with default options
    pub fn new(ast_builder: &'a OxcAstBuilder<'a>) -> Self {
        Self::with_options(ast_builder, TransformOptions::default())
    }

    /// Create a transformer with explicit options
    pub fn with_options(ast_builder: &'a OxcAstBuilder<'a>, options: TransformOptions) -> Self {
        Self {
            ast_builder,
            options,
        }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Transform a conditional declaration into standard syntax
    ///
    /// The input is only read; the result is a fresh tree in the builder's arena.
    /// All checks run before anything is allocated, so an error never comes
    /// with partial output.
    pub fn transform(
        &self,
        conditional: &DeclarationConditional<'a>,
    ) -> Result<TransformResult<'a>> {
        let binding = self.validate(conditional)?;

        log::debug!(
            "Desugaring {:?} with {} binding `{}`",
            conditional.kind,
            binding.kind.as_str(),
            binding.name
        );

        let statement = match conditional.kind {
            ConditionalKind::If => self.desugar_if(conditional, &binding),
            ConditionalKind::While => self.desugar_while(conditional, &binding),
        };

        Ok(TransformResult { statement })
    }

    /// Run every structural check, returning the validated binding
    fn validate<'n>(&self, conditional: &'n DeclarationConditional<'a>) -> Result<Binding<'n, 'a>> {
        let binding = conditional.binding()?;

        if conditional.kind == ConditionalKind::While {
            if let Some(alternate) = &conditional.alternate {
                return Err(Error::malformed(
                    "a while loop cannot have an else branch",
                    oxc_span::GetSpan::span(alternate),
                ));
            }
        }

        if conditional.context == EnclosingContext::CompletionValue {
            return Err(Error::UnsupportedContext {
                span: source_span(conditional.span),
            });
        }

        if binding.kind == BindingKind::Const {
            for branch in self.branches(conditional) {
                if let Some(span) = find_assignment(branch, binding.name.as_str()) {
                    return Err(Error::ConstReassignment {
                        name: binding.name.to_string(),
                        span: source_span(span),
                    });
                }
            }
        }

        self.check_exit_signals(conditional)?;

        Ok(binding)
    }

    fn branches<'n>(
        &self,
        conditional: &'n DeclarationConditional<'a>,
    ) -> impl Iterator<Item = &'n Statement<'a>> {
        std::iter::once(&conditional.consequent).chain(conditional.alternate.as_ref())
    }

    /// Check that escaping transfers can keep their target once wrapped in a block
    fn check_exit_signals(&self, conditional: &DeclarationConditional<'a>) -> Result<()> {
        let own_label = conditional.label.as_ref().map(|label| label.name);

        for branch in self.branches(conditional) {
            let signals = collect_exit_signals(branch);
            for signal in &signals {
                if conditional.kind == ConditionalKind::If {
                    if let ExitSignal::Continue {
                        label: Some(label),
                        span,
                    } = signal
                    {
                        if Some(*label) == own_label {
                            return Err(Error::malformed(
                                format!("cannot continue `{}`, it labels an if statement", label),
                                *span,
                            ));
                        }
                    }
                }
            }

            let passthrough = signals
                .iter()
                .filter(|signal| signal.targets_innermost_loop())
                .count();
            log::trace!(
                "Branch exits: {:?} ({} unlabeled transfer(s) keep the innermost loop)",
                signals,
                passthrough
            );
        }

        Ok(())
    }

    /// `{ let x = e; if (x) A else B }`
    fn desugar_if(
        &self,
        conditional: &DeclarationConditional<'a>,
        binding: &Binding<'_, 'a>,
    ) -> Statement<'a> {
        let builder = StatementBuilder::new(self.ast_builder);
        let allocator = self.ast_builder.allocator;

        let declaration = builder.create_binding_declaration(
            binding.kind,
            binding.name,
            binding.span,
            binding.init.clone_in(allocator),
        );
        let test = builder.create_identifier(binding.span, binding.name);
        let if_stmt = self.ast_builder.statement_if(
            conditional.span,
            test,
            conditional.consequent.clone_in(allocator),
            conditional
                .alternate
                .as_ref()
                .map(|alternate| alternate.clone_in(allocator)),
        );

        let mut body = self.ast_builder.vec_with_capacity(2);
        body.push(declaration);
        body.push(if_stmt);
        let block = builder.create_block_statement(conditional.span, body);

        builder.label_statement(conditional.label.clone_in(allocator), block)
    }

    /// `{ while (true) { let x = e; if (!x) break; S } }`
    fn desugar_while(
        &self,
        conditional: &DeclarationConditional<'a>,
        binding: &Binding<'_, 'a>,
    ) -> Statement<'a> {
        let builder = StatementBuilder::new(self.ast_builder);
        let allocator = self.ast_builder.allocator;

        let mut body = self.ast_builder.vec();
        body.push(builder.create_binding_declaration(
            binding.kind,
            binding.name,
            binding.span,
            binding.init.clone_in(allocator),
        ));
        body.push(builder.create_loop_guard(binding.name, binding.span));
        self.append_loop_body(&mut body, &conditional.consequent, binding);

        let loop_stmt = builder.create_infinite_loop(conditional.span, body);
        let loop_stmt = builder.label_statement(conditional.label.clone_in(allocator), loop_stmt);

        if self.options.wrap_loop_in_block {
            builder.create_block_statement(conditional.span, self.ast_builder.vec1(loop_stmt))
        } else {
            loop_stmt
        }
    }

    /// Whether the body's statements can share a block with the re-homed declaration
    ///
    /// The initializer is evaluated in the loop's enclosing scope, so any name the
    /// body declares for its own block must stay out of the initializer's block.
    fn can_splice(&self, statements: &[Statement<'a>], binding: &Binding<'_, 'a>) -> bool {
        !has_block_scoped_declarations(statements)
            && !statements_declare(statements, binding.name.as_str(), true)
    }

    fn append_loop_body(
        &self,
        body: &mut ArenaVec<'a, Statement<'a>>,
        original: &Statement<'a>,
        binding: &Binding<'_, 'a>,
    ) {
        let allocator = self.ast_builder.allocator;
        match original {
            Statement::BlockStatement(block)
                if self.options.splice_loop_body && self.can_splice(&block.body, binding) =>
            {
                log::trace!("Splicing {} loop body statement(s)", block.body.len());
                for stmt in block.body.iter() {
                    body.push(stmt.clone_in(allocator));
                }
            }
            Statement::EmptyStatement(_) => {}
            other => {
                log::trace!("Keeping loop body nested");
                body.push(other.clone_in(allocator));
            }
        }
    }
}
