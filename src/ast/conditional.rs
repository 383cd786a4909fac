//! Conditional declaration input model
//!
//! A `DeclarationConditional` is an `if` or `while` statement whose test position
//! holds a single `let`/`const` declaration, e.g. `if (let m = re.exec(s)) { ... }`.
//! The host hands it over already parsed; this module only checks the binding shape.

use crate::error::{Error, Result};
use oxc_ast::ast::{
    BindingPattern, BindingPatternKind, Expression, LabelIdentifier, Statement,
    VariableDeclaration, VariableDeclarationKind,
};
use oxc_span::{Atom, GetSpan, Span};
use serde::{Deserialize, Serialize};

/// Statement form of the conditional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalKind {
    If,
    While,
}

/// Where the conditional sits in the host program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnclosingContext {
    /// Ordinary statement position; the completion value is discarded
    #[default]
    Statement,
    /// Last statement of a script, `eval` body or REPL input whose value is inspected
    CompletionValue,
}

/// Declaration keyword accepted in test position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Let,
    Const,
}

impl BindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BindingKind::Let => "let",
            BindingKind::Const => "const",
        }
    }

    pub fn declaration_kind(self) -> VariableDeclarationKind {
        match self {
            BindingKind::Let => VariableDeclarationKind::Let,
            BindingKind::Const => VariableDeclarationKind::Const,
        }
    }
}

/// An `if (let x = ...)` / `while (let x = ...)` node as produced by the host
#[derive(Debug)]
pub struct DeclarationConditional<'a> {
    pub span: Span,
    pub kind: ConditionalKind,
    /// Label written on the statement (`outer: while (let ...)`)
    pub label: Option<LabelIdentifier<'a>>,
    /// The declaration in test position, exactly as written
    pub declaration: VariableDeclaration<'a>,
    /// Then branch, or loop body
    pub consequent: Statement<'a>,
    /// Else branch; only meaningful for `if`
    pub alternate: Option<Statement<'a>>,
    pub context: EnclosingContext,
}

/// Validated view of the single binding in test position
#[derive(Debug, Clone, Copy)]
pub struct Binding<'n, 'a> {
    pub kind: BindingKind,
    pub name: Atom<'a>,
    pub span: Span,
    pub init: &'n Expression<'a>,
}

impl<'a> DeclarationConditional<'a> {
    /// Extract the single identifier binding, rejecting patterns and multi-binding
    pub fn binding(&self) -> Result<Binding<'_, 'a>> {
        let decl = &self.declaration;

        let kind = match decl.kind {
            VariableDeclarationKind::Let => BindingKind::Let,
            VariableDeclarationKind::Const => BindingKind::Const,
            other => {
                return Err(Error::invalid_binding(
                    format!("`{}` is not allowed in a condition", other.as_str()),
                    decl.span,
                ))
            }
        };

        let declarator = match &decl.declarations[..] {
            [single] => single,
            [] => return Err(Error::invalid_binding("empty declaration", decl.span)),
            [_, second, ..] => {
                return Err(Error::invalid_binding(
                    format!(
                        "{} names declared, a condition binds exactly one",
                        decl.declarations.len()
                    ),
                    second.span,
                ))
            }
        };

        let identifier = match &declarator.id.kind {
            BindingPatternKind::BindingIdentifier(id) => id,
            _ => {
                return Err(Error::invalid_binding(
                    "destructuring patterns are not supported in a condition",
                    declarator.id.span(),
                ))
            }
        };

        let init = declarator.init.as_ref().ok_or_else(|| {
            Error::invalid_binding(
                format!("`{}` has no initializer", identifier.name),
                declarator.span,
            )
        })?;

        Ok(Binding {
            kind,
            name: identifier.name,
            span: identifier.span,
            init,
        })
    }
}

/// Whether a binding pattern introduces `name`, looking through destructuring
pub fn pattern_binds(pattern: &BindingPattern<'_>, name: &str) -> bool {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => id.name.as_str() == name,
        BindingPatternKind::ObjectPattern(object) => {
            object
                .properties
                .iter()
                .any(|property| pattern_binds(&property.value, name))
                || object
                    .rest
                    .as_ref()
                    .is_some_and(|rest| pattern_binds(&rest.argument, name))
        }
        BindingPatternKind::ArrayPattern(array) => {
            array
                .elements
                .iter()
                .flatten()
                .any(|element| pattern_binds(element, name))
                || array
                    .rest
                    .as_ref()
                    .is_some_and(|rest| pattern_binds(&rest.argument, name))
        }
        BindingPatternKind::AssignmentPattern(assignment) => pattern_binds(&assignment.left, name),
    }
}

/// Whether a statement list declares `name` in its own scope
///
/// `var` declarations only count when `include_var` is set, i.e. at function level.
pub fn statements_declare(statements: &[Statement<'_>], name: &str, include_var: bool) -> bool {
    statements.iter().any(|stmt| match stmt {
        Statement::VariableDeclaration(decl) => {
            (include_var || decl.kind != VariableDeclarationKind::Var)
                && decl
                    .declarations
                    .iter()
                    .any(|declarator| pattern_binds(&declarator.id, name))
        }
        Statement::FunctionDeclaration(func) => {
            func.id.as_ref().is_some_and(|id| id.name.as_str() == name)
        }
        Statement::ClassDeclaration(class) => {
            class.id.as_ref().is_some_and(|id| id.name.as_str() == name)
        }
        _ => false,
    })
}

/// Whether a statement list creates any binding scoped to its own block
///
/// `let`, `const`, `using`, classes and function declarations all count; `var`
/// does not, since it is hoisted out of the block.
pub fn has_block_scoped_declarations(statements: &[Statement<'_>]) -> bool {
    statements.iter().any(|stmt| match stmt {
        Statement::VariableDeclaration(decl) => decl.kind != VariableDeclarationKind::Var,
        Statement::FunctionDeclaration(_) | Statement::ClassDeclaration(_) => true,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_ast::AstBuilder;
    use oxc_span::SPAN;

    fn declaration<'a>(
        ast: &AstBuilder<'a>,
        kind: VariableDeclarationKind,
        names: &[&str],
        with_init: bool,
    ) -> VariableDeclaration<'a> {
        let mut declarators = ast.vec();
        for name in names {
            let pattern = ast.binding_pattern(
                ast.binding_pattern_kind_binding_identifier(SPAN, ast.atom(name)),
                None::<oxc_ast::ast::TSTypeAnnotation>,
                false,
            );
            let init = with_init.then(|| ast.expression_identifier(SPAN, "value"));
            declarators.push(ast.variable_declarator(SPAN, kind, pattern, init, false));
        }
        ast.variable_declaration(SPAN, kind, declarators, false)
    }

    fn conditional<'a>(
        ast: &AstBuilder<'a>,
        declaration: VariableDeclaration<'a>,
    ) -> DeclarationConditional<'a> {
        DeclarationConditional {
            span: SPAN,
            kind: ConditionalKind::If,
            label: None,
            declaration,
            consequent: ast.statement_empty(SPAN),
            alternate: None,
            context: EnclosingContext::Statement,
        }
    }

    #[test]
    fn test_single_let_binding() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let cond = conditional(
            &ast,
            declaration(&ast, VariableDeclarationKind::Let, &["x"], true),
        );

        let binding = cond.binding().unwrap();
        assert_eq!(binding.kind, BindingKind::Let);
        assert_eq!(binding.name.as_str(), "x");
        assert!(matches!(binding.init, Expression::Identifier(_)));
    }

    #[test]
    fn test_var_is_rejected() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let cond = conditional(
            &ast,
            declaration(&ast, VariableDeclarationKind::Var, &["x"], true),
        );

        assert!(matches!(cond.binding(), Err(Error::InvalidBinding { .. })));
    }

    #[test]
    fn test_two_declarators_are_rejected() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let cond = conditional(
            &ast,
            declaration(&ast, VariableDeclarationKind::Const, &["x", "y"], true),
        );

        let err = cond.binding().unwrap_err();
        assert!(err.to_string().contains("2 names declared"));
    }

    #[test]
    fn test_missing_initializer_is_rejected() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let cond = conditional(
            &ast,
            declaration(&ast, VariableDeclarationKind::Let, &["x"], false),
        );

        assert!(matches!(cond.binding(), Err(Error::InvalidBinding { .. })));
    }

    #[test]
    fn test_binding_kind_round_trips_to_declaration_kind() {
        assert_eq!(
            BindingKind::Const.declaration_kind(),
            VariableDeclarationKind::Const
        );
        assert_eq!(BindingKind::Let.declaration_kind(), VariableDeclarationKind::Let);
    }

    #[test]
    fn test_block_scoped_declarations() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let var_only = [Statement::VariableDeclaration(ast.alloc(declaration(
            &ast,
            VariableDeclarationKind::Var,
            &["total"],
            true,
        )))];
        assert!(!has_block_scoped_declarations(&var_only));
        assert!(!has_block_scoped_declarations(&[ast.statement_empty(SPAN)]));

        for kind in [VariableDeclarationKind::Let, VariableDeclarationKind::Const] {
            let stmts = [Statement::VariableDeclaration(
                ast.alloc(declaration(&ast, kind, &["y"], true)),
            )];
            assert!(has_block_scoped_declarations(&stmts));
            assert!(!statements_declare(&stmts, "x", true));
        }
    }
}
