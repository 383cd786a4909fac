//! Fragment host
//!
//! The proposed syntax cannot be parsed by a standard JavaScript parser, so the host
//! receives the conditional already split into fragments (declaration, branches,
//! label) and parses each of them with `oxc_parser` inside one synthetic module:
//!
//! ```text
//! async function* __condlet_host__() {
//! LABEL: while (true) {
//! { DECLARATION }
//! { CONSEQUENT }
//! { ALTERNATE }
//! }
//! }
//! ```
//!
//! The wrapper makes `return`, `break`, `continue`, `await` and `yield` legal in the
//! fragments. All spans, including those in errors, point into that synthetic text.

use crate::ast::conditional::{ConditionalKind, DeclarationConditional, EnclosingContext};
use crate::error::{Error, Result};
use crate::transformer::{ConditionalDeclarationTransformer, TransformOptions};
use oxc_allocator::{Allocator, CloneIn};
use oxc_ast::{
    ast::{BlockStatement, Statement},
    AstBuilder as OxcAstBuilder,
};
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, SPAN};
use serde::{Deserialize, Serialize};

/// Name of the synthetic function wrapping the fragments
pub const HOST_FUNCTION: &str = "__condlet_host__";

/// A conditional declaration described by source fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalSource {
    pub kind: ConditionalKind,
    /// Declaration in test position, e.g. `let m = re.exec(s)`
    pub declaration: String,
    /// Then branch, or loop body
    pub consequent: String,
    #[serde(default)]
    pub alternate: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub context: EnclosingContext,
    #[serde(default)]
    pub options: TransformOptions,
}

impl ConditionalSource {
    /// `if (DECLARATION) CONSEQUENT`
    pub fn new_if(declaration: impl Into<String>, consequent: impl Into<String>) -> Self {
        Self::new(ConditionalKind::If, declaration.into(), consequent.into())
    }

    /// `while (DECLARATION) BODY`
    pub fn new_while(declaration: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(ConditionalKind::While, declaration.into(), body.into())
    }

    fn new(kind: ConditionalKind, declaration: String, consequent: String) -> Self {
        Self {
            kind,
            declaration,
            consequent,
            alternate: None,
            label: None,
            context: EnclosingContext::Statement,
            options: TransformOptions::default(),
        }
    }

    pub fn with_alternate(mut self, alternate: impl Into<String>) -> Self {
        self.alternate = Some(alternate.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_context(mut self, context: EnclosingContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    /// The synthetic module text the fragments are parsed from
    pub fn source_text(&self) -> String {
        let label = self
            .label
            .as_deref()
            .map(|label| format!("{}: ", label))
            .unwrap_or_default();
        format!(
            "async function* {}() {{\n{}while (true) {{\n{{\n{}\n}}\n{{\n{}\n}}\n{{\n{}\n}}\n}}\n}}\n",
            HOST_FUNCTION,
            label,
            self.declaration,
            self.consequent,
            self.alternate.as_deref().unwrap_or_default(),
        )
    }
}

/// Parse the fragments of `source` into a `DeclarationConditional`
pub fn parse_conditional<'a>(
    allocator: &'a Allocator,
    source: &ConditionalSource,
) -> Result<DeclarationConditional<'a>> {
    let source_text = allocator.alloc_str(&source.source_text());
    let ret = Parser::new(allocator, source_text, SourceType::mjs()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Parse { message });
    }

    let host_body = match ret.program.body.first() {
        Some(Statement::FunctionDeclaration(func)) => func.body.as_ref(),
        _ => None,
    }
    .ok_or_else(|| Error::Parse {
        message: "fragments escaped the host function".to_string(),
    })?;

    let (label, loop_stmt) = match host_body.statements.first() {
        Some(Statement::LabeledStatement(labeled)) => (Some(&labeled.label), &labeled.body),
        Some(stmt) => (None, stmt),
        None => {
            return Err(Error::Parse {
                message: "empty host function".to_string(),
            })
        }
    };
    let groups = match loop_stmt {
        Statement::WhileStatement(while_stmt) if host_body.statements.len() == 1 => {
            match &while_stmt.body {
                Statement::BlockStatement(block) => block,
                other => return Err(Error::malformed("unbalanced fragments", other.span())),
            }
        }
        other => return Err(Error::malformed("unbalanced fragments", other.span())),
    };
    let [declaration_group, consequent_group, alternate_group] = group_blocks(groups)?;

    let declaration = match &declaration_group.body[..] {
        [Statement::VariableDeclaration(decl)] => (**decl).clone_in(allocator),
        _ => {
            return Err(Error::malformed(
                "the condition must be a single let or const declaration",
                declaration_group.span,
            ))
        }
    };

    let consequent = single_statement(consequent_group, "branch")?
        .ok_or_else(|| Error::malformed("missing branch", consequent_group.span))?
        .clone_in(allocator);
    let alternate = match &source.alternate {
        Some(_) => Some(
            single_statement(alternate_group, "else branch")?
                .ok_or_else(|| Error::malformed("empty else branch", alternate_group.span))?
                .clone_in(allocator),
        ),
        None => None,
    };

    Ok(DeclarationConditional {
        span: loop_stmt.span(),
        kind: source.kind,
        label: label.map(|label| label.clone_in(allocator)),
        declaration,
        consequent,
        alternate,
        context: source.context,
    })
}

fn group_blocks<'s, 'a>(groups: &'s BlockStatement<'a>) -> Result<[&'s BlockStatement<'a>; 3]> {
    match &groups.body[..] {
        [
            Statement::BlockStatement(a),
            Statement::BlockStatement(b),
            Statement::BlockStatement(c),
        ] => Ok([&**a, &**b, &**c]),
        _ => Err(Error::malformed("unbalanced fragments", groups.span)),
    }
}

fn single_statement<'s, 'a>(
    group: &'s BlockStatement<'a>,
    what: &str,
) -> Result<Option<&'s Statement<'a>>> {
    match &group.body[..] {
        [] => Ok(None),
        [stmt] => Ok(Some(stmt)),
        [_, second, ..] => Err(Error::malformed(
            format!("the {} must be a single statement; wrap it in braces", what),
            second.span(),
        )),
    }
}

/// Print a statement as JavaScript
pub fn print_statement<'a>(ast_builder: &OxcAstBuilder<'a>, statement: &Statement<'a>) -> String {
    let program = ast_builder.program(
        SPAN,
        SourceType::mjs(),
        "",
        ast_builder.vec(),
        None,
        ast_builder.vec(),
        ast_builder.vec1(statement.clone_in(ast_builder.allocator)),
    );
    Codegen::new().build(&program).code
}

/// Parse, desugar and print one conditional in a private arena
pub fn transform_source(source: &ConditionalSource) -> Result<String> {
    let allocator = Allocator::default();
    let ast_builder = OxcAstBuilder::new(&allocator);

    let conditional = parse_conditional(&allocator, source)?;
    let transformer =
        ConditionalDeclarationTransformer::with_options(&ast_builder, source.options.clone());
    let result = transformer.transform(&conditional)?;

    Ok(print_statement(&ast_builder, &result.statement))
}

/// Attach the synthetic source text to an error for display
pub fn report(source: &ConditionalSource, error: Error) -> miette::Report {
    miette::Report::new(error).with_source_code(source.source_text())
}
