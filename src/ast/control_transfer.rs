//! Control transfers escaping a branch
//!
//! The desugaring only ever wraps branches in blocks, so every `return`, `break`
//! and `continue` keeps its target. This walker lists the transfers that leave a
//! branch so the transformer can check label targets and log what passes through.

use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::{Atom, Span};
use oxc_syntax::scope::ScopeFlags;

/// How a branch can be left
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitSignal<'a> {
    /// Nothing leaves the branch early
    FallThrough,
    Return { span: Span, has_value: bool },
    Break { span: Span, label: Option<Atom<'a>> },
    Continue { span: Span, label: Option<Atom<'a>> },
}

impl<'a> ExitSignal<'a> {
    pub fn label(&self) -> Option<Atom<'a>> {
        match self {
            ExitSignal::Break { label, .. } | ExitSignal::Continue { label, .. } => *label,
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ExitSignal::FallThrough => None,
            ExitSignal::Return { span, .. }
            | ExitSignal::Break { span, .. }
            | ExitSignal::Continue { span, .. } => Some(*span),
        }
    }

    /// Unlabeled break/continue that target the innermost enclosing loop
    pub fn targets_innermost_loop(&self) -> bool {
        matches!(
            self,
            ExitSignal::Break { label: None, .. } | ExitSignal::Continue { label: None, .. }
        )
    }
}

/// Visitor collecting the control transfers that escape a statement
#[derive(Default)]
pub struct ExitSignalCollector<'a> {
    loop_depth: u32,
    breakable_depth: u32,
    inner_labels: Vec<Atom<'a>>,
    signals: Vec<ExitSignal<'a>>,
}

impl<'a> ExitSignalCollector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect escaping transfers of `stmt`; `[FallThrough]` when there are none
    pub fn collect(mut self, stmt: &Statement<'a>) -> Vec<ExitSignal<'a>> {
        self.visit_statement(stmt);
        if self.signals.is_empty() {
            self.signals.push(ExitSignal::FallThrough);
        }
        self.signals
    }

    fn escapes_label(&self, label: &Option<LabelIdentifier<'a>>) -> Option<Option<Atom<'a>>> {
        match label {
            Some(label) if self.inner_labels.contains(&label.name) => None,
            Some(label) => Some(Some(label.name)),
            None => Some(None),
        }
    }

    fn with_loop(&mut self, f: impl FnOnce(&mut Self)) {
        self.loop_depth += 1;
        self.breakable_depth += 1;
        f(self);
        self.loop_depth -= 1;
        self.breakable_depth -= 1;
    }
}

impl<'a> Visit<'a> for ExitSignalCollector<'a> {
    // Transfers never cross a function boundary
    fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

    fn visit_arrow_function_expression(&mut self, _it: &ArrowFunctionExpression<'a>) {}

    fn visit_static_block(&mut self, _it: &StaticBlock<'a>) {}

    fn visit_labeled_statement(&mut self, it: &LabeledStatement<'a>) {
        self.inner_labels.push(it.label.name);
        walk::walk_labeled_statement(self, it);
        self.inner_labels.pop();
    }

    fn visit_while_statement(&mut self, it: &WhileStatement<'a>) {
        self.with_loop(|v| walk::walk_while_statement(v, it));
    }

    fn visit_do_while_statement(&mut self, it: &DoWhileStatement<'a>) {
        self.with_loop(|v| walk::walk_do_while_statement(v, it));
    }

    fn visit_for_statement(&mut self, it: &ForStatement<'a>) {
        self.with_loop(|v| walk::walk_for_statement(v, it));
    }

    fn visit_for_in_statement(&mut self, it: &ForInStatement<'a>) {
        self.with_loop(|v| walk::walk_for_in_statement(v, it));
    }

    fn visit_for_of_statement(&mut self, it: &ForOfStatement<'a>) {
        self.with_loop(|v| walk::walk_for_of_statement(v, it));
    }

    fn visit_switch_statement(&mut self, it: &SwitchStatement<'a>) {
        self.breakable_depth += 1;
        walk::walk_switch_statement(self, it);
        self.breakable_depth -= 1;
    }

    fn visit_return_statement(&mut self, it: &ReturnStatement<'a>) {
        self.signals.push(ExitSignal::Return {
            span: it.span,
            has_value: it.argument.is_some(),
        });
        walk::walk_return_statement(self, it);
    }

    fn visit_break_statement(&mut self, it: &BreakStatement<'a>) {
        match self.escapes_label(&it.label) {
            Some(None) if self.breakable_depth > 0 => {}
            Some(label) => self.signals.push(ExitSignal::Break {
                span: it.span,
                label,
            }),
            None => {}
        }
    }

    fn visit_continue_statement(&mut self, it: &ContinueStatement<'a>) {
        match self.escapes_label(&it.label) {
            Some(None) if self.loop_depth > 0 => {}
            Some(label) => self.signals.push(ExitSignal::Continue {
                span: it.span,
                label,
            }),
            None => {}
        }
    }
}

/// Collect the control transfers that leave `stmt`
pub fn collect_exit_signals<'a>(stmt: &Statement<'a>) -> Vec<ExitSignal<'a>> {
    ExitSignalCollector::new().collect(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::{Allocator, CloneIn};
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    /// Parse `source` as the body of a function and return its first statement
    fn parse_body<'a>(allocator: &'a Allocator, source: &'a str) -> Statement<'a> {
        let text = allocator.alloc_str(&format!("function host() {{ {} }}", source));
        let ret = Parser::new(allocator, text, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty(), "{:?}", ret.errors);
        match &ret.program.body[0] {
            Statement::FunctionDeclaration(func) => func.body.as_ref().unwrap().statements[0]
                .clone_in(allocator),
            _ => panic!("expected a function"),
        }
    }

    #[test]
    fn test_fall_through() {
        let allocator = Allocator::default();
        let stmt = parse_body(&allocator, "{ use(x); }");
        assert_eq!(collect_exit_signals(&stmt), vec![ExitSignal::FallThrough]);
    }

    #[test]
    fn test_return_escapes() {
        let allocator = Allocator::default();
        let stmt = parse_body(&allocator, "{ if (x) return 42; }");
        let signals = collect_exit_signals(&stmt);
        assert_eq!(signals.len(), 1);
        assert!(matches!(signals[0], ExitSignal::Return { has_value: true, .. }));
    }

    #[test]
    fn test_nested_function_is_opaque() {
        let allocator = Allocator::default();
        let stmt = parse_body(&allocator, "{ items.forEach((i) => { return i; }); }");
        assert_eq!(collect_exit_signals(&stmt), vec![ExitSignal::FallThrough]);
    }

    #[test]
    fn test_inner_loop_captures_unlabeled_transfers() {
        let allocator = Allocator::default();
        let stmt = parse_body(
            &allocator,
            "{ for (const i of xs) { if (i) continue; break; } switch (y) { case 1: break; } }",
        );
        assert_eq!(collect_exit_signals(&stmt), vec![ExitSignal::FallThrough]);
    }

    #[test]
    fn test_unlabeled_transfers_escape_at_top_level() {
        let allocator = Allocator::default();
        let stmt = parse_body(&allocator, "while (a) { { if (b) break; continue; } }");
        let body = match &stmt {
            Statement::WhileStatement(w) => w.body.clone_in(&allocator),
            _ => panic!("expected a loop"),
        };
        let signals = collect_exit_signals(&body);
        assert_eq!(signals.len(), 2);
        assert!(signals.iter().all(ExitSignal::targets_innermost_loop));
    }

    #[test]
    fn test_labels_declared_inside_do_not_escape() {
        let allocator = Allocator::default();
        let stmt = parse_body(
            &allocator,
            "outer: for (;;) { inner: { if (a) break inner; if (b) break outer; } }",
        );
        let body = match &stmt {
            Statement::LabeledStatement(l) => match &l.body {
                Statement::ForStatement(f) => f.body.clone_in(&allocator),
                _ => panic!("expected a loop"),
            },
            _ => panic!("expected a label"),
        };
        let signals = collect_exit_signals(&body);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].label().map(|l| l.as_str()), Some("outer"));
    }
}
