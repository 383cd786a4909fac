//! Detection of writes to a `const` condition binding
//!
//! `if (const x = f()) { x = 1; }` is rejected before any output is built.
//! Scopes that redeclare the name are skipped: writes there target the inner binding.
//! That covers blocks, functions and arrows, catch clauses, loop heads, `switch`
//! bodies, classes named after the binding and class static blocks.

use crate::ast::conditional::{pattern_binds, statements_declare};
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::Span;
use oxc_syntax::scope::ScopeFlags;

/// Visitor looking for the first write to `name`
pub struct ConstAssignmentFinder<'n> {
    name: &'n str,
    found: Option<Span>,
}

impl<'n> ConstAssignmentFinder<'n> {
    pub fn new(name: &'n str) -> Self {
        Self { name, found: None }
    }

    /// Span of the first assignment to the binding inside `stmt`
    pub fn find<'a>(mut self, stmt: &Statement<'a>) -> Option<Span> {
        self.visit_statement(stmt);
        self.found
    }

    fn declares_lexically(&self, decl: &VariableDeclaration<'_>) -> bool {
        decl.kind != VariableDeclarationKind::Var
            && decl
                .declarations
                .iter()
                .any(|declarator| pattern_binds(&declarator.id, self.name))
    }

    fn params_bind(&self, params: &FormalParameters<'_>) -> bool {
        params
            .items
            .iter()
            .any(|param| pattern_binds(&param.pattern, self.name))
            || params
                .rest
                .as_ref()
                .is_some_and(|rest| pattern_binds(&rest.argument, self.name))
    }
}

impl<'a> Visit<'a> for ConstAssignmentFinder<'_> {
    fn visit_simple_assignment_target(&mut self, it: &SimpleAssignmentTarget<'a>) {
        if let SimpleAssignmentTarget::AssignmentTargetIdentifier(ident) = it {
            if self.found.is_none() && ident.name.as_str() == self.name {
                self.found = Some(ident.span);
            }
        }
        walk::walk_simple_assignment_target(self, it);
    }

    /// Shorthand object targets: `({ x } = obj)`, `({ x = 1 } = obj)`
    fn visit_assignment_target_property_identifier(
        &mut self,
        it: &AssignmentTargetPropertyIdentifier<'a>,
    ) {
        if self.found.is_none() && it.binding.name.as_str() == self.name {
            self.found = Some(it.binding.span);
        }
        walk::walk_assignment_target_property_identifier(self, it);
    }

    fn visit_block_statement(&mut self, it: &BlockStatement<'a>) {
        if !statements_declare(&it.body, self.name, false) {
            walk::walk_block_statement(self, it);
        }
    }

    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        let shadowed = it.id.as_ref().is_some_and(|id| id.name.as_str() == self.name)
            || self.params_bind(&it.params)
            || it
                .body
                .as_ref()
                .is_some_and(|body| statements_declare(&body.statements, self.name, true));
        if !shadowed {
            walk::walk_function(self, it, flags);
        }
    }

    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        let shadowed = self.params_bind(&it.params)
            || statements_declare(&it.body.statements, self.name, true);
        if !shadowed {
            walk::walk_arrow_function_expression(self, it);
        }
    }

    fn visit_class(&mut self, it: &Class<'a>) {
        // A named class binds its own name for the heritage clause and body
        if !it.id.as_ref().is_some_and(|id| id.name.as_str() == self.name) {
            walk::walk_class(self, it);
        }
    }

    fn visit_static_block(&mut self, it: &StaticBlock<'a>) {
        if !statements_declare(&it.body, self.name, true) {
            walk::walk_static_block(self, it);
        }
    }

    fn visit_catch_clause(&mut self, it: &CatchClause<'a>) {
        let shadowed = it
            .param
            .as_ref()
            .is_some_and(|param| pattern_binds(&param.pattern, self.name));
        if !shadowed {
            walk::walk_catch_clause(self, it);
        }
    }

    fn visit_for_statement(&mut self, it: &ForStatement<'a>) {
        if let Some(ForStatementInit::VariableDeclaration(decl)) = &it.init {
            if self.declares_lexically(decl) {
                return;
            }
        }
        walk::walk_for_statement(self, it);
    }

    fn visit_for_in_statement(&mut self, it: &ForInStatement<'a>) {
        if let ForStatementLeft::VariableDeclaration(decl) = &it.left {
            if self.declares_lexically(decl) {
                // The iterated object is evaluated outside the loop scope
                self.visit_expression(&it.right);
                return;
            }
        }
        walk::walk_for_in_statement(self, it);
    }

    fn visit_for_of_statement(&mut self, it: &ForOfStatement<'a>) {
        if let ForStatementLeft::VariableDeclaration(decl) = &it.left {
            if self.declares_lexically(decl) {
                self.visit_expression(&it.right);
                return;
            }
        }
        walk::walk_for_of_statement(self, it);
    }

    fn visit_switch_statement(&mut self, it: &SwitchStatement<'a>) {
        let shadowed = it
            .cases
            .iter()
            .any(|case| statements_declare(&case.consequent, self.name, false));
        if shadowed {
            self.visit_expression(&it.discriminant);
        } else {
            walk::walk_switch_statement(self, it);
        }
    }
}

/// Find the first write to `name` inside `stmt`
pub fn find_assignment(stmt: &Statement<'_>, name: &str) -> Option<Span> {
    ConstAssignmentFinder::new(name).find(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::{Allocator, CloneIn};
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn parse_statement<'a>(allocator: &'a Allocator, source: &str) -> Statement<'a> {
        let text = allocator.alloc_str(source);
        let ret = Parser::new(allocator, text, SourceType::mjs()).parse();
        assert!(ret.errors.is_empty(), "{:?}", ret.errors);
        ret.program.body[0].clone_in(allocator)
    }

    #[test]
    fn test_direct_assignment_is_found() {
        let allocator = Allocator::default();
        let stmt = parse_statement(&allocator, "{ log(x); x = 2; }");
        assert!(find_assignment(&stmt, "x").is_some());
    }

    #[test]
    fn test_update_and_compound_assignment_are_found() {
        let allocator = Allocator::default();
        let stmt = parse_statement(&allocator, "{ x++; }");
        assert!(find_assignment(&stmt, "x").is_some());

        let stmt = parse_statement(&allocator, "{ x += 1; }");
        assert!(find_assignment(&stmt, "x").is_some());
    }

    #[test]
    fn test_destructuring_assignment_is_found() {
        let allocator = Allocator::default();
        let stmt = parse_statement(&allocator, "{ [x] = pair; }");
        assert!(find_assignment(&stmt, "x").is_some());
    }

    #[test]
    fn test_other_names_are_ignored() {
        let allocator = Allocator::default();
        let stmt = parse_statement(&allocator, "{ y = x; obj.x = 1; }");
        assert!(find_assignment(&stmt, "x").is_none());
    }

    #[test]
    fn test_shadowing_scopes_are_skipped() {
        let allocator = Allocator::default();
        let cases = [
            "{ { let x = 1; x = 2; } }",
            "{ function f(x) { x = 2; } }",
            "{ const g = (x) => { x = 2; }; }",
            "{ function f() { var x; x = 2; } }",
            "{ try {} catch (x) { x = 2; } }",
            "{ for (let x = 0; x < 3; x++) {} }",
            "{ for (const [x] of pairs) { use(x); } }",
            "{ class x { reset() { x = null; } } }",
            "{ const C = class x { static { x = 1; } }; }",
            "{ class C { static { let x; x = 2; } } }",
        ];
        for source in cases {
            let stmt = parse_statement(&allocator, source);
            assert!(find_assignment(&stmt, "x").is_none(), "{}", source);
        }
    }

    #[test]
    fn test_closure_writes_to_outer_binding_are_found() {
        let allocator = Allocator::default();
        let stmt = parse_statement(&allocator, "{ run(() => { x = 2; }); }");
        assert!(find_assignment(&stmt, "x").is_some());
    }

    #[test]
    fn test_shorthand_object_targets_are_found() {
        let allocator = Allocator::default();
        let cases = [
            "{ ({ x } = obj); }",
            "{ ({ x = 1 } = obj); }",
            "{ for ({ x } of items); }",
        ];
        for source in cases {
            let stmt = parse_statement(&allocator, source);
            assert!(find_assignment(&stmt, "x").is_some(), "{}", source);
        }

        let stmt = parse_statement(&allocator, "{ ({ x: y } = obj); }");
        assert!(find_assignment(&stmt, "x").is_none());
    }

    #[test]
    fn test_static_block_writes_to_outer_binding_are_found() {
        let allocator = Allocator::default();
        let stmt = parse_statement(&allocator, "{ class C { static { x = 2; } } }");
        assert!(find_assignment(&stmt, "x").is_some());
    }
}
