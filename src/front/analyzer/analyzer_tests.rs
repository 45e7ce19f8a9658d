#![cfg(test)]

use crate::driver::{self, Outcome};
use crate::front::analyzer;
use crate::front::ast::Ast;
use crate::front::diag::Reporter;
use crate::front::parser;
use crate::front::sym::{Builtin, SymTable};
use crate::front::types::Type;

fn compile(src: &str) -> Outcome {
    driver::compile(src)
}

fn int(out: &Outcome) -> Type {
    Type::basic(&out.tab, Builtin::Int)
}

/// The `dt` of the n-th top-level declaration's (sole) declarator.
fn init_dt(out: &Outcome, n: usize) -> Type {
    out.module.children[n].children[0].dt.clone().expect("declarator is typed")
}

#[test]
fn arithmetic_over_declared_names_typechecks() {
    let out = compile("int x = 3; int y = x + 1;");
    assert_eq!(out.errors, 0);
    let y = out.tab.find(out.tab.root(), "y").unwrap();
    assert_eq!(out.tab.get(y).dt, Some(int(&out)));
    assert_eq!(init_dt(&out, 1), int(&out));
}

#[test]
fn call_arity_mismatch_is_one_error() {
    let out = compile("int f(int a, int b) { return a + b; } int z = f(1);");
    assert_eq!(out.errors, 1);
}

#[test]
fn missing_member_poisons_the_initializer() {
    let out = compile("struct S { int a; }; struct S s; int k = s.b;");
    assert_eq!(out.errors, 1);
    assert_eq!(init_dt(&out, 2), Type::Invalid);
}

#[test]
fn pointer_arithmetic_is_clean() {
    let out = compile("int *p; int x = p + 1;");
    assert_eq!(out.errors, 0);
    assert_eq!(init_dt(&out, 1), int(&out).derive_ptr());
}

#[test]
fn returning_a_function_mismatches_the_return_type() {
    let out = compile("int g(); int h(void) { return g; }");
    assert_eq!(out.errors, 1);
}

#[test]
fn every_expression_node_carries_a_type() {
    fn check(node: &Ast) {
        if node.class.is_value() {
            assert!(node.dt.is_some(), "untyped {:?} node at {}", node.class, node.loc);
        }
        for child in &node.children {
            check(child);
        }
        if let Some(l) = node.l.as_deref() {
            check(l);
        }
        if let Some(r) = node.r.as_deref() {
            check(r);
        }
    }
    let out = compile(
        "struct S { int a; }; struct S s; \
         int f(int n) { int r; for (r = 0; n > 0; --n) { r += s.a; } return r; } \
         int z = f(3) + [1, 2][0];",
    );
    assert_eq!(out.errors, 0);
    check(&out.module);
}

#[test]
fn analysis_is_idempotent_and_error_counts_double() {
    let mut tab = SymTable::new();
    let mut reporter = Reporter::new();
    let mut module = parser::parse("int g(); int h(void) { return g; }", &mut tab, &mut reporter);
    assert_eq!(reporter.errors(), 0);

    analyzer::analyze(&mut module, &mut tab, &mut reporter);
    assert_eq!(reporter.errors(), 1);
    let probe = |m: &Ast| {
        let body = m.children[1].r.as_deref().unwrap();
        body.children[0].r.as_deref().unwrap().dt.clone()
    };
    let first = probe(&module);

    analyzer::analyze(&mut module, &mut tab, &mut reporter);
    assert_eq!(reporter.errors(), 2);
    assert_eq!(probe(&module), first);
}

#[test]
fn assignment_needs_an_lvalue() {
    let out = compile("int f(void) { 3 = 4; return 0; }");
    assert_eq!(out.errors, 1);
}

#[test]
fn increment_needs_an_lvalue() {
    let out = compile("int f(void) { ++3; return 0; }");
    assert_eq!(out.errors, 1);
}

#[test]
fn address_of_and_deref_work_on_lvalues_and_pointers() {
    let ok = compile("int f(int *p) { int x; x = *p; p = &x; return x; }");
    assert_eq!(ok.errors, 0);
    let bad = compile("int f(void) { int x; x = *4; return x; }");
    assert_eq!(bad.errors, 1);
}

#[test]
fn branch_conditions_must_be_condition_typed() {
    let bad = compile("struct S { int a; }; struct S s; int f(void) { if (s) { return 0; } return 1; }");
    assert_eq!(bad.errors, 1);
    let ok = compile("int f(void) { if (1 < 2) { return 0; } return 1; }");
    assert_eq!(ok.errors, 0);
}

#[test]
fn loops_check_their_condition() {
    let ok = compile("int f(void) { int i; i = 0; do { ++i; } while (i < 3); return i; }");
    assert_eq!(ok.errors, 0);
    let bad = compile("struct S { int a; }; struct S s; int f(void) { while (s) { } return 0; }");
    assert_eq!(bad.errors, 1);
}

#[test]
fn ternary_unifies_compatible_arms() {
    let out = compile("int x = true ? 1 : 2;");
    assert_eq!(out.errors, 0);
    assert_eq!(init_dt(&out, 0), int(&out));
    let bad = compile("struct S { int a; }; struct S s; int x = true ? 1 : s;");
    assert_eq!(bad.errors, 1);
}

#[test]
fn comma_rejects_a_void_right_side() {
    let out = compile("void v(void) { } int f(void) { 1, v(); return 0; }");
    assert_eq!(out.errors, 1);
}

#[test]
fn member_access_binds_the_field_symbol() {
    let out = compile("struct S { int a; }; struct S s; int k = s.a;");
    assert_eq!(out.errors, 0);
    let access = out.module.children[2].children[0].r.as_deref().unwrap();
    let field = access.symbol.expect("field is bound");
    assert_eq!(out.tab.get(field).ident, "a");
    assert_eq!(init_dt(&out, 2), int(&out));
}

#[test]
fn arrow_requires_a_record_pointer() {
    let ok = compile("struct S { int a; }; int f(struct S *p) { return p->a; }");
    assert_eq!(ok.errors, 0);
    // wrong operand type, then no such field: two complaints
    let bad = compile("int f(int *p) { return p->a; }");
    assert_eq!(bad.errors, 2);
}

#[test]
fn calls_through_function_pointers_unwrap_one_level() {
    let out = compile("int f(int a) { return a; } int (*fp)(int) = &f; int z = fp(3);");
    assert_eq!(out.errors, 0);
    assert_eq!(init_dt(&out, 2), int(&out));
}

#[test]
fn parameter_type_mismatches_are_reported_per_argument() {
    let out = compile(
        "struct S { int a; }; struct S s; int f(int a, int b) { return a; } int z = f(1, s);",
    );
    assert_eq!(out.errors, 1);
}

#[test]
fn calling_a_non_function_is_rejected() {
    let out = compile("int x; int y = x(1);");
    assert_eq!(out.errors, 1);
}

#[test]
fn array_literals_unify_their_elements() {
    let out = compile("int x = [1, 2, 3][1];");
    assert_eq!(out.errors, 0);
    assert_eq!(init_dt(&out, 0), int(&out));
    let bad = compile("struct S { int a; }; struct S s; int f(void) { return [1, s][0]; }");
    assert_eq!(bad.errors, 1);
}

#[test]
fn indexing_requires_an_array_or_pointer_and_a_numeric_index() {
    let ok = compile("int f(int *p) { return p[0]; }");
    assert_eq!(ok.errors, 0);
    let bad = compile("int f(void) { int x; return x[0]; }");
    assert_eq!(bad.errors, 1);
}

#[test]
fn brace_initializers_check_fields() {
    let ok = compile("struct S { int a; int b; }; struct S s = {1, 2};");
    assert_eq!(ok.errors, 0);
    let excess = compile("struct S { int a; int b; }; struct S s = {1, 2, 3};");
    assert_eq!(excess.errors, 1);
    let wrong = compile("struct S { int a; int *b; }; struct S t; struct S s = {1, t};");
    assert_eq!(wrong.errors, 1);
}

#[test]
fn string_literals_are_char_pointers() {
    let out = compile("char *s = \"hello\";");
    assert_eq!(out.errors, 0);
    let chr = Type::basic(&out.tab, Builtin::Char);
    assert_eq!(init_dt(&out, 0), chr.derive_ptr());
}

#[test]
fn enum_constants_are_ints_in_the_enclosing_scope() {
    let out = compile("enum E { A, B }; int x = A + B;");
    assert_eq!(out.errors, 0);
    assert_eq!(init_dt(&out, 1), int(&out));
}

#[test]
fn compound_assignment_requires_numeric_operands() {
    let ok = compile("int f(void) { int x; x = 1; x <<= 2; return x; }");
    assert_eq!(ok.errors, 0);
    let bad = compile("int *p; int f(void) { p %= 2; return 0; }");
    assert_eq!(bad.errors, 1);
}

#[test]
fn unused_expression_values_warn_without_erroring() {
    let out = compile("int f(void) { 1 + 2; return 0; }");
    assert_eq!(out.errors, 0);
    assert_eq!(out.warnings, 1);
    let quiet = compile("int f(void) { int x; x = 1; ++x; f(); return x; }");
    assert_eq!(quiet.warnings, 0);
}

#[test]
fn declarations_render_back_to_c() {
    let out = compile("int *x; int y[4]; int g();");
    assert_eq!(out.errors, 0);
    let dt = |name: &str| {
        let sym = out.tab.find(out.tab.root(), name).unwrap();
        out.tab.get(sym).dt.clone().unwrap()
    };
    assert_eq!(dt("x").to_str(&out.tab, "x"), "int *x");
    assert_eq!(dt("y").to_str(&out.tab, "y"), "int y[4]");
    assert_eq!(dt("g").to_str(&out.tab, "g"), "int g()");
}
