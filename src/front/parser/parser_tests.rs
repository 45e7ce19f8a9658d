#![cfg(test)]

use crate::driver::{self, Outcome};
use crate::front::ast::{AstClass, LiteralClass, Op};
use crate::front::sym::SymKind;

fn parse(src: &str) -> Outcome {
    driver::compile(src)
}

#[test]
fn module_holds_top_level_declarations() {
    let out = parse("int x; int y;");
    assert_eq!(out.errors, 0);
    assert_eq!(out.module.class, AstClass::Module);
    assert_eq!(out.module.child_count(), 2);
    assert!(out.module.children.iter().all(|c| c.class == AstClass::Decl));
}

#[test]
fn identifier_primaries_bind_at_parse_time() {
    let out = parse("int x; int y = x;");
    assert_eq!(out.errors, 0);
    let init = &out.module.children[1].children[0];
    assert_eq!(init.op, Some(Op::Assign));
    let rhs = init.r.as_deref().unwrap();
    assert_eq!(rhs.lit_class, Some(LiteralClass::Ident));
    let sym = rhs.symbol.expect("initializer identifier is bound");
    assert_eq!(out.tab.get(sym).ident, "x");
}

#[test]
fn undefined_identifier_reports_and_yields_invalid() {
    let out = parse("int x = yy;");
    assert_eq!(out.errors, 1);
    let init = &out.module.children[0].children[0];
    assert_eq!(init.r.as_deref().unwrap().class, AstClass::Invalid);
}

#[test]
fn duplicate_in_one_scope_is_reported_once() {
    let out = parse("int x; int x;");
    assert_eq!(out.errors, 1);
}

#[test]
fn shadowing_in_a_nested_scope_is_silent() {
    let out = parse("int x; int f(int x) { return x; }");
    assert_eq!(out.errors, 0);
}

#[test]
fn top_level_function_collapses_to_an_implementation() {
    let out = parse("int f(int a, int b) { return a + b; }");
    assert_eq!(out.errors, 0);
    let f = &out.module.children[0];
    assert_eq!(f.class, AstClass::FnImpl);
    assert_eq!(f.l.as_deref().unwrap().class, AstClass::Decl);
    assert_eq!(f.r.as_deref().unwrap().class, AstClass::Code);
    let sym = f.symbol.expect("implementation is bound to its symbol");
    assert_eq!(out.tab.get(sym).ident, "f");
}

#[test]
fn parameters_are_children_of_the_function_symbol() {
    let out = parse("int f(int a, int b) { int local; return a; }");
    assert_eq!(out.errors, 0);
    let f = out.tab.find(out.tab.root(), "f").unwrap();
    let params = out.tab.params(f);
    assert_eq!(params.len(), 2);
    assert_eq!(out.tab.get(params[0]).ident, "a");
    assert_eq!(out.tab.get(params[0]).kind, SymKind::Param);
    // the body reused the prototype scope, so locals land there too
    assert!(out.tab.child(f, "local").is_some());
}

#[test]
fn void_parameter_list_is_empty() {
    let out = parse("int h(void) { return 0; }");
    assert_eq!(out.errors, 0);
    let h = out.tab.find(out.tab.root(), "h").unwrap();
    assert!(out.tab.params(h).is_empty());
}

#[test]
fn declarators_compose_pointers_arrays_and_functions() {
    let out = parse("int *x; int y[4]; int g();");
    assert_eq!(out.errors, 0);
    assert_eq!(out.module.children[0].children[0].class, AstClass::Uop);
    assert_eq!(out.module.children[1].children[0].class, AstClass::Index);
    assert_eq!(out.module.children[2].children[0].class, AstClass::Call);
}

#[test]
fn for_header_children_are_init_cond_step() {
    let out = parse("int f(void) { for (int i = 0; i < 3; ++i) { } return 0; }");
    assert_eq!(out.errors, 0);
    let body = out.module.children[0].r.as_deref().unwrap();
    let iter = &body.children[0];
    assert_eq!(iter.class, AstClass::Iter);
    assert_eq!(iter.children[0].class, AstClass::Decl);
    assert_eq!(iter.children[1].op, Some(Op::Less));
    assert_eq!(iter.children[2].op, Some(Op::Incr));
    assert_eq!(iter.l.as_deref().unwrap().class, AstClass::Code);
}

#[test]
fn empty_for_header_slots_parse_as_empty() {
    let out = parse("int f(void) { for (;;) { break; } return 0; }");
    assert_eq!(out.errors, 0);
    let body = out.module.children[0].r.as_deref().unwrap();
    let iter = &body.children[0];
    assert!(iter.children.iter().take(3).all(|c| c.class == AstClass::Empty));
}

#[test]
fn break_outside_a_loop_is_illegal() {
    let out = parse("int a = 1; if (a) { break; }");
    assert_eq!(out.errors, 1);
}

#[test]
fn break_inside_a_loop_is_fine() {
    let out = parse("int f(void) { while (true) { break; } return 0; }");
    assert_eq!(out.errors, 0);
}

#[test]
fn struct_fields_hang_off_the_tag_symbol() {
    let out = parse("struct S { int a; int b; };");
    assert_eq!(out.errors, 0);
    assert_eq!(out.module.children[0].class, AstClass::DeclStruct);
    let s = out.tab.find(out.tab.root(), "S").unwrap();
    assert_eq!(out.tab.get(s).kind, SymKind::Struct);
    let fields: Vec<_> =
        out.tab.get(s).children.iter().map(|&c| out.tab.get(c).ident.as_str()).collect();
    assert_eq!(fields, ["a", "b"]);
}

#[test]
fn record_types_declare_by_bare_tag_name_once_defined() {
    let out = parse("struct S { int a; }; int f(void) { S s; return s.a; }");
    assert_eq!(out.errors, 0);
}

#[test]
fn self_referential_records_parse() {
    let out = parse("struct Node { int value; struct Node *next; };");
    assert_eq!(out.errors, 0);
}

#[test]
fn a_type_name_in_expression_position_is_rejected() {
    let out = parse("int x = int;");
    assert_eq!(out.errors, 1);
}

#[test]
fn resync_consumes_one_token_and_continues() {
    let out = parse("int x = @; int y;");
    assert_eq!(out.errors, 1);
    assert_eq!(out.module.child_count(), 2);
    assert_eq!(out.module.children[1].class, AstClass::Decl);
}
