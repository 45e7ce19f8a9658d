//! Semantic analysis: a single walk over the module AST that derives a
//! type for every expression node and checks statement-level rules.
//!
//! Errors never abort the walk. A failed check yields `Invalid`, and the
//! predicate matrix accepts `Invalid` everywhere, so one mistake produces
//! one diagnostic instead of a cascade.

mod analyzer_tests;
mod decl;
mod value;

pub use value::Value;

use super::ast::{Ast, AstClass, Op};
use super::diag::{Diag, Reporter};
use super::sym::SymTable;
use super::token::Loc;
use super::types::Type;

pub struct Analyzer<'a> {
    tab: &'a mut SymTable,
    reporter: &'a mut Reporter,
    /// Set for the duration of a function body walk.
    return_type: Option<Type>,
}

/// Analyze a parsed module in place, filling `dt` slots and reporting
/// through the reporter.
pub fn analyze(module: &mut Ast, tab: &mut SymTable, reporter: &mut Reporter) {
    let mut ctx = Analyzer { tab, reporter, return_type: None };
    ctx.module(module);
}

impl<'a> Analyzer<'a> {
    fn module(&mut self, node: &mut Ast) {
        for i in 0..node.children.len() {
            self.node(&mut node.children[i]);
        }
    }

    pub(crate) fn node(&mut self, node: &mut Ast) {
        match node.class {
            AstClass::Empty | AstClass::Invalid => {}
            // inside-a-breakable is a parsing concern
            AstClass::Break => {}
            AstClass::FnImpl => self.fn_impl(node),
            AstClass::DeclStruct => self.decl_struct(node),
            AstClass::Decl => self.decl(node),
            AstClass::Code => self.code(node),
            AstClass::Branch => self.branch(node),
            AstClass::Loop => self.loop_stmt(node),
            AstClass::Iter => self.iter(node),
            AstClass::Return => self.return_stmt(node),
            AstClass::Bop
            | AstClass::Uop
            | AstClass::Top
            | AstClass::Index
            | AstClass::Call
            | AstClass::Literal => self.value_stmt(node),
            AstClass::Module | AstClass::Struct | AstClass::Union => {
                self.unhandled(node.loc, "statement", "AST class");
            }
        }
    }

    /// An expression in statement position. A value computed and plainly
    /// dropped earns a warning.
    fn value_stmt(&mut self, node: &mut Ast) {
        let value = self.value(node);
        let effectful = match (node.class, node.op) {
            (AstClass::Call, _) => true,
            (AstClass::Bop, Some(op)) => op.is_assignment() || op == Op::Comma,
            (AstClass::Uop, Some(op)) => matches!(op, Op::Incr | Op::Decr),
            _ => false,
        };
        if !effectful && !value.dt.is_invalid() {
            self.reporter.warning(node.loc, Diag::UnusedValue);
        }
    }

    fn fn_impl(&mut self, node: &mut Ast) {
        if let Some(mut l) = node.l.take() {
            self.decl(&mut l);
            node.l = Some(l);
        }
        self.return_type = node
            .symbol
            .and_then(|s| self.tab.get(s).dt.as_ref())
            .map(|dt| dt.derive_return());
        if let Some(mut r) = node.r.take() {
            self.node(&mut r);
            node.r = Some(r);
        }
        self.return_type = None;
    }

    fn code(&mut self, node: &mut Ast) {
        for i in 0..node.children.len() {
            self.node(&mut node.children[i]);
        }
    }

    fn branch(&mut self, node: &mut Ast) {
        if !node.children.is_empty() {
            let cond = self.value(&mut node.children[0]);
            if !cond.dt.is_condition(self.tab) {
                let loc = node.children[0].loc;
                self.error_expected_desc(loc, "if", "condition", &cond.dt);
            }
        }
        if let Some(mut l) = node.l.take() {
            self.node(&mut l);
            node.l = Some(l);
        }
        if let Some(mut r) = node.r.take() {
            self.node(&mut r);
            node.r = Some(r);
        }
    }

    /// `while` keeps its condition in `l`; `do`-`while` keeps its (always
    /// compound) body there instead, which is how the two are told apart.
    fn loop_stmt(&mut self, node: &mut Ast) {
        let is_do = node.l.as_deref().map(|l| l.class == AstClass::Code).unwrap_or(false);
        let (mut cond, mut body) = if is_do {
            (node.r.take(), node.l.take())
        } else {
            (node.l.take(), node.r.take())
        };

        if let Some(cond) = cond.as_deref_mut() {
            let dt = self.value(cond).dt;
            if !dt.is_condition(self.tab) {
                let site = if is_do { "do loop" } else { "while loop" };
                self.error_expected_desc(cond.loc, site, "condition", &dt);
            }
        }
        if let Some(body) = body.as_deref_mut() {
            self.node(body);
        }

        if is_do {
            node.r = cond;
            node.l = body;
        } else {
            node.l = cond;
            node.r = body;
        }
    }

    /// `for`: children are init, condition, step in that order, any of
    /// which may be `Empty`; the body hangs off `l`.
    fn iter(&mut self, node: &mut Ast) {
        if node.children.len() >= 3 {
            if node.children[0].class == AstClass::Decl {
                self.decl(&mut node.children[0]);
            } else if node.children[0].class != AstClass::Empty {
                self.value(&mut node.children[0]);
            }

            if node.children[1].class != AstClass::Empty {
                let dt = self.value(&mut node.children[1]).dt;
                if !dt.is_condition(self.tab) {
                    let loc = node.children[1].loc;
                    self.error_expected_desc(loc, "for loop", "condition", &dt);
                }
            }

            if node.children[2].class != AstClass::Empty {
                self.value(&mut node.children[2]);
            }
        }
        if let Some(mut l) = node.l.take() {
            self.node(&mut l);
            node.l = Some(l);
        }
    }

    fn return_stmt(&mut self, node: &mut Ast) {
        let expected = self.return_type.clone().unwrap_or(Type::Invalid);
        let (found, loc) = match node.r.take() {
            Some(mut r) => {
                let v = self.value(&mut r);
                let loc = r.loc;
                node.r = Some(r);
                (v.dt, loc)
            }
            None => (Type::Invalid, node.loc),
        };
        if !found.is_compatible(&expected, self.tab) {
            self.error_expected_type(loc, "return", &expected, &found);
        }
    }

    /*:::: DIAGNOSTIC HELPERS ::::*/

    pub(crate) fn error_expected_desc(&mut self, loc: Loc, site: &str, expected: &str, found: &Type) {
        let found = found.to_str(self.tab, "");
        self.reporter.error(
            loc,
            Diag::ExpectedType { site: site.to_string(), expected: expected.to_string(), found },
        );
    }

    pub(crate) fn error_expected_type(&mut self, loc: Loc, site: &str, expected: &Type, found: &Type) {
        let expected = expected.to_str(self.tab, "");
        let found = found.to_str(self.tab, "");
        self.reporter.error(loc, Diag::ExpectedType { site: site.to_string(), expected, found });
    }

    pub(crate) fn error_op(&mut self, loc: Loc, op: &str, requires: &str, found: &Type) {
        let found = found.to_str(self.tab, "");
        self.reporter.error(
            loc,
            Diag::OperatorRequires { op: op.to_string(), requires: requires.to_string(), found },
        );
    }

    pub(crate) fn error_mismatch(&mut self, loc: Loc, op: &str, l: &Type, r: &Type) {
        let left = l.to_str(self.tab, "");
        let right = r.to_str(self.tab, "");
        self.reporter.error(loc, Diag::TypeMismatch { op: op.to_string(), left, right });
    }

    pub(crate) fn error_degree(
        &mut self,
        loc: Loc,
        thing: &str,
        expected: usize,
        found: usize,
        site: &str,
    ) {
        self.reporter.error(
            loc,
            Diag::DegreeMismatch { thing: thing.to_string(), expected, found, site: site.to_string() },
        );
    }

    pub(crate) fn error_param_mismatch(
        &mut self,
        loc: Loc,
        n: usize,
        site: &str,
        expected: &Type,
        found: &Type,
    ) {
        let expected = expected.to_str(self.tab, "");
        let found = found.to_str(self.tab, "");
        self.reporter.error(
            loc,
            Diag::ParamMismatch { n, site: site.to_string(), expected, found },
        );
    }

    pub(crate) fn error_member(&mut self, loc: Loc, op: &str, record: &Type, field: &str) {
        let record = record.to_str(self.tab, "");
        self.reporter.error(
            loc,
            Diag::MissingMember { op: op.to_string(), record, field: field.to_string() },
        );
    }

    /// Internal invariant failures surface as a diagnostic and the walk
    /// continues.
    pub(crate) fn unhandled(&mut self, loc: Loc, site: &str, what: &str) {
        self.reporter.error(
            loc,
            Diag::Unhandled { site: site.to_string(), what: what.to_string() },
        );
    }
}
