//! Recursive-descent parser.
//!
//! Parsing and symbol introduction interleave: declarators insert symbols
//! the moment their identifier is read, and identifier primaries resolve
//! against the scope in force. That lookup is what lets a leading
//! identifier decide between "declaration" and "expression" without
//! backtracking.
//!
//! Every syntax error is recoverable: report, advance one token, carry
//! on. The caller reads the error count off the reporter.

mod decl;
mod expr;
mod helpers;
mod parser_tests;
mod stmt;

use super::ast::{Ast, AstClass};
use super::diag::Reporter;
use super::lexer::Lexer;
use super::sym::{Storage, SymId, SymKind, SymTable};
use super::token::{Loc, Token};

pub struct Parser<'a> {
    lex: Lexer<'a>,
    cur: Token,
    tab: &'a mut SymTable,
    reporter: &'a mut Reporter,
    scope: SymId,
    loc: Loc,
    break_level: u32,
}

/// Parse a whole module into an AST rooted at a `Module` node, binding
/// symbols into `tab` as declarations appear.
pub fn parse(src: &str, tab: &mut SymTable, reporter: &mut Reporter) -> Ast {
    let mut lex = Lexer::new(src);
    let cur = lex.next_token();
    let loc = cur.loc;
    let scope = tab.root();
    let mut parser = Parser { lex, cur, tab, reporter, scope, loc, break_level: 0 };
    parser.parse_module()
}

impl<'a> Parser<'a> {
    fn parse_module(&mut self) -> Ast {
        let mut module = Ast::new(AstClass::Module, self.loc);
        while !self.is_eof() {
            let top = self.parse_top_level();
            module.add(top);
        }
        module
    }

    /*:::: SCOPES ::::*/

    /// Push an anonymous container scope.
    fn enter_scope(&mut self) {
        self.scope = self.tab.add(self.scope, "", SymKind::Scope, Storage::Auto);
    }

    /// Make an existing symbol (function, record) the current scope.
    fn enter(&mut self, sym: SymId) -> SymId {
        std::mem::replace(&mut self.scope, sym)
    }

    fn leave_scope(&mut self) {
        if let Some(parent) = self.tab.get(self.scope).parent {
            self.scope = parent;
        }
    }

    /// File-scope bindings get static storage, everything else is
    /// automatic.
    fn storage(&self) -> Storage {
        if self.scope == self.tab.root() {
            Storage::Static
        } else {
            Storage::Auto
        }
    }
}
