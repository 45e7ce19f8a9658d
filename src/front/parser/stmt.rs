//! Statement parsing: blocks, branches, the three loop forms, return,
//! break, local declarations and expression statements.

use super::Parser;
use crate::front::ast::{Ast, AstClass};

impl<'a> Parser<'a> {
    pub(super) fn parse_stmt(&mut self) -> Ast {
        if self.is("{") {
            self.parse_code()
        } else if self.is("if") {
            self.parse_branch()
        } else if self.is("while") || self.is("do") {
            self.parse_loop()
        } else if self.is("for") {
            self.parse_iter()
        } else if self.is("return") {
            self.parse_return()
        } else if self.is("break") {
            self.parse_break()
        } else if self.is(";") {
            let node = Ast::empty(self.loc);
            self.advance();
            node
        } else if self.is_decl_start() {
            self.parse_decl(false)
        } else {
            let node = self.parse_expr();
            self.match_text(";");
            node
        }
    }

    /// A braced block in a fresh scope.
    pub(super) fn parse_code(&mut self) -> Ast {
        self.enter_scope();
        let node = self.parse_code_in_scope();
        self.leave_scope();
        node
    }

    /// A braced block in whatever scope is current; function bodies use
    /// this to reuse their prototype scope.
    pub(super) fn parse_code_in_scope(&mut self) -> Ast {
        let mut node = Ast::new(AstClass::Code, self.loc);
        self.match_text("{");
        while !self.is("}") && !self.is_eof() {
            let stmt = self.parse_stmt();
            node.add(stmt);
        }
        self.match_text("}");
        node
    }

    fn parse_branch(&mut self) -> Ast {
        let mut node = Ast::new(AstClass::Branch, self.loc);
        self.match_text("if");
        self.match_text("(");
        let cond = self.parse_expr();
        node.add(cond);
        self.match_text(")");
        let then = self.parse_stmt();
        node.l = Some(Box::new(then));
        if self.try_match_text("else") {
            let other = self.parse_stmt();
            node.r = Some(Box::new(other));
        }
        node
    }

    /// `while` puts the condition in `l` and the body in `r`; `do` the
    /// other way around. The body of a `do` loop must be compound, which
    /// is how the analyzer tells the two apart.
    fn parse_loop(&mut self) -> Ast {
        let mut node = Ast::new(AstClass::Loop, self.loc);
        self.break_level += 1;
        if self.try_match_text("do") {
            let body = self.parse_code();
            self.match_text("while");
            self.match_text("(");
            let cond = self.parse_expr();
            self.match_text(")");
            self.match_text(";");
            node.l = Some(Box::new(body));
            node.r = Some(Box::new(cond));
        } else {
            self.match_text("while");
            self.match_text("(");
            let cond = self.parse_expr();
            self.match_text(")");
            let body = self.parse_stmt();
            node.l = Some(Box::new(cond));
            node.r = Some(Box::new(body));
        }
        self.break_level -= 1;
        node
    }

    /// `for`: the header opens its own scope; the first three children
    /// are init, condition and step, any of which may be `Empty`.
    fn parse_iter(&mut self) -> Ast {
        let mut node = Ast::new(AstClass::Iter, self.loc);
        self.match_text("for");
        self.enter_scope();
        self.match_text("(");

        if self.is(";") {
            node.add(Ast::empty(self.loc));
            self.advance();
        } else if self.is_decl_start() {
            // the declaration consumes its own ';'
            let init = self.parse_decl(false);
            node.add(init);
        } else {
            let init = self.parse_expr();
            node.add(init);
            self.match_text(";");
        }

        if self.is(";") {
            node.add(Ast::empty(self.loc));
        } else {
            let cond = self.parse_expr();
            node.add(cond);
        }
        self.match_text(";");

        if self.is(")") {
            node.add(Ast::empty(self.loc));
        } else {
            let step = self.parse_expr();
            node.add(step);
        }
        self.match_text(")");

        self.break_level += 1;
        let body = self.parse_stmt();
        node.l = Some(Box::new(body));
        self.break_level -= 1;
        self.leave_scope();
        node
    }

    fn parse_return(&mut self) -> Ast {
        let mut node = Ast::new(AstClass::Return, self.loc);
        self.match_text("return");
        if !self.is(";") {
            let value = self.parse_expr();
            node.r = Some(Box::new(value));
        }
        self.match_text(";");
        node
    }

    fn parse_break(&mut self) -> Ast {
        if self.break_level == 0 {
            self.error_illegal_break();
        }
        let node = Ast::new(AstClass::Break, self.loc);
        self.match_text("break");
        self.match_text(";");
        node
    }
}
