//! Token primitives and parse-level diagnostics.
//!
//! A failed `match_*` reports `expected ...` and skips exactly one token
//! (single-token panic-mode resync); nothing unwinds.

use super::Parser;
use crate::front::diag::Diag;
use crate::front::token::{Loc, TokenClass};

impl<'a> Parser<'a> {
    /*:::: ERROR MESSAGING ::::*/

    pub(super) fn error_expected(&mut self, expected: &str) {
        self.reporter.error(
            self.loc,
            Diag::Expected { expected: expected.to_string(), found: self.cur.text.clone() },
        );
    }

    pub(super) fn error_undef_sym(&mut self) {
        self.reporter.error(self.loc, Diag::UndefinedSymbol(self.cur.text.clone()));
    }

    pub(super) fn error_illegal_break(&mut self) {
        self.reporter.error(self.loc, Diag::IllegalBreak);
    }

    pub(super) fn error_ident_outside_decl(&mut self) {
        self.reporter.error(self.loc, Diag::IdentOutsideDecl);
    }

    pub(super) fn error_duplicate_sym(&mut self, loc: Loc, ident: &str) {
        self.reporter.error(loc, Diag::DuplicateSymbol(ident.to_string()));
    }

    /*:::: TOKEN HANDLING ::::*/

    pub(super) fn is(&self, text: &str) -> bool {
        self.cur.text == text
    }

    pub(super) fn is_ident(&self) -> bool {
        self.cur.class == TokenClass::Ident
    }

    pub(super) fn is_int(&self) -> bool {
        self.cur.class == TokenClass::Int
    }

    pub(super) fn is_eof(&self) -> bool {
        self.cur.class == TokenClass::Eof
    }

    /// True iff a declaration can start here: the token names a type-ish
    /// symbol in scope, or is one of the specifier keywords.
    pub(super) fn is_decl_start(&self) -> bool {
        if self.is("const") || self.is("struct") || self.is("union") || self.is("enum") {
            return true;
        }
        self.is_ident()
            && self
                .tab
                .find(self.scope, &self.cur.text)
                .map(|s| self.tab.get(s).kind.is_type())
                .unwrap_or(false)
    }

    pub(super) fn advance(&mut self) {
        self.cur = self.lex.next_token();
        self.loc = self.cur.loc;
    }

    pub(super) fn match_text(&mut self, text: &str) {
        if self.is(text) {
            self.advance();
        } else {
            self.error_expected(&format!("'{}'", text));
            self.advance();
        }
    }

    pub(super) fn try_match_text(&mut self, text: &str) -> bool {
        if self.is(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn match_int(&mut self) -> usize {
        let value = self.cur.text.parse().unwrap_or(0);
        if self.is_int() {
            self.advance();
        } else {
            self.error_expected("integer");
            self.advance();
        }
        value
    }

    /// Like the other `match_*`s this consumes the token either way and
    /// hands back whatever text was there.
    pub(super) fn match_ident(&mut self) -> String {
        let text = self.cur.text.clone();
        if self.is_ident() {
            self.advance();
        } else {
            self.error_expected("identifier");
            self.advance();
        }
        text
    }
}
