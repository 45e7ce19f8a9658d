//! Declaration parsing: specifiers, declarators, record and enum bodies,
//! parameter lists, and the collapse of a top-level declaration into a
//! function implementation.
//!
//! Declarator identifiers are inserted into the current scope as they
//! are read; the declarator's type is folded out of its AST later, by
//! the analyzer.

use super::Parser;
use crate::front::ast::{Ast, AstClass, LiteralClass, Op};
use crate::front::sym::{Builtin, Storage, SymId, SymKind};
use crate::front::token::Loc;
use crate::front::types::Type;

impl<'a> Parser<'a> {
    /// Top level: a declaration (which may collapse into a function
    /// implementation), or failing that a plain statement.
    pub(super) fn parse_top_level(&mut self) -> Ast {
        if self.is_decl_start() {
            self.parse_decl(true)
        } else {
            self.parse_stmt()
        }
    }

    /// `BasicType Declarator { "," Declarator } ";"`. At top level the
    /// first declarator may instead open a function body.
    pub(super) fn parse_decl(&mut self, top: bool) -> Ast {
        let loc = self.loc;
        let _const = self.try_match_text("const");
        let basic = self.parse_decl_basic();

        // a bare tag definition, e.g. `struct S { ... };`
        if self.is(";") {
            self.advance();
            let mut node = Ast::new(AstClass::DeclStruct, loc);
            node.l = Some(Box::new(basic));
            return node;
        }

        let mut node = Ast::new(AstClass::Decl, loc);
        node.l = Some(Box::new(basic));
        loop {
            let dtor = self.parse_declarator_init(false);
            if top && node.children.is_empty() && self.is("{") {
                if let Some(sym) = fn_impl_symbol(&dtor) {
                    node.add(dtor);
                    let mut fn_impl = Ast::new(AstClass::FnImpl, loc);
                    fn_impl.symbol = Some(sym);
                    // the prototype scope becomes the body scope
                    let saved = self.enter(sym);
                    let body = self.parse_code_in_scope();
                    self.scope = saved;
                    fn_impl.l = Some(Box::new(node));
                    fn_impl.r = Some(Box::new(body));
                    return fn_impl;
                }
            }
            node.add(dtor);
            if !self.try_match_text(",") {
                break;
            }
        }
        self.match_text(";");
        node
    }

    fn parse_decl_basic(&mut self) -> Ast {
        if self.is("struct") {
            self.parse_record(false)
        } else if self.is("union") {
            self.parse_record(true)
        } else if self.is("enum") {
            self.parse_enum()
        } else {
            let loc = self.loc;
            if self.is_ident() {
                if let Some(sym) = self.tab.find(self.scope, &self.cur.text) {
                    if self.tab.get(sym).kind.is_type() {
                        let text = self.cur.text.clone();
                        self.advance();
                        let mut node = Ast::literal(loc, LiteralClass::Ident, &text);
                        node.symbol = Some(sym);
                        return node;
                    }
                }
            }
            self.error_expected("type name");
            self.advance();
            Ast::invalid(loc)
        }
    }

    /// `struct`/`union` specifier. With a body it defines the tag in the
    /// current scope and parses fields as children of the tag symbol;
    /// without one it looks the tag up, forward-declaring when unseen.
    fn parse_record(&mut self, is_union: bool) -> Ast {
        let loc = self.loc;
        self.match_text(if is_union { "union" } else { "struct" });
        let kind = if is_union { SymKind::Union } else { SymKind::Struct };
        let name = self.match_ident();

        if self.is("{") {
            let sym = match self.tab.find_local(self.scope, &name) {
                Some(existing)
                    if self.tab.get(existing).kind == kind
                        && self.tab.get(existing).children.is_empty() =>
                {
                    // completing a forward reference
                    existing
                }
                Some(existing) => {
                    self.error_duplicate_sym(loc, &name);
                    existing
                }
                None => self.tab.add(self.scope, &name, kind, Storage::Static),
            };
            let class = if is_union { AstClass::Union } else { AstClass::Struct };
            let mut node = Ast::new(class, loc);
            node.symbol = Some(sym);
            node.literal = name;
            self.match_text("{");
            let saved = self.enter(sym);
            while !self.is("}") && !self.is_eof() {
                let field = self.parse_decl(false);
                node.add(field);
            }
            self.scope = saved;
            self.match_text("}");
            node
        } else {
            let sym = match self.tab.find(self.scope, &name) {
                Some(existing) => existing,
                None => self.tab.add(self.scope, &name, kind, Storage::Static),
            };
            let mut node = Ast::literal(loc, LiteralClass::Ident, &name);
            node.symbol = Some(sym);
            node
        }
    }

    /// `enum` specifier. Constants land in the *enclosing* scope, typed
    /// `int`.
    fn parse_enum(&mut self) -> Ast {
        let loc = self.loc;
        self.match_text("enum");
        let name = self.match_ident();

        if self.is("{") {
            let sym = match self.tab.find_local(self.scope, &name) {
                Some(existing)
                    if self.tab.get(existing).kind == SymKind::Enum
                        && self.tab.get(existing).children.is_empty() =>
                {
                    existing
                }
                Some(existing) => {
                    self.error_duplicate_sym(loc, &name);
                    existing
                }
                None => self.tab.add(self.scope, &name, SymKind::Enum, Storage::Static),
            };
            self.match_text("{");
            while !self.is("}") && !self.is_eof() {
                let cloc = self.loc;
                let cname = self.match_ident();
                if self.tab.find_local(self.scope, &cname).is_some() {
                    self.error_duplicate_sym(cloc, &cname);
                } else {
                    let storage = self.storage();
                    let constant = self.tab.add(self.scope, &cname, SymKind::Id, storage);
                    let int = Type::basic(self.tab, Builtin::Int);
                    self.tab.get_mut(constant).dt = Some(int);
                }
                if !self.try_match_text(",") {
                    break;
                }
            }
            self.match_text("}");
            let mut node = Ast::literal(loc, LiteralClass::Ident, &name);
            node.symbol = Some(sym);
            node
        } else {
            let sym = match self.tab.find(self.scope, &name) {
                Some(existing) => existing,
                None => self.tab.add(self.scope, &name, SymKind::Enum, Storage::Static),
            };
            let mut node = Ast::literal(loc, LiteralClass::Ident, &name);
            node.symbol = Some(sym);
            node
        }
    }

    fn parse_declarator_init(&mut self, param: bool) -> Ast {
        let dtor = self.parse_declarator(param);
        if self.is("=") {
            let loc = self.loc;
            self.advance();
            let init = self.parse_assign_expr();
            return Ast::bop(loc, Op::Assign, dtor, init);
        }
        dtor
    }

    /// Pointers, then a primary, then `[bound]` / `(params)` postfixes.
    /// Postfixes bind tighter, so `int *x[3]` is an array of pointers.
    fn parse_declarator(&mut self, param: bool) -> Ast {
        let loc = self.loc;
        if self.try_match_text("*") {
            let inner = self.parse_declarator(param);
            return Ast::uop(loc, Op::Deref, inner);
        }
        let mut node = self.parse_declarator_primary(param);
        loop {
            if self.is("[") {
                let bloc = self.loc;
                self.advance();
                let bound = if self.is("]") {
                    Ast::empty(self.loc)
                } else {
                    self.parse_assign_expr()
                };
                self.match_text("]");
                node = Ast::index(bloc, node, bound);
            } else if self.is("(") {
                node = self.parse_param_list(node);
            } else {
                break;
            }
        }
        node
    }

    fn parse_declarator_primary(&mut self, param: bool) -> Ast {
        let loc = self.loc;
        if self.try_match_text("(") {
            let node = self.parse_declarator(param);
            self.match_text(")");
            node
        } else if self.is_ident() {
            let name = self.cur.text.clone();
            self.advance();
            let kind = if param { SymKind::Param } else { SymKind::Id };
            let mut node = Ast::literal(loc, LiteralClass::Ident, &name);
            match self.tab.find_local(self.scope, &name) {
                Some(existing) => {
                    // keep the pre-existing binding
                    self.error_duplicate_sym(loc, &name);
                    node.symbol = Some(existing);
                }
                None => {
                    let storage = self.storage();
                    node.symbol = Some(self.tab.add(self.scope, &name, kind, storage));
                }
            }
            node
        } else if param {
            // unnamed parameter
            let storage = self.storage();
            let sym = self.tab.add(self.scope, "", SymKind::Param, storage);
            let mut node = Ast::empty(loc);
            node.symbol = Some(sym);
            node
        } else {
            self.error_expected("declarator");
            Ast::invalid(loc)
        }
    }

    /// `( parameters )` around a declarator. Parameters scope onto the
    /// declared symbol itself, so a following function body can pick the
    /// same scope back up.
    fn parse_param_list(&mut self, callee: Ast) -> Ast {
        let loc = self.loc;
        let mut node = Ast::new(AstClass::Call, loc);
        self.match_text("(");

        let saved = self.scope;
        match declarator_symbol(&callee) {
            Some(sym) => {
                self.scope = sym;
            }
            None => self.enter_scope(),
        }

        if !self.is(")") && !self.is_eof() {
            if self.is("void") {
                // `(void)` declares an empty parameter list
                let vloc = self.loc;
                self.advance();
                if !self.is(")") {
                    let mut basic = Ast::literal(vloc, LiteralClass::Ident, "void");
                    basic.symbol = Some(self.tab.builtin(Builtin::Void));
                    let first = self.parse_param_rest(basic, vloc);
                    node.add(first);
                    while self.try_match_text(",") {
                        let param = self.parse_param();
                        node.add(param);
                    }
                }
            } else {
                loop {
                    let param = self.parse_param();
                    node.add(param);
                    if !self.try_match_text(",") {
                        break;
                    }
                }
            }
        }
        self.match_text(")");
        self.scope = saved;
        node.l = Some(Box::new(callee));
        node
    }

    fn parse_param(&mut self) -> Ast {
        let loc = self.loc;
        let _const = self.try_match_text("const");
        let basic = self.parse_decl_basic();
        self.parse_param_rest(basic, loc)
    }

    fn parse_param_rest(&mut self, basic: Ast, loc: Loc) -> Ast {
        let mut node = Ast::new(AstClass::Decl, loc);
        node.l = Some(Box::new(basic));
        let dtor = self.parse_declarator(true);
        node.add(dtor);
        node
    }
}

/// The symbol a declarator binds: chase down to its identifier.
fn declarator_symbol(node: &Ast) -> Option<SymId> {
    match node.class {
        AstClass::Literal | AstClass::Empty => node.symbol,
        AstClass::Uop => node.r.as_deref().and_then(declarator_symbol),
        AstClass::Index | AstClass::Call | AstClass::Bop => {
            node.l.as_deref().and_then(declarator_symbol)
        }
        _ => None,
    }
}

/// A declarator that can open a function body. Pointers above the
/// parameter list are fine (`int *f()` returns a pointer); a
/// parenthesized pointer declarator is a function pointer and cannot.
fn fn_impl_symbol(node: &Ast) -> Option<SymId> {
    let mut at = node;
    while at.class == AstClass::Uop {
        at = at.r.as_deref()?;
    }
    if at.class != AstClass::Call {
        return None;
    }
    match at.l.as_deref() {
        Some(l) if l.class == AstClass::Literal => l.symbol,
        _ => None,
    }
}
