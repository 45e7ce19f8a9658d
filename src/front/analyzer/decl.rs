//! Declaration analysis: declarator ASTs fold into full types that land
//! on the bound symbols, parameters included; initializers are then
//! checked against the declared type.

use super::Analyzer;
use crate::front::ast::{Ast, AstClass, LiteralClass, Op};
use crate::front::sym::Builtin;
use crate::front::types::Type;

impl<'a> Analyzer<'a> {
    /// A bare tag definition statement, `struct S { ... };`.
    pub(crate) fn decl_struct(&mut self, node: &mut Ast) {
        if let Some(mut l) = node.l.take() {
            self.decl_basic(&mut l);
            node.l = Some(l);
        }
    }

    pub(crate) fn decl(&mut self, node: &mut Ast) {
        let base = match node.l.take() {
            Some(mut l) => {
                let t = self.decl_basic(&mut l);
                node.l = Some(l);
                t
            }
            None => Type::Invalid,
        };
        for i in 0..node.children.len() {
            self.decl_node(&mut node.children[i], &base);
        }
    }

    /// The declaration's specifier: a record body (whose fields get
    /// typed here) or a literal naming a type symbol.
    fn decl_basic(&mut self, node: &mut Ast) -> Type {
        match node.class {
            AstClass::Struct | AstClass::Union => {
                for i in 0..node.children.len() {
                    self.decl(&mut node.children[i]);
                }
                match node.symbol {
                    Some(sym) => Type::Basic(sym),
                    None => Type::Invalid,
                }
            }
            AstClass::Literal => {
                let dt = match node.symbol {
                    Some(sym) => Type::Basic(sym),
                    None => Type::Invalid,
                };
                node.dt = Some(dt.clone());
                dt
            }
            AstClass::Invalid | AstClass::Empty => Type::Invalid,
            _ => {
                self.unhandled(node.loc, "declaration", "AST class");
                Type::Invalid
            }
        }
    }

    /// One declarator hanging off a `Decl`, initializer included. An
    /// initialized declarator behaves like an assignment: the node takes
    /// the initializer's type.
    fn decl_node(&mut self, node: &mut Ast, base: &Type) {
        if node.class == AstClass::Bop && node.op == Some(Op::Assign) {
            let declared = match node.l.take() {
                Some(mut l) => {
                    let t = self.declarator(&mut l, base.clone());
                    node.l = Some(l);
                    t
                }
                None => Type::Invalid,
            };
            match node.r.take() {
                Some(mut r) => {
                    if r.class == AstClass::Literal && r.lit_class == Some(LiteralClass::Init) {
                        self.init_list(&mut r, &declared);
                        node.dt = Some(declared);
                    } else {
                        let v = self.value(&mut r);
                        if !v.dt.is_compatible(&declared, self.tab) {
                            self.error_expected_type(r.loc, "initialization", &declared, &v.dt);
                        }
                        node.dt = Some(v.dt.derive_from());
                    }
                    node.r = Some(r);
                }
                None => node.dt = Some(declared),
            }
        } else {
            self.declarator(node, base.clone());
        }
    }

    /// Fold a declarator AST into the declared type, depositing it on
    /// the bound symbol. Postfixes sit below pointer wrappers in the
    /// tree, so each level wraps the type and descends.
    fn declarator(&mut self, node: &mut Ast, t: Type) -> Type {
        match node.class {
            AstClass::Uop if node.op == Some(Op::Deref) => {
                let dt = match node.r.take() {
                    Some(mut r) => {
                        let dt = self.declarator(&mut r, t.derive_ptr());
                        node.r = Some(r);
                        dt
                    }
                    None => Type::Invalid,
                };
                node.dt = Some(dt.clone());
                dt
            }
            AstClass::Index => {
                let len = self.array_bound(node);
                let dt = match node.l.take() {
                    Some(mut l) => {
                        let dt = self.declarator(&mut l, t.derive_array(len));
                        node.l = Some(l);
                        dt
                    }
                    None => Type::Invalid,
                };
                node.dt = Some(dt.clone());
                dt
            }
            AstClass::Call => {
                // parameters first, so their symbols carry types
                for i in 0..node.children.len() {
                    self.decl(&mut node.children[i]);
                }
                let fn_t = Type::Function(Box::new(t), node.children.len());
                let dt = match node.l.take() {
                    Some(mut l) => {
                        let dt = self.declarator(&mut l, fn_t);
                        node.l = Some(l);
                        dt
                    }
                    None => Type::Invalid,
                };
                node.dt = Some(dt.clone());
                dt
            }
            AstClass::Literal | AstClass::Empty => {
                if let Some(sym) = node.symbol {
                    self.tab.get_mut(sym).dt = Some(t.derive_from());
                }
                node.dt = Some(t.clone());
                t
            }
            AstClass::Invalid => Type::Invalid,
            _ => {
                self.unhandled(node.loc, "declarator", "AST class");
                Type::Invalid
            }
        }
    }

    /// Array bounds must be integer literals; there is no constant
    /// folding.
    fn array_bound(&mut self, node: &mut Ast) -> usize {
        match node.r.take() {
            Some(mut r) => {
                let len = if r.class == AstClass::Literal
                    && r.lit_class == Some(LiteralClass::Int)
                {
                    r.dt = Some(Type::basic(self.tab, Builtin::Int));
                    r.literal.parse().unwrap_or(0)
                } else if r.class == AstClass::Empty {
                    0
                } else {
                    let v = self.value(&mut r);
                    self.error_expected_desc(r.loc, "array bound", "integer literal", &v.dt);
                    0
                };
                node.r = Some(r);
                len
            }
            None => 0,
        }
    }

    /// Brace initializers checked against the declared type: records
    /// field by field, arrays element by element.
    fn init_list(&mut self, node: &mut Ast, declared: &Type) {
        node.dt = Some(declared.derive_from());
        match declared {
            Type::Basic(sym) if declared.is_record(self.tab) => {
                let sym = *sym;
                let fields = self.tab.get(sym).children.clone();
                if node.children.len() > fields.len() {
                    let site = self.tab.get(sym).ident.clone();
                    self.error_degree(node.loc, "fields", fields.len(), node.children.len(), &site);
                }
                for i in 0..node.children.len() {
                    let field_dt = fields
                        .get(i)
                        .and_then(|&f| self.tab.get(f).dt.clone())
                        .unwrap_or(Type::Invalid);
                    self.init_value(&mut node.children[i], &field_dt);
                }
            }
            Type::Array(elem, _) => {
                let elem = (**elem).clone();
                for i in 0..node.children.len() {
                    self.init_value(&mut node.children[i], &elem);
                }
            }
            Type::Invalid => {
                for i in 0..node.children.len() {
                    self.value(&mut node.children[i]);
                }
            }
            _ => {
                // scalar: a single braced value
                if node.children.len() != 1 {
                    self.error_degree(node.loc, "values", 1, node.children.len(), "initializer");
                }
                let declared = declared.clone();
                for i in 0..node.children.len() {
                    self.init_value(&mut node.children[i], &declared);
                }
            }
        }
    }

    fn init_value(&mut self, node: &mut Ast, expected: &Type) {
        if node.class == AstClass::Literal && node.lit_class == Some(LiteralClass::Init) {
            self.init_list(node, expected);
        } else {
            let v = self.value(node);
            if !v.dt.is_compatible(expected, self.tab) {
                self.error_expected_type(node.loc, "initialization", expected, &v.dt);
            }
        }
    }
}
