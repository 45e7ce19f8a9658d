//! Expression typing. `value` computes and records the derived type of
//! every node it touches, and says whether the node denotes an lvalue.

use super::Analyzer;
use crate::front::ast::{Ast, AstClass, LiteralClass, Op};
use crate::front::sym::Builtin;
use crate::front::token::Loc;
use crate::front::types::Type;

/// What an expression evaluates to: its derived type plus lvalue-ness.
pub struct Value {
    pub dt: Type,
    pub lvalue: bool,
}

impl Value {
    fn rvalue(dt: Type) -> Value {
        Value { dt, lvalue: false }
    }

    fn lvalue(dt: Type) -> Value {
        Value { dt, lvalue: true }
    }

    fn invalid() -> Value {
        Value::rvalue(Type::Invalid)
    }
}

fn l_loc(node: &Ast) -> Loc {
    node.l.as_deref().map_or(node.loc, |n| n.loc)
}

fn r_loc(node: &Ast) -> Loc {
    node.r.as_deref().map_or(node.loc, |n| n.loc)
}

impl<'a> Analyzer<'a> {
    /// Type one expression node. The node's `dt` is always set before
    /// returning; `Empty` and `Invalid` nodes yield `Invalid`.
    pub(crate) fn value(&mut self, node: &mut Ast) -> Value {
        let value = match node.class {
            AstClass::Bop => self.value_bop(node),
            AstClass::Uop => self.value_uop(node),
            AstClass::Top => self.value_ternary(node),
            AstClass::Index => self.value_index(node),
            AstClass::Call => self.value_call(node),
            AstClass::Literal => self.value_literal(node),
            AstClass::Empty | AstClass::Invalid => Value::invalid(),
            _ => {
                self.unhandled(node.loc, "value", "AST class");
                Value::invalid()
            }
        };
        node.dt = Some(value.dt.clone());
        value
    }

    fn value_l(&mut self, node: &mut Ast) -> Value {
        match node.l.take() {
            Some(mut l) => {
                let v = self.value(&mut l);
                node.l = Some(l);
                v
            }
            None => Value::invalid(),
        }
    }

    fn value_r(&mut self, node: &mut Ast) -> Value {
        match node.r.take() {
            Some(mut r) => {
                let v = self.value(&mut r);
                node.r = Some(r);
                v
            }
            None => Value::invalid(),
        }
    }

    fn value_bop(&mut self, node: &mut Ast) -> Value {
        let op = match node.op {
            Some(op) => op,
            None => return Value::invalid(),
        };
        if op.is_numeric() || op.is_assignment() {
            self.value_arith(node, op)
        } else if op.is_ordinal() || op.is_equality() {
            self.value_comparison(node, op)
        } else if op.is_logical() {
            self.value_logical(node, op)
        } else if op.is_member() {
            self.value_member(node, op)
        } else if op == Op::Comma {
            self.value_comma(node)
        } else {
            self.unhandled(node.loc, "value", "operator");
            Value::invalid()
        }
    }

    /// Numeric and assignment operators. Pointer operands ride on the
    /// ordinal family, which is what admits pointer arithmetic.
    fn value_arith(&mut self, node: &mut Ast, op: Op) -> Value {
        let lv = self.value_l(node);
        let rv = self.value_r(node);

        if op.is_numeric() {
            // additive operators also take pointers, via the ordinal
            // family
            let additive = matches!(op, Op::Add | Op::Sub | Op::AddAssign | Op::SubAssign);
            let l_ok = if additive { lv.dt.is_ordinal(self.tab) } else { lv.dt.is_numeric(self.tab) };
            let r_ok = if additive { rv.dt.is_ordinal(self.tab) } else { rv.dt.is_numeric(self.tab) };
            if !l_ok || !r_ok {
                let loc = if !l_ok { l_loc(node) } else { r_loc(node) };
                let found = if !l_ok { &lv.dt } else { &rv.dt };
                self.error_op(loc, op.as_str(), "numeric type", found);
            }
        }

        if op.is_assignment() {
            if !lv.dt.is_assignment(self.tab) || !rv.dt.is_assignment(self.tab) {
                let l_bad = !lv.dt.is_assignment(self.tab);
                let loc = if l_bad { l_loc(node) } else { r_loc(node) };
                let found = if l_bad { &lv.dt } else { &rv.dt };
                self.error_op(loc, op.as_str(), "assignable type", found);
            }
            if !lv.lvalue && !lv.dt.is_invalid() {
                self.error_op(l_loc(node), op.as_str(), "lvalue", &lv.dt);
            }
        }

        if lv.dt.is_compatible(&rv.dt, self.tab) {
            if op.is_assignment() {
                // assignment takes the type of the right hand side and
                // does not yield an lvalue
                Value::rvalue(rv.dt.derive_from())
            } else {
                Value::rvalue(Type::derive_from_two(self.tab, &lv.dt, &rv.dt))
            }
        } else {
            self.error_mismatch(node.loc, op.as_str(), &lv.dt, &rv.dt);
            Value::invalid()
        }
    }

    fn value_comparison(&mut self, node: &mut Ast, op: Op) -> Value {
        let lv = self.value_l(node);
        let rv = self.value_r(node);

        let ok = if op.is_ordinal() {
            lv.dt.is_ordinal(self.tab) && rv.dt.is_ordinal(self.tab)
        } else {
            lv.dt.is_equality(self.tab) && rv.dt.is_equality(self.tab)
        };
        if !ok {
            let l_bad = if op.is_ordinal() {
                !lv.dt.is_ordinal(self.tab)
            } else {
                !lv.dt.is_equality(self.tab)
            };
            let loc = if l_bad { l_loc(node) } else { r_loc(node) };
            let found = if l_bad { &lv.dt } else { &rv.dt };
            self.error_op(loc, op.as_str(), "comparable type", found);
        }

        if lv.dt.is_compatible(&rv.dt, self.tab) {
            Value::rvalue(Type::derive_from_two(self.tab, &lv.dt, &rv.dt))
        } else {
            self.error_mismatch(node.loc, op.as_str(), &lv.dt, &rv.dt);
            Value::invalid()
        }
    }

    /// `&&`/`||`: both sides must work as conditions; the result is a
    /// fresh bool.
    fn value_logical(&mut self, node: &mut Ast, op: Op) -> Value {
        let lv = self.value_l(node);
        let rv = self.value_r(node);
        if !lv.dt.is_condition(self.tab) {
            self.error_op(l_loc(node), op.as_str(), "condition value", &lv.dt);
        }
        if !rv.dt.is_condition(self.tab) {
            self.error_op(r_loc(node), op.as_str(), "condition value", &rv.dt);
        }
        Value::rvalue(Type::basic(self.tab, Builtin::Bool))
    }

    /// `.` and `->`: the field resolves among the record symbol's
    /// children and is bound onto the node.
    fn value_member(&mut self, node: &mut Ast, op: Op) -> Value {
        let lv = self.value_l(node);
        let l = &lv.dt;

        if op == Op::Arrow {
            if !l.is_ptr() {
                self.error_op(l_loc(node), op.as_str(), "pointer", l);
            } else if !l.derive_base().is_record(self.tab) {
                self.error_op(l_loc(node), op.as_str(), "structure pointer", l);
            }
        } else if !l.is_record(self.tab) {
            self.error_op(l_loc(node), op.as_str(), "structure type", l);
        }

        let record = match l {
            Type::Basic(s) => Some(*s),
            Type::Ptr(base) => match &**base {
                Type::Basic(s) => Some(*s),
                _ => None,
            },
            _ => None,
        };
        let field_name = node.r.as_deref().map(|r| r.literal.clone()).unwrap_or_default();
        let field = record.and_then(|s| self.tab.child(s, &field_name));
        node.symbol = field;

        match field {
            Some(field) => {
                let dt = self.tab.get(field).dt.clone().unwrap_or(Type::Invalid);
                if let Some(r) = node.r.as_deref_mut() {
                    r.symbol = Some(field);
                    r.dt = Some(dt.clone());
                }
                Value::lvalue(dt)
            }
            None => {
                if !l.is_invalid() {
                    self.error_member(r_loc(node), op.as_str(), l, &field_name);
                }
                if let Some(r) = node.r.as_deref_mut() {
                    r.dt = Some(Type::Invalid);
                }
                Value::invalid()
            }
        }
    }

    fn value_comma(&mut self, node: &mut Ast) -> Value {
        // the left side still gets a type even though only the right
        // decides the result
        let _ = self.value_l(node);
        let rv = self.value_r(node);
        if rv.dt.is_void(self.tab) {
            self.error_op(r_loc(node), ",", "non-void", &rv.dt);
            Value::invalid()
        } else {
            Value::rvalue(rv.dt.derive_from())
        }
    }

    fn value_uop(&mut self, node: &mut Ast) -> Value {
        let op = match node.op {
            Some(op) => op,
            None => return Value::invalid(),
        };
        let rv = self.value_r(node);
        match op {
            Op::Add | Op::Sub | Op::Not | Op::BitNot | Op::Incr | Op::Decr => {
                if !rv.dt.is_numeric(self.tab) {
                    self.error_op(r_loc(node), op.as_str(), "numeric type", &rv.dt);
                    Value::invalid()
                } else if matches!(op, Op::Incr | Op::Decr) && !rv.lvalue && !rv.dt.is_invalid() {
                    self.error_op(r_loc(node), op.as_str(), "lvalue", &rv.dt);
                    Value::invalid()
                } else {
                    Value::rvalue(rv.dt.derive_from())
                }
            }
            Op::Deref => {
                if rv.dt.is_ptr() {
                    Value::lvalue(rv.dt.derive_base())
                } else {
                    self.error_op(r_loc(node), op.as_str(), "pointer", &rv.dt);
                    Value::invalid()
                }
            }
            Op::AddrOf => {
                if rv.lvalue || rv.dt.is_invalid() {
                    Value::rvalue(rv.dt.derive_ptr())
                } else {
                    self.error_op(r_loc(node), op.as_str(), "lvalue", &rv.dt);
                    Value::invalid()
                }
            }
            _ => {
                self.unhandled(node.loc, "value", "operator");
                Value::invalid()
            }
        }
    }

    fn value_ternary(&mut self, node: &mut Ast) -> Value {
        if !node.children.is_empty() {
            let cond = self.value(&mut node.children[0]);
            if !cond.dt.is_condition(self.tab) {
                let loc = node.children[0].loc;
                self.error_op(loc, "ternary ?:", "condition value", &cond.dt);
            }
        }
        let lv = self.value_l(node);
        let rv = self.value_r(node);
        if lv.dt.is_compatible(&rv.dt, self.tab) {
            Value::rvalue(Type::derive_unified(self.tab, &lv.dt, &rv.dt))
        } else {
            self.error_mismatch(node.loc, "ternary ?:", &lv.dt, &rv.dt);
            Value::invalid()
        }
    }

    fn value_index(&mut self, node: &mut Ast) -> Value {
        let lv = self.value_l(node);
        let rv = self.value_r(node);
        if !rv.dt.is_numeric(self.tab) {
            self.error_op(r_loc(node), "[]", "numeric index", &rv.dt);
        }
        if lv.dt.is_array() || lv.dt.is_ptr() {
            Value::lvalue(lv.dt.derive_base())
        } else {
            self.error_op(l_loc(node), "[]", "array or pointer", &lv.dt);
            Value::invalid()
        }
    }

    /// Calls: a result type is derived even when the arguments mismatch,
    /// so the enclosing expression can still be analyzed.
    fn value_call(&mut self, node: &mut Ast) -> Value {
        let lv = self.value_l(node);

        let mut args = Vec::with_capacity(node.children.len());
        for i in 0..node.children.len() {
            let v = self.value(&mut node.children[i]);
            args.push(v.dt);
        }

        if !lv.dt.is_callable() {
            self.error_op(l_loc(node), "()", "function", &lv.dt);
            return Value::invalid();
        }

        let fn_dt = node
            .symbol
            .and_then(|s| self.tab.get(s).dt.clone())
            .unwrap_or_else(|| lv.dt.clone());
        let result = fn_dt.derive_return();

        let expected = match &fn_dt {
            Type::Function(_, n) => Some(*n),
            Type::Ptr(base) => match &**base {
                Type::Function(_, n) => Some(*n),
                _ => None,
            },
            _ => None,
        };
        let expected = match expected {
            Some(n) => n,
            None => return Value::rvalue(result),
        };

        let site = node
            .symbol
            .map(|s| self.tab.get(s).ident.clone())
            .unwrap_or_else(|| "function".to_string());
        if expected != args.len() {
            self.error_degree(node.loc, "parameters", expected, args.len(), &site);
        } else if let Some(sym) = node.symbol {
            let params = self.tab.params(sym);
            for (n, (arg, param)) in args.iter().zip(params.iter()).enumerate() {
                let param_dt = self.tab.get(*param).dt.clone().unwrap_or(Type::Invalid);
                if !arg.is_compatible(&param_dt, self.tab) {
                    let loc = node.children[n].loc;
                    self.error_param_mismatch(loc, n, &site, &param_dt, arg);
                }
            }
        }
        Value::rvalue(result)
    }

    fn value_literal(&mut self, node: &mut Ast) -> Value {
        match node.lit_class {
            Some(LiteralClass::Int) => Value::rvalue(Type::basic(self.tab, Builtin::Int)),
            Some(LiteralClass::Bool) => Value::rvalue(Type::basic(self.tab, Builtin::Bool)),
            Some(LiteralClass::Str) => {
                Value::rvalue(Type::basic(self.tab, Builtin::Char).derive_ptr())
            }
            Some(LiteralClass::Ident) => match node.symbol {
                Some(sym) => {
                    let dt = self.tab.get(sym).dt.clone().unwrap_or(Type::Invalid);
                    Value::lvalue(dt)
                }
                None => Value::invalid(),
            },
            Some(LiteralClass::Array) => self.value_array_literal(node),
            Some(LiteralClass::Init) | None => {
                self.unhandled(node.loc, "value", "literal class");
                Value::invalid()
            }
        }
    }

    /// Array literals: every element must agree with the first; the
    /// element type is the unified fold over all of them.
    fn value_array_literal(&mut self, node: &mut Ast) -> Value {
        let count = node.children.len();
        let mut elem: Option<Type> = None;
        for i in 0..count {
            let v = self.value(&mut node.children[i]);
            elem = Some(match elem {
                None => v.dt,
                Some(prev) => {
                    if prev.is_compatible(&v.dt, self.tab) {
                        Type::derive_unified(self.tab, &prev, &v.dt)
                    } else {
                        let loc = node.children[i].loc;
                        self.error_mismatch(loc, "array literal", &prev, &v.dt);
                        Type::Invalid
                    }
                }
            });
        }
        Value::rvalue(elem.unwrap_or(Type::Invalid).derive_array(count))
    }
}
