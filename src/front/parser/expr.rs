//! Expression parsing, standard C precedence: comma < assignment <
//! ternary < logical < bitwise < equality < relational < shift <
//! additive < multiplicative < unary < postfix < primary.

use super::Parser;
use crate::front::ast::{Ast, AstClass, LiteralClass, Op};

const ASSIGN_OPS: &[(&str, Op)] = &[
    ("=", Op::Assign),
    ("+=", Op::AddAssign),
    ("-=", Op::SubAssign),
    ("*=", Op::MulAssign),
    ("/=", Op::DivAssign),
    ("%=", Op::ModAssign),
    ("&=", Op::AndAssign),
    ("|=", Op::OrAssign),
    ("^=", Op::XorAssign),
    ("<<=", Op::ShlAssign),
    (">>=", Op::ShrAssign),
];

const UNARY_OPS: &[(&str, Op)] = &[
    ("++", Op::Incr),
    ("--", Op::Decr),
    ("+", Op::Add),
    ("-", Op::Sub),
    ("!", Op::Not),
    ("~", Op::BitNot),
    ("*", Op::Deref),
    ("&", Op::AddrOf),
];

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> Ast {
        self.parse_comma()
    }

    /// Assignment level: what argument lists, initializers and array
    /// bounds use, so a `,` stays a separator there.
    pub(super) fn parse_assign_expr(&mut self) -> Ast {
        self.parse_assign()
    }

    fn parse_comma(&mut self) -> Ast {
        let mut node = self.parse_assign();
        while self.is(",") {
            let loc = self.loc;
            self.advance();
            let rhs = self.parse_assign();
            node = Ast::bop(loc, Op::Comma, node, rhs);
        }
        node
    }

    fn parse_assign(&mut self) -> Ast {
        let node = self.parse_ternary();
        for &(text, op) in ASSIGN_OPS {
            if self.is(text) {
                let loc = self.loc;
                self.advance();
                // right-associative
                let rhs = self.parse_assign();
                return Ast::bop(loc, op, node, rhs);
            }
        }
        node
    }

    fn parse_ternary(&mut self) -> Ast {
        let cond = self.parse_logical_or();
        if self.is("?") {
            let loc = self.loc;
            self.advance();
            let then = self.parse_expr();
            self.match_text(":");
            let other = self.parse_ternary();
            return Ast::top(loc, cond, then, other);
        }
        cond
    }

    /// One left-associative binary level: a loop over the level below.
    fn parse_binary(&mut self, ops: &[(&str, Op)], next: fn(&mut Self) -> Ast) -> Ast {
        let mut node = next(self);
        'level: loop {
            for &(text, op) in ops {
                if self.is(text) {
                    let loc = self.loc;
                    self.advance();
                    let rhs = next(self);
                    node = Ast::bop(loc, op, node, rhs);
                    continue 'level;
                }
            }
            break;
        }
        node
    }

    fn parse_logical_or(&mut self) -> Ast {
        self.parse_binary(&[("||", Op::LogicalOr)], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Ast {
        self.parse_binary(&[("&&", Op::LogicalAnd)], Self::parse_bit_or)
    }

    fn parse_bit_or(&mut self) -> Ast {
        self.parse_binary(&[("|", Op::BitOr)], Self::parse_bit_xor)
    }

    fn parse_bit_xor(&mut self) -> Ast {
        self.parse_binary(&[("^", Op::BitXor)], Self::parse_bit_and)
    }

    fn parse_bit_and(&mut self) -> Ast {
        self.parse_binary(&[("&", Op::BitAnd)], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Ast {
        self.parse_binary(&[("==", Op::Equal), ("!=", Op::NotEqual)], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Ast {
        self.parse_binary(
            &[
                ("<", Op::Less),
                (">", Op::Greater),
                ("<=", Op::LessEqual),
                (">=", Op::GreaterEqual),
            ],
            Self::parse_shift,
        )
    }

    fn parse_shift(&mut self) -> Ast {
        self.parse_binary(&[("<<", Op::Shl), (">>", Op::Shr)], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Ast {
        self.parse_binary(&[("+", Op::Add), ("-", Op::Sub)], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Ast {
        self.parse_binary(
            &[("*", Op::Mul), ("/", Op::Div), ("%", Op::Mod)],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Ast {
        for &(text, op) in UNARY_OPS {
            if self.is(text) {
                let loc = self.loc;
                self.advance();
                let operand = self.parse_unary();
                return Ast::uop(loc, op, operand);
            }
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Ast {
        let mut node = self.parse_primary();
        loop {
            if self.is("(") {
                let loc = self.loc;
                self.advance();
                let mut call = Ast::new(AstClass::Call, loc);
                // direct calls carry the callee's symbol for arity and
                // parameter checking
                if node.class == AstClass::Literal {
                    call.symbol = node.symbol;
                }
                if !self.is(")") && !self.is_eof() {
                    loop {
                        call.add(self.parse_assign_expr());
                        if !self.try_match_text(",") {
                            break;
                        }
                    }
                }
                self.match_text(")");
                call.l = Some(Box::new(node));
                node = call;
            } else if self.is("[") {
                let loc = self.loc;
                self.advance();
                let idx = self.parse_expr();
                self.match_text("]");
                node = Ast::index(loc, node, idx);
            } else if self.is(".") || self.is("->") {
                let op = if self.is(".") { Op::Dot } else { Op::Arrow };
                let loc = self.loc;
                self.advance();
                // the field name resolves during analysis, against the
                // record's own children rather than the lexical scope
                let field_loc = self.loc;
                let name = self.match_ident();
                let field = Ast::literal(field_loc, LiteralClass::Ident, &name);
                node = Ast::bop(loc, op, node, field);
            } else if self.is("++") {
                let loc = self.loc;
                self.advance();
                node = Ast::uop(loc, Op::Incr, node);
            } else if self.is("--") {
                let loc = self.loc;
                self.advance();
                node = Ast::uop(loc, Op::Decr, node);
            } else {
                break;
            }
        }
        node
    }

    fn parse_primary(&mut self) -> Ast {
        let loc = self.loc;
        if self.try_match_text("(") {
            let node = self.parse_expr();
            self.match_text(")");
            node
        } else if self.is_int() {
            let text = self.cur.text.clone();
            self.advance();
            Ast::literal(loc, LiteralClass::Int, &text)
        } else if self.is("true") || self.is("false") {
            let text = self.cur.text.clone();
            self.advance();
            Ast::literal(loc, LiteralClass::Bool, &text)
        } else if self.cur.text.starts_with('"') {
            let text = self.cur.text.clone();
            self.advance();
            Ast::literal(loc, LiteralClass::Str, &text)
        } else if self.try_match_text("[") {
            let mut node = Ast::literal(loc, LiteralClass::Array, "");
            if !self.is("]") && !self.is_eof() {
                loop {
                    node.add(self.parse_assign_expr());
                    if !self.try_match_text(",") {
                        break;
                    }
                }
            }
            self.match_text("]");
            node
        } else if self.try_match_text("{") {
            let mut node = Ast::literal(loc, LiteralClass::Init, "");
            if !self.is("}") && !self.is_eof() {
                loop {
                    node.add(self.parse_assign_expr());
                    if !self.try_match_text(",") {
                        break;
                    }
                }
            }
            self.match_text("}");
            node
        } else if self.is_ident() {
            match self.tab.find(self.scope, &self.cur.text) {
                Some(sym) if self.tab.get(sym).kind.is_type() => {
                    // a type name is only legal inside a declaration
                    self.error_ident_outside_decl();
                    self.advance();
                    Ast::invalid(loc)
                }
                Some(sym) => {
                    let text = self.cur.text.clone();
                    self.advance();
                    let mut node = Ast::literal(loc, LiteralClass::Ident, &text);
                    node.symbol = Some(sym);
                    node
                }
                None => {
                    self.error_undef_sym();
                    self.advance();
                    Ast::invalid(loc)
                }
            }
        } else {
            self.error_expected("expression");
            self.advance();
            Ast::invalid(loc)
        }
    }
}
