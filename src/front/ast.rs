//! The AST: one node shape for every construct, discriminated by
//! `AstClass`. Ordered children plus the two distinguished `l`/`r` slots
//! cover every production; `symbol` back-references are weak handles into
//! the symbol arena and `dt` is filled by the analyzer.

use super::sym::SymId;
use super::token::Loc;
use super::types::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AstClass {
    Module,
    FnImpl,
    Decl,
    DeclStruct,
    Struct,
    Union,
    Code,
    Branch,
    Loop,
    Iter,
    Return,
    Break,
    Bop,
    Uop,
    Top,
    Index,
    Call,
    Literal,
    Empty,
    Invalid,
}

impl AstClass {
    /// The classes the expression analyzer knows how to type.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            AstClass::Bop
                | AstClass::Uop
                | AstClass::Top
                | AstClass::Index
                | AstClass::Call
                | AstClass::Literal
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralClass {
    Int,
    Bool,
    Ident,
    Str,
    Array,
    Init,
}

/// Operators as a dense enum; the text survives only for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Comma,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Not,
    BitNot,
    Incr,
    Decr,
    Deref,
    AddrOf,
    Dot,
    Arrow,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Comma => ",",
            Op::Assign => "=",
            Op::AddAssign => "+=",
            Op::SubAssign => "-=",
            Op::MulAssign => "*=",
            Op::DivAssign => "/=",
            Op::ModAssign => "%=",
            Op::AndAssign => "&=",
            Op::OrAssign => "|=",
            Op::XorAssign => "^=",
            Op::ShlAssign => "<<=",
            Op::ShrAssign => ">>=",
            Op::LogicalOr => "||",
            Op::LogicalAnd => "&&",
            Op::BitOr => "|",
            Op::BitXor => "^",
            Op::BitAnd => "&",
            Op::Equal => "==",
            Op::NotEqual => "!=",
            Op::Less => "<",
            Op::Greater => ">",
            Op::LessEqual => "<=",
            Op::GreaterEqual => ">=",
            Op::Shl => "<<",
            Op::Shr => ">>",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Not => "!",
            Op::BitNot => "~",
            Op::Incr => "++",
            Op::Decr => "--",
            Op::Deref => "*",
            Op::AddrOf => "&",
            Op::Dot => ".",
            Op::Arrow => "->",
        }
    }

    /// Binary operators that act on numeric operands, compound
    /// assignments included.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Op::Add
                | Op::Sub
                | Op::Mul
                | Op::Div
                | Op::Mod
                | Op::BitAnd
                | Op::BitOr
                | Op::BitXor
                | Op::Shl
                | Op::Shr
                | Op::AddAssign
                | Op::SubAssign
                | Op::MulAssign
                | Op::DivAssign
                | Op::ModAssign
                | Op::AndAssign
                | Op::OrAssign
                | Op::XorAssign
                | Op::ShlAssign
                | Op::ShrAssign
        )
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Op::Assign
                | Op::AddAssign
                | Op::SubAssign
                | Op::MulAssign
                | Op::DivAssign
                | Op::ModAssign
                | Op::AndAssign
                | Op::OrAssign
                | Op::XorAssign
                | Op::ShlAssign
                | Op::ShrAssign
        )
    }

    /// Defines an ordering of its operands.
    pub fn is_ordinal(self) -> bool {
        matches!(self, Op::Less | Op::Greater | Op::LessEqual | Op::GreaterEqual)
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Op::Equal | Op::NotEqual)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Op::LogicalOr | Op::LogicalAnd)
    }

    /// Accesses a record member of its LHS.
    pub fn is_member(self) -> bool {
        matches!(self, Op::Dot | Op::Arrow)
    }
}

#[derive(Clone, Debug)]
pub struct Ast {
    pub class: AstClass,
    pub loc: Loc,
    pub children: Vec<Ast>,
    pub l: Option<Box<Ast>>,
    pub r: Option<Box<Ast>>,
    pub op: Option<Op>,
    pub lit_class: Option<LiteralClass>,
    /// Raw text of identifier and integer literals.
    pub literal: String,
    pub symbol: Option<SymId>,
    pub dt: Option<Type>,
}

impl Ast {
    pub fn new(class: AstClass, loc: Loc) -> Ast {
        Ast {
            class,
            loc,
            children: Vec::new(),
            l: None,
            r: None,
            op: None,
            lit_class: None,
            literal: String::new(),
            symbol: None,
            dt: None,
        }
    }

    pub fn empty(loc: Loc) -> Ast {
        Ast::new(AstClass::Empty, loc)
    }

    pub fn invalid(loc: Loc) -> Ast {
        Ast::new(AstClass::Invalid, loc)
    }

    pub fn literal(loc: Loc, class: LiteralClass, text: &str) -> Ast {
        let mut node = Ast::new(AstClass::Literal, loc);
        node.lit_class = Some(class);
        node.literal = text.to_string();
        node
    }

    pub fn bop(loc: Loc, op: Op, l: Ast, r: Ast) -> Ast {
        let mut node = Ast::new(AstClass::Bop, loc);
        node.op = Some(op);
        node.l = Some(Box::new(l));
        node.r = Some(Box::new(r));
        node
    }

    pub fn uop(loc: Loc, op: Op, r: Ast) -> Ast {
        let mut node = Ast::new(AstClass::Uop, loc);
        node.op = Some(op);
        node.r = Some(Box::new(r));
        node
    }

    /// Ternary: the condition is the first child, the arms sit in `l`/`r`.
    pub fn top(loc: Loc, cond: Ast, l: Ast, r: Ast) -> Ast {
        let mut node = Ast::new(AstClass::Top, loc);
        node.children.push(cond);
        node.l = Some(Box::new(l));
        node.r = Some(Box::new(r));
        node
    }

    pub fn index(loc: Loc, base: Ast, idx: Ast) -> Ast {
        let mut node = Ast::new(AstClass::Index, loc);
        node.l = Some(Box::new(base));
        node.r = Some(Box::new(idx));
        node
    }

    pub fn add(&mut self, child: Ast) {
        self.children.push(child);
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
