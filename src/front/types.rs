//! The type algebra: value-semantic descriptors, derivations and the
//! predicate matrix the analyzer checks against.
//!
//! Every predicate accepts `Invalid`, so one upstream error yields one
//! diagnostic instead of a cascade. The exceptions are `is_invalid`
//! itself and `is_void`, whose only caller wants `Invalid` to pass as
//! non-void.

use super::sym::{Builtin, SymId, SymKind, SymTable};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// A scalar, record or enum symbol.
    Basic(SymId),
    Ptr(Box<Type>),
    Array(Box<Type>, usize),
    /// Return type and parameter count; the parameter types live on the
    /// function symbol's `Param` children.
    Function(Box<Type>, usize),
    /// The bottom type produced after an error.
    Invalid,
}

fn numeric_family(tab: &SymTable, s: SymId) -> bool {
    s == tab.builtin(Builtin::Int)
        || s == tab.builtin(Builtin::Char)
        || s == tab.builtin(Builtin::Bool)
        || tab.get(s).kind == SymKind::Enum
}

fn rank(tab: &SymTable, t: &Type) -> u32 {
    match t {
        Type::Basic(s) if *s == tab.builtin(Builtin::Bool) => 1,
        Type::Basic(s) if *s == tab.builtin(Builtin::Char) => 2,
        Type::Basic(_) => 3,
        _ => 0,
    }
}

impl Type {
    pub fn basic(tab: &SymTable, b: Builtin) -> Type {
        Type::Basic(tab.builtin(b))
    }

    /*:::: DERIVATIONS ::::*/
    /*Each one produces a fresh, independently owned descriptor.*/

    pub fn derive_from(&self) -> Type {
        self.clone()
    }

    pub fn derive_ptr(&self) -> Type {
        Type::Ptr(Box::new(self.clone()))
    }

    pub fn derive_array(&self, len: usize) -> Type {
        Type::Array(Box::new(self.clone()), len)
    }

    /// Base of a pointer or array; `Invalid` otherwise.
    pub fn derive_base(&self) -> Type {
        match self {
            Type::Ptr(base) | Type::Array(base, _) => (**base).clone(),
            _ => Type::Invalid,
        }
    }

    /// Return type of a function, looking through one level of pointer.
    pub fn derive_return(&self) -> Type {
        match self {
            Type::Function(ret, _) => (**ret).clone(),
            Type::Ptr(base) => match &**base {
                Type::Function(ret, _) => (**ret).clone(),
                _ => Type::Invalid,
            },
            _ => Type::Invalid,
        }
    }

    /// The "wider" of two compatible operands: a pointer wins, otherwise
    /// the numeric with the higher rank.
    pub fn derive_from_two(tab: &SymTable, l: &Type, r: &Type) -> Type {
        if l.is_invalid() || r.is_invalid() {
            return Type::Invalid;
        }
        if matches!(l, Type::Ptr(_)) {
            return l.clone();
        }
        if matches!(r, Type::Ptr(_)) {
            return r.clone();
        }
        if rank(tab, l) >= rank(tab, r) {
            l.clone()
        } else {
            r.clone()
        }
    }

    /// Result unification for the ternary operator, same rule.
    pub fn derive_unified(tab: &SymTable, l: &Type, r: &Type) -> Type {
        Type::derive_from_two(tab, l, r)
    }

    /*:::: PREDICATES ::::*/

    pub fn is_invalid(&self) -> bool {
        matches!(self, Type::Invalid)
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Type::Basic(_) | Type::Invalid)
    }

    pub fn is_ptr(&self) -> bool {
        matches!(self, Type::Ptr(_) | Type::Invalid)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_, _) | Type::Invalid)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function(_, _) | Type::Invalid)
    }

    pub fn is_numeric(&self, tab: &SymTable) -> bool {
        match self {
            Type::Invalid => true,
            Type::Basic(s) => numeric_family(tab, *s),
            _ => false,
        }
    }

    pub fn is_ordinal(&self, tab: &SymTable) -> bool {
        self.is_numeric(tab) || matches!(self, Type::Ptr(_))
    }

    pub fn is_equality(&self, tab: &SymTable) -> bool {
        self.is_ordinal(tab)
    }

    /// Usable as a branch or loop test.
    pub fn is_condition(&self, tab: &SymTable) -> bool {
        self.is_equality(tab)
    }

    pub fn is_callable(&self) -> bool {
        match self {
            Type::Invalid | Type::Function(_, _) => true,
            Type::Ptr(base) => matches!(**base, Type::Function(_, _)),
            _ => false,
        }
    }

    /// Anything non-function and non-void can sit on either side of an
    /// assignment.
    pub fn is_assignment(&self, tab: &SymTable) -> bool {
        match self {
            Type::Invalid => true,
            Type::Function(_, _) => false,
            t => !t.is_void(tab),
        }
    }

    pub fn is_record(&self, tab: &SymTable) -> bool {
        match self {
            Type::Invalid => true,
            Type::Basic(s) => matches!(tab.get(*s).kind, SymKind::Struct | SymKind::Union),
            _ => false,
        }
    }

    /// Note: deliberately false for `Invalid`, so the comma operator's
    /// non-void check lets `Invalid` through.
    pub fn is_void(&self, tab: &SymTable) -> bool {
        matches!(self, Type::Basic(s) if *s == tab.builtin(Builtin::Void))
    }

    /// The weakest relation under which two types may meet at a binary
    /// operator or assignment.
    pub fn is_compatible(&self, other: &Type, tab: &SymTable) -> bool {
        match (self, other) {
            (Type::Invalid, _) | (_, Type::Invalid) => true,
            (Type::Basic(a), Type::Basic(b)) => {
                a == b || (numeric_family(tab, *a) && numeric_family(tab, *b))
            }
            (Type::Ptr(a), Type::Ptr(b)) => {
                a.is_void(tab) || b.is_void(tab) || a.is_compatible(b, tab)
            }
            // arrays decay; lengths are not compared
            (Type::Array(a, _), Type::Ptr(b)) | (Type::Ptr(a), Type::Array(b, _)) => {
                a.is_compatible(b, tab)
            }
            (Type::Array(a, _), Type::Array(b, _)) => a.is_compatible(b, tab),
            (Type::Function(a, n), Type::Function(b, m)) => n == m && a.is_compatible(b, tab),
            // pointer arithmetic: a pointer may meet a numeric scalar
            (Type::Ptr(_), t) | (t, Type::Ptr(_)) => t.is_numeric(tab),
            _ => false,
        }
    }

    /*:::: RENDERING ::::*/

    /// C-style declaration rendering, used only in diagnostics:
    /// `to_str(tab, "x")` on `int*` gives "int *x".
    pub fn to_str(&self, tab: &SymTable, suffix: &str) -> String {
        match self {
            Type::Invalid => {
                if suffix.is_empty() {
                    "<invalid>".to_string()
                } else {
                    format!("<invalid> {}", suffix)
                }
            }
            Type::Basic(s) => {
                let sym = tab.get(*s);
                let name = match sym.kind {
                    SymKind::Struct => format!("struct {}", sym.ident),
                    SymKind::Union => format!("union {}", sym.ident),
                    SymKind::Enum => format!("enum {}", sym.ident),
                    _ => sym.ident.clone(),
                };
                if suffix.is_empty() {
                    name
                } else {
                    format!("{} {}", name, suffix)
                }
            }
            Type::Ptr(base) => base.to_str(tab, &format!("*{}", suffix)),
            Type::Array(base, len) => {
                let suffix = if suffix.starts_with('*') {
                    format!("({})[{}]", suffix, len)
                } else {
                    format!("{}[{}]", suffix, len)
                };
                base.to_str(tab, &suffix)
            }
            Type::Function(ret, _) => {
                let suffix = if suffix.starts_with('*') {
                    format!("({})()", suffix)
                } else {
                    format!("{}()", suffix)
                };
                ret.to_str(tab, &suffix)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(tab: &SymTable) -> Type {
        Type::basic(tab, Builtin::Int)
    }

    #[test]
    fn invalid_is_compatible_with_everything() {
        let tab = SymTable::new();
        let samples = [
            int(&tab),
            int(&tab).derive_ptr(),
            int(&tab).derive_array(4),
            Type::Function(Box::new(int(&tab)), 2),
            Type::Invalid,
        ];
        for t in &samples {
            assert!(t.is_compatible(&Type::Invalid, &tab));
            assert!(Type::Invalid.is_compatible(t, &tab));
        }
    }

    #[test]
    fn numeric_family_mixes() {
        let tab = SymTable::new();
        let bool_ = Type::basic(&tab, Builtin::Bool);
        assert!(int(&tab).is_compatible(&bool_, &tab));
        assert_eq!(Type::derive_from_two(&tab, &bool_, &int(&tab)), int(&tab));
    }

    #[test]
    fn pointers_unify_towards_the_pointer() {
        let tab = SymTable::new();
        let p = int(&tab).derive_ptr();
        assert!(p.is_compatible(&int(&tab), &tab));
        assert_eq!(Type::derive_from_two(&tab, &p, &int(&tab)), p);
        assert_eq!(Type::derive_from_two(&tab, &int(&tab), &p), p);
    }

    #[test]
    fn void_pointers_absorb() {
        let tab = SymTable::new();
        let vp = Type::basic(&tab, Builtin::Void).derive_ptr();
        let ip = int(&tab).derive_ptr();
        assert!(vp.is_compatible(&ip, &tab));
        assert!(ip.is_compatible(&vp, &tab));
        assert!(!ip.is_compatible(&int(&tab).derive_ptr().derive_ptr(), &tab));
    }

    #[test]
    fn arrays_meet_pointers_of_the_same_base() {
        let tab = SymTable::new();
        let arr = int(&tab).derive_array(8);
        assert!(arr.is_compatible(&int(&tab).derive_ptr(), &tab));
        assert!(!arr.is_compatible(&int(&tab).derive_ptr().derive_ptr(), &tab));
    }

    #[test]
    fn derive_base_and_return() {
        let tab = SymTable::new();
        assert_eq!(int(&tab).derive_ptr().derive_base(), int(&tab));
        assert_eq!(int(&tab).derive_array(3).derive_base(), int(&tab));
        assert_eq!(int(&tab).derive_base(), Type::Invalid);

        let f = Type::Function(Box::new(int(&tab)), 1);
        assert_eq!(f.derive_return(), int(&tab));
        assert_eq!(f.derive_ptr().derive_return(), int(&tab));
        assert_eq!(int(&tab).derive_return(), Type::Invalid);
    }

    #[test]
    fn derivations_are_independent() {
        let tab = SymTable::new();
        let original = int(&tab).derive_ptr();
        let copy = original.derive_from();
        drop(original);
        assert_eq!(copy, int(&tab).derive_ptr());
    }

    #[test]
    fn void_predicate_rejects_invalid() {
        let tab = SymTable::new();
        assert!(Type::basic(&tab, Builtin::Void).is_void(&tab));
        assert!(!Type::Invalid.is_void(&tab));
    }

    #[test]
    fn predicates_accept_invalid() {
        let tab = SymTable::new();
        assert!(Type::Invalid.is_numeric(&tab));
        assert!(Type::Invalid.is_ordinal(&tab));
        assert!(Type::Invalid.is_condition(&tab));
        assert!(Type::Invalid.is_callable());
        assert!(Type::Invalid.is_record(&tab));
        assert!(Type::Invalid.is_assignment(&tab));
    }

    #[test]
    fn rendering_reads_like_c() {
        let tab = SymTable::new();
        assert_eq!(int(&tab).to_str(&tab, "x"), "int x");
        assert_eq!(int(&tab).derive_ptr().to_str(&tab, "x"), "int *x");
        assert_eq!(int(&tab).derive_array(5).to_str(&tab, "x"), "int x[5]");
        assert_eq!(
            int(&tab).derive_array(5).derive_ptr().to_str(&tab, "x"),
            "int (*x)[5]"
        );
        assert_eq!(Type::Function(Box::new(int(&tab)), 0).to_str(&tab, ""), "int ()");
    }
}
