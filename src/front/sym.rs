//! The symbol table: an arena of symbols forming the scope tree.
//!
//! Children are owned index lists and parents are back-indices, so record
//! fields, parameters and nested scopes all hang off their defining
//! symbol without reference cycles.

use super::types::Type;

/// Handle into the arena. Symbols are never removed, so handles stay
/// valid for the table's whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymKind {
    Scope,
    Type,
    Struct,
    Union,
    Enum,
    Id,
    Param,
}

impl SymKind {
    /// Kinds whose name can open a declaration.
    pub fn is_type(self) -> bool {
        matches!(self, SymKind::Type | SymKind::Struct | SymKind::Union | SymKind::Enum)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    Auto,
    Static,
    Extern,
}

/// The scalar types every module starts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Void,
    Bool,
    Char,
    Int,
}

#[derive(Debug)]
pub struct Symbol {
    pub ident: String,
    pub kind: SymKind,
    pub dt: Option<Type>,
    pub parent: Option<SymId>,
    pub children: Vec<SymId>,
    pub storage: Storage,
    // Filled in by the backend during layout.
    pub offset: i64,
    pub size: usize,
    pub label: Option<String>,
}

#[derive(Debug)]
pub struct SymTable {
    syms: Vec<Symbol>,
    root: SymId,
    builtins: [SymId; 4],
}

impl SymTable {
    /// A fresh table: a root scope holding the builtin scalar types.
    pub fn new() -> SymTable {
        let root_sym = Symbol {
            ident: String::new(),
            kind: SymKind::Scope,
            dt: None,
            parent: None,
            children: Vec::new(),
            storage: Storage::Static,
            offset: 0,
            size: 0,
            label: None,
        };
        let mut tab = SymTable { syms: vec![root_sym], root: SymId(0), builtins: [SymId(0); 4] };
        for (i, name) in ["void", "bool", "char", "int"].iter().enumerate() {
            tab.builtins[i] = tab.add(tab.root, name, SymKind::Type, Storage::Static);
        }
        tab
    }

    pub fn root(&self) -> SymId {
        self.root
    }

    pub fn builtin(&self, b: Builtin) -> SymId {
        self.builtins[b as usize]
    }

    pub fn add(&mut self, parent: SymId, ident: &str, kind: SymKind, storage: Storage) -> SymId {
        let id = SymId(self.syms.len() as u32);
        self.syms.push(Symbol {
            ident: ident.to_string(),
            kind,
            dt: None,
            parent: Some(parent),
            children: Vec::new(),
            storage,
            offset: 0,
            size: 0,
            label: None,
        });
        self.syms[parent.0 as usize].children.push(id);
        id
    }

    pub fn get(&self, id: SymId) -> &Symbol {
        &self.syms[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymId) -> &mut Symbol {
        &mut self.syms[id.0 as usize]
    }

    /// Innermost-first lookup: the scope's own children, then its
    /// ancestors'. Shadowing needs no diagnostic.
    pub fn find(&self, scope: SymId, ident: &str) -> Option<SymId> {
        let mut at = Some(scope);
        while let Some(s) = at {
            if let Some(hit) = self.child(s, ident) {
                return Some(hit);
            }
            at = self.get(s).parent;
        }
        None
    }

    /// The given scope only, for redefinition checks.
    pub fn find_local(&self, scope: SymId, ident: &str) -> Option<SymId> {
        self.child(scope, ident)
    }

    /// Direct child lookup, used for record fields and parameters.
    pub fn child(&self, of: SymId, ident: &str) -> Option<SymId> {
        if ident.is_empty() {
            return None;
        }
        self.get(of).children.iter().copied().find(|&c| self.get(c).ident == ident)
    }

    /// A function symbol's parameters, in declaration order.
    pub fn params(&self, of: SymId) -> Vec<SymId> {
        self.get(of)
            .children
            .iter()
            .copied()
            .filter(|&c| self.get(c).kind == SymKind::Param)
            .collect()
    }
}

impl Default for SymTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_live_in_the_root() {
        let tab = SymTable::new();
        let int = tab.find(tab.root(), "int");
        assert_eq!(int, Some(tab.builtin(Builtin::Int)));
        assert_eq!(tab.get(int.unwrap()).kind, SymKind::Type);
    }

    #[test]
    fn lookup_prefers_the_inner_scope() {
        let mut tab = SymTable::new();
        let outer = tab.add(tab.root(), "x", SymKind::Id, Storage::Static);
        let scope = tab.add(tab.root(), "", SymKind::Scope, Storage::Auto);
        let inner = tab.add(scope, "x", SymKind::Id, Storage::Auto);
        assert_eq!(tab.find(scope, "x"), Some(inner));
        assert_eq!(tab.find(tab.root(), "x"), Some(outer));
    }

    #[test]
    fn lookup_ascends_when_missing_locally() {
        let mut tab = SymTable::new();
        let scope = tab.add(tab.root(), "", SymKind::Scope, Storage::Auto);
        assert_eq!(tab.find(scope, "int"), Some(tab.builtin(Builtin::Int)));
        assert_eq!(tab.find_local(scope, "int"), None);
    }

    #[test]
    fn params_filter_out_locals() {
        let mut tab = SymTable::new();
        let f = tab.add(tab.root(), "f", SymKind::Id, Storage::Static);
        let a = tab.add(f, "a", SymKind::Param, Storage::Auto);
        tab.add(f, "tmp", SymKind::Id, Storage::Auto);
        let b = tab.add(f, "b", SymKind::Param, Storage::Auto);
        assert_eq!(tab.params(f), vec![a, b]);
    }
}
