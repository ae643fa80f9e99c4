use std::collections::HashMap;

use super::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Global,
    Param,
    // No grammar construct declares locals yet.
    #[allow(dead_code)]
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SymbolKind {
    Function,
    Parameter,
    // No grammar construct declares locals yet.
    #[allow(dead_code)]
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute<'src> {
    pub id: &'src str,
    pub scope: ScopeKind,
    pub kind: SymbolKind,
    pub ty: Type,
}

impl<'src> Attribute<'src> {
    pub fn new(id: &'src str, scope: ScopeKind, kind: SymbolKind, ty: Type) -> Self {
        Self {
            id,
            scope,
            kind,
            ty,
        }
    }
}

pub(crate) type Scope<'src> = HashMap<&'src str, Attribute<'src>>;

/// Stack of scopes; the bottom one is the global scope and lives as long as
/// the table. Lookups go innermost to outermost.
#[derive(Debug)]
pub(crate) struct SymbolTable<'src> {
    scopes: Vec<Scope<'src>>,
}

impl<'src> SymbolTable<'src> {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
        log::trace!("enter scope (depth {})", self.depth());
    }

    /// Drops the innermost scope and everything declared in it. The global
    /// scope is never popped.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() == 1 {
            log::warn!("attempted to exit the global scope");
            return;
        }
        self.scopes.pop();
        log::trace!("exit scope (depth {})", self.depth());
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Inserts into the innermost scope, replacing any entry of the same name
    /// in that scope.
    pub fn insert(&mut self, id: &'src str, attr: Attribute<'src>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(id, attr);
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&Attribute<'src>> {
        self.scopes.iter().rev().find_map(|scope| scope.get(id))
    }

    pub fn lookup_current(&self, id: &str) -> Option<&Attribute<'src>> {
        self.scopes.last().and_then(|scope| scope.get(id))
    }
}

#[cfg(test)]
mod test {
    use super::{Attribute, ScopeKind, SymbolKind, SymbolTable};
    use crate::syntax::types::Type;

    fn param(id: &str, ty: Type) -> Attribute {
        Attribute::new(id, ScopeKind::Param, SymbolKind::Parameter, ty)
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut table = SymbolTable::new();
        table.insert(
            "x",
            Attribute::new("x", ScopeKind::Global, SymbolKind::Variable, Type::Int),
        );

        table.enter_scope();
        table.insert("x", param("x", Type::Float));
        assert_eq!(table.lookup("x").unwrap().ty, Type::Float);
        assert_eq!(table.lookup_current("x").unwrap().scope, ScopeKind::Param);

        table.exit_scope();
        assert_eq!(table.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn exit_scope_discards_entries() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.insert("a", param("a", Type::Int));
        table.enter_scope();
        table.insert(
            "b",
            Attribute::new("b", ScopeKind::Local, SymbolKind::Variable, Type::Bool),
        );
        assert!(table.lookup("a").is_some());
        assert!(table.lookup_current("a").is_none());

        table.exit_scope();
        assert!(table.lookup("b").is_none());
        table.exit_scope();
        assert!(table.lookup("a").is_none());
        assert_eq!(table.depth(), 1);
    }

    #[test]
    fn insert_replaces_within_scope() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.insert("a", param("a", Type::Int));
        table.insert("a", param("a", Type::Float));
        assert_eq!(table.lookup("a").unwrap().ty, Type::Float);
    }

    #[test]
    fn global_scope_survives_exit() {
        let mut table = SymbolTable::new();
        table.insert(
            "f",
            Attribute::new(
                "f",
                ScopeKind::Global,
                SymbolKind::Function,
                Type::function(vec![], Type::Void),
            ),
        );
        table.exit_scope();
        assert_eq!(table.depth(), 1);
        assert!(table.lookup("f").is_some());
    }
}
