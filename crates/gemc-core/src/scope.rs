//! `Scope`: a nested symbol/type environment with copy-on-enter
//! semantics and the compiler's unique-name generator.

use std::rc::Rc;

use crate::symbol::{Symbol, SymbolTable};
use crate::typemap::TypeMap;

/// A symbol/type environment, nested by block. Child scopes clone their
/// parent's tables on construction - copy-on-write-ish, in that
/// modifications to the child never leak up; there is no shared parent
/// pointer for lookups, rather the root's type/symbol tables are frozen
/// into each descendant at creation time.
#[derive(Debug, Clone)]
pub struct Scope<V> {
    symbols: SymbolTable<V>,
    types: TypeMap,
    /// Shared with every scope in the same compilation so generated unique
    /// names stay pairwise distinct across sibling and parent/child scopes.
    unique_counter: Rc<std::cell::Cell<u64>>,
}

impl<V: Clone> Scope<V> {
    /// Construct the root scope for a compilation. `types` should already
    /// contain the builtins (`TypeMap::with_builtins`); intrinsics are
    /// installed into `symbols` separately by the registry.
    pub fn root(symbols: SymbolTable<V>, types: TypeMap) -> Self {
        Self {
            symbols,
            types,
            unique_counter: Rc::new(std::cell::Cell::new(0)),
        }
    }

    /// Create a child scope: clones `self`'s tables so mutations inside the
    /// child are invisible to `self` once the child is dropped (spec
    /// §4.1's "scoped primitive").
    pub fn make_child(&self) -> Self {
        Self {
            symbols: self.symbols.clone(),
            types: self.types.clone(),
            unique_counter: Rc::clone(&self.unique_counter),
        }
    }

    pub fn symbols(&self) -> &SymbolTable<V> {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable<V> {
        &mut self.symbols
    }

    pub fn types(&self) -> &TypeMap {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeMap {
        &mut self.types
    }

    pub fn get_symbol(&self, name: &str) -> Option<&Symbol<V>> {
        self.symbols.get(name)
    }

    pub fn get_type(&self, name: &str) -> Option<&crate::types::Type> {
        self.types.get(name)
    }

    /// A fresh compiler-synthesised name like `_1`, `_2`, ....
    pub fn unique_name(&self) -> String {
        let next = self.unique_counter.get() + 1;
        self.unique_counter.set(next);
        format!("_{next}")
    }

    /// Merge another scope's tables into `self`, last-writer-wins (spec
    /// §4.6 - used when a `Use` merges an imported module's scope).
    pub fn merge_from(&mut self, other: &Scope<V>) {
        self.symbols.merge(&other.symbols);
        self.types.merge(&other.types);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    #[test]
    fn unique_names_are_distinct_across_children() {
        let root: Scope<i32> = Scope::root(SymbolTable::new(), TypeMap::with_builtins());
        let child_a = root.make_child();
        let child_b = root.make_child();

        let mut names = vec![child_a.unique_name(), child_b.unique_name(), root.unique_name()];
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn child_mutation_does_not_leak_to_parent() {
        let mut root: Scope<i32> = Scope::root(SymbolTable::new(), TypeMap::with_builtins());
        let mut child = root.make_child();
        child.symbols_mut().add(Symbol::new("x", Type::new("int"), 1));

        assert!(child.get_symbol("x").is_some());
        assert!(root.get_symbol("x").is_none());

        root.symbols_mut().add(Symbol::new("y", Type::new("int"), 2));
        assert!(root.get_symbol("y").is_some());
    }

    #[test]
    fn child_inherits_parents_bindings_at_creation_time() {
        let mut root: Scope<i32> = Scope::root(SymbolTable::new(), TypeMap::with_builtins());
        root.symbols_mut().add(Symbol::new("x", Type::new("int"), 1));
        let child = root.make_child();
        assert!(child.get_symbol("x").is_some());
    }
}
