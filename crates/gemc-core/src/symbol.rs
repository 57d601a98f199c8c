//! `Symbol` and `SymbolTable`.
//!
//! `Symbol` is generic over its `value` payload so that `gemc-core` does not
//! need to depend on the IR crate; `gemc-ir` instantiates it with `Node`.
//! Intrinsics and native-library functions are represented the same way as
//! user-defined ones - a `Node::Function` with `body: None` - so a single
//! payload type is enough; no separate callable-descriptor variant is
//! needed.

use indexmap::IndexMap;
use std::path::PathBuf;

use crate::types::Type;

/// A named entry in a scope. `V` is the pass-specific value payload.
#[derive(Debug, Clone)]
pub struct Symbol<V> {
    pub name: String,
    pub ty: Type,
    pub value: V,
    pub is_mutable: bool,
    pub source_file: Option<PathBuf>,
}

impl<V> Symbol<V> {
    pub fn new(name: impl Into<String>, ty: Type, value: V) -> Self {
        Self {
            name: name.into(),
            ty,
            value,
            is_mutable: false,
            source_file: None,
        }
    }

    pub fn mutable(mut self, is_mutable: bool) -> Self {
        self.is_mutable = is_mutable;
        self
    }

    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }
}

/// Insertion-ordered map of unique names to [`Symbol`] records.
///
/// Determinism requires insertion-order iteration, hence
/// `indexmap::IndexMap` rather than `std::collections::HashMap`.
#[derive(Debug, Clone)]
pub struct SymbolTable<V> {
    entries: IndexMap<String, Symbol<V>>,
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V: Clone> SymbolTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: Symbol<V>) {
        self.entries.insert(symbol.name.clone(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol<V>> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol<V>> {
        self.entries.get_mut(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Symbol<V>> {
        self.entries.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol<V>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `other` into `self`, last-writer-wins.
    pub fn merge(&mut self, other: &SymbolTable<V>) {
        for (name, symbol) in other.iter() {
            self.entries.insert(name.clone(), symbol.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_last_writer_wins() {
        let mut a = SymbolTable::new();
        a.add(Symbol::new("x", Type::new("int"), 1));
        let mut b = SymbolTable::new();
        b.add(Symbol::new("x", Type::new("int"), 2));
        b.add(Symbol::new("y", Type::new("int"), 3));

        a.merge(&b);
        assert_eq!(a.get("x").unwrap().value, 2);
        assert_eq!(a.get("y").unwrap().value, 3);
    }

    #[test]
    fn iteration_is_insertion_ordered() {
        let mut table = SymbolTable::new();
        table.add(Symbol::new("b", Type::new("int"), 1));
        table.add(Symbol::new("a", Type::new("int"), 2));
        let names: Vec<_> = table.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
