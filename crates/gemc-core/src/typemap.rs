//! `TypeMap`: an insertion-ordered map of type names to [`Type`]s.

use indexmap::IndexMap;

use crate::types::{BUILTIN_TYPES, Type};

#[derive(Debug, Clone)]
pub struct TypeMap {
    entries: IndexMap<String, Type>,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl TypeMap {
    /// A fresh map pre-populated with the built-in primitive types that
    /// belong in every root type map.
    pub fn with_builtins() -> Self {
        let mut map = Self::default();
        for name in BUILTIN_TYPES {
            map.add(Type::new(*name));
        }
        map
    }

    pub fn add(&mut self, ty: Type) {
        self.entries.insert(ty.display().to_string(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.entries.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Type)> {
        self.entries.iter()
    }

    pub fn merge(&mut self, other: &TypeMap) {
        for (name, ty) in other.iter() {
            self.entries.insert(name.clone(), ty.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_present() {
        let map = TypeMap::with_builtins();
        for name in BUILTIN_TYPES {
            assert!(map.has(name), "missing builtin type {name}");
        }
    }

    #[test]
    fn custom_type_shadows_by_name() {
        let mut map = TypeMap::with_builtins();
        map.add(Type::with_backend_name("int", "i64"));
        assert_eq!(map.get("int").unwrap().backend_name(), "i64");
    }
}
