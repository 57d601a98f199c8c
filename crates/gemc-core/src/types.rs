//! Nominal types. `Type` is a nominal descriptor keyed by a `display`
//! string; equality is by that string.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A nominal type. Two `Type`s are equal iff their `display` strings match;
/// `Type` is otherwise an immutable, cheaply-clonable handle (an `Arc<str>`
/// pair), since passes copy types constantly while rebuilding the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Type {
    display: Arc<str>,
    /// Hint consumed only by the (external) backend - never inspected by
    /// the middle-end, but carried through so a backend can recover its
    /// own lowering without the middle-end needing to know what it means.
    backend_name: Arc<str>,
    reference: Option<Box<Type>>,
}

impl Type {
    pub fn new(display: impl Into<Arc<str>>) -> Self {
        let display = display.into();
        Self {
            backend_name: display.clone(),
            display,
            reference: None,
        }
    }

    pub fn with_backend_name(display: impl Into<Arc<str>>, backend_name: impl Into<Arc<str>>) -> Self {
        Self {
            display: display.into(),
            backend_name: backend_name.into(),
            reference: None,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// The type a `ReferenceType` wraps, or `self` if this is not a
    /// reference. Used to dereference `value.type` before attribute lookup
    ///.
    pub fn dereferenced(&self) -> &Type {
        self.reference.as_deref().unwrap_or(self)
    }

    /// Wrap `self` as `ReferenceType(self)`. Displayed distinctly
    /// so `Type::new("int").as_reference().display() == "&int"`.
    pub fn as_reference(&self) -> Type {
        if self.is_reference() {
            return self.clone();
        }
        Type {
            display: format!("&{}", self.display).into(),
            backend_name: self.backend_name.clone(),
            reference: Some(Box::new(self.clone())),
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.display == other.display
    }
}

impl Eq for Type {}

impl std::hash::Hash for Type {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.display.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Names of the built-ins pre-installed in any root `TypeMap`.
pub const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "nil", "any", "pointer", "function",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_display() {
        let a = Type::with_backend_name("int", "i64");
        let b = Type::with_backend_name("int", "i32");
        assert_eq!(a, b);
    }

    #[test]
    fn reference_displays_distinctly() {
        let int = Type::new("int");
        let r = int.as_reference();
        assert_ne!(r, int);
        assert!(r.is_reference());
        assert_eq!(r.dereferenced(), &int);
    }

    #[test]
    fn dereferencing_a_plain_type_is_identity() {
        let int = Type::new("int");
        assert_eq!(int.dereferenced(), &int);
    }

    #[test]
    fn double_reference_does_not_nest() {
        let int = Type::new("int");
        let r = int.as_reference();
        let rr = r.as_reference();
        assert_eq!(r, rr);
    }
}
