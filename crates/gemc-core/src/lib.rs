//! Core data structures for the gemc compiler middle-end.
//!
//! This crate provides the pieces that are independent of the IR node
//! taxonomy itself:
//! - `position` - source coordinates and the fatal diagnostic type
//! - `types` - nominal `Type`/`ReferenceType`
//! - `symbol` - `Symbol`/`SymbolTable`, generic over the IR's value payload
//! - `typemap` - `TypeMap`
//! - `scope` - nested symbol/type environment
//! - `file` - per-file compilation context and options

mod file;
mod position;
mod scope;
mod symbol;
mod typemap;
mod types;

pub use file::{CodegenData, CompileOptions, File};
pub use position::{CompError, Position};
pub use scope::Scope;
pub use symbol::{Symbol, SymbolTable};
pub use typemap::TypeMap;
pub use types::{BUILTIN_TYPES, Type};
