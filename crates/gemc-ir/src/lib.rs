//! IR node catalogue and pass-dispatch framework.
//!
//! - `node` - the tagged-union `Node` and its per-variant structs
//! - `scope` - `Node`-specialised `Scope`/`SymbolTable`/`File` aliases
//! - `pass` - the `Pass` trait, dispatch, and the scoped-child-scope helper

mod node;
mod pass;
mod scope;

pub use gemc_core::{CompError, CompileOptions, Position, Type};
pub use node::*;
pub use pass::{Pass, PassResult, with_child_scope};
pub use scope::{IrFile, IrScope, IrSymbol, IrSymbolTable};
