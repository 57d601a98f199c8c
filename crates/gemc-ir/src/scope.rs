//! Type aliases instantiating [`gemc_core`]'s generic scope/symbol types
//! with the IR's [`Node`] as the symbol payload: a symbol's `value` is an
//! IR node for user-level variables/functions.

use crate::node::Node;

pub type IrSymbol = gemc_core::Symbol<Node>;
pub type IrSymbolTable = gemc_core::SymbolTable<Node>;
pub type IrScope = gemc_core::Scope<Node>;
pub type IrFile = gemc_core::File<Node>;
