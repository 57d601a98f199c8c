//! A backend that counts the functions it was handed instead of emitting
//! anything real. Code generation is out of scope for this workspace;
//! `build` exists to exercise the `Backend` seam end to end, so it needs
//! *some* implementation to call - this one stands in for it, the way a
//! no-op fixture backend would in tests.

use gemc_compiler::backend::Backend;
use gemc_ir::{CompError, IrFile, Node, Program};

pub struct NullBackend;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullArtefact {
    pub function_count: usize,
}

impl Backend for NullBackend {
    type Artefact = NullArtefact;

    fn emit(&self, _file: &IrFile, program: &Program) -> Result<Self::Artefact, CompError> {
        let function_count = program.nodes.iter().filter(|n| matches!(n, Node::Function(_))).count();
        Ok(NullArtefact { function_count })
    }
}
