//! The backend contract: the pluggable consumer of
//! post-memory-manager IR. Code generation itself is out of scope; this
//! crate only pins the seam a real backend plugs into, as a narrow,
//! swappable call surface behind a trait rather than a concrete type.

use gemc_ir::{CompError, IrFile, Program};

/// A code generator consuming the middle-end's output. `Artefact` is left
/// opaque - a backend might produce an object file path, an in-memory
/// buffer, or nothing at all (a dry-run/analysis-only backend).
pub trait Backend {
    type Artefact;

    fn emit(&self, file: &IrFile, program: &Program) -> Result<Self::Artefact, CompError>;
}
