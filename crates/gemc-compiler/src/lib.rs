//! The gemc middle-end: semantic analysis, node expansion, memory
//! management, module loading, and the intrinsic registry.
//!
//! - `analyser` - name/type resolution, overloads, generics, `use`
//! - `node_expansion` - thin desugaring safety net
//! - `memory_manager` - ownership, moves, destructor insertion
//! - `intrinsics` - the fixed primitive-operation registry
//! - `modules` - `use` resolution: native libraries and source files
//! - `backend` - the contract code generation would implement
//! - `error` - the one non-diagnostic failure mode (I/O during module load)

pub mod analyser;
pub mod backend;
pub mod error;
pub mod intrinsics;
pub mod memory_manager;
pub mod modules;
pub mod node_expansion;

use std::rc::Rc;

use gemc_ir::{CompileOptions, IrFile, Node, Pass};

pub use analyser::Analyser;
pub use error::{Error, Result};
pub use memory_manager::MemoryManager;
pub use modules::ModuleLoader;
pub use node_expansion::NodeExpansion;

/// Run the full middle-end pipeline - parse output (`Program`) through
/// `Analyser`, `NodeExpansion`, and `MemoryManager`, ready for a backend -
/// over one already-parsed source file, returning the fully-lowered
/// program and the `File` context a backend needs alongside it.
pub fn compile(path: impl Into<std::path::PathBuf>, source: impl Into<String>, program: Node, options: CompileOptions, loader: Rc<ModuleLoader>) -> Result<(Node, IrFile)> {
    let file = IrFile::new(path, source, intrinsics::root_scope(), options);
    let (program, file) = Analyser::new(file, loader).analyse(program)?;
    let program = NodeExpansion::new().run_on(program)?;
    let program = MemoryManager::new(file.scope.clone()).run(program)?;
    Ok((program, file))
}
