//! Compiler-level errors.
//!
//! `CompError` (from `gemc-ir`/`gemc-core`) covers every user-visible
//! diagnostic category. `Error` adds the one failure mode that isn't a
//! compile-time diagnostic at all: I/O failure while the module loader
//! resolves a `use` path, kept in its own variant rather than folded into
//! `CompError` since it has no source position to anchor a snippet on.

use std::path::PathBuf;

use gemc_ir::CompError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Comptime(#[from] CompError),

    #[error("failed to read module file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
