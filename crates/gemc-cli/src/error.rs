//! CLI-level errors: the I/O and decode failures that sit in front of the
//! middle-end's own `CompError`/`gemc_compiler::Error`. Only the driver
//! converts a diagnostic into a process exit code.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode IR from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
