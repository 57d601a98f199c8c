//! Shared input loading for the `check`/`dump`/`build` commands.

use std::path::Path;

use gemc_ir::Node;

use crate::error::Error;

/// Read a JSON-serialized `Node::Program` from disk alongside its raw text,
/// the latter kept only so a `CompError` has *something* to render a
/// caret-pointed snippet against - there is no original `.gem` source this
/// far past the (external) parser.
pub fn load_program(path: &Path) -> Result<(Node, String), Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let node = serde_json::from_str(&text).map_err(|source| Error::Decode { path: path.to_path_buf(), source })?;
    Ok((node, text))
}

/// Render a `CompError` against the raw input text and exit 1, the one spot
/// every command funnels a pipeline failure through - only the driver turns
/// a diagnostic into a process exit code.
pub fn report_and_exit(path: &Path, source: &str, colorize: bool, err: &gemc_ir::CompError) -> ! {
    eprint!("{}", err.render_colored(&path.to_string_lossy(), source, colorize));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gemc-cli-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn load_program_decodes_a_serialized_program() {
        let path = scratch_path("program.json");
        let program = Node::Program(gemc_ir::Program {
            pos: gemc_ir::Position::synthetic(),
            ty: gemc_core::Type::new("nil"),
            nodes: Vec::new(),
        });
        std::fs::write(&path, serde_json::to_string(&program).unwrap()).unwrap();

        let (loaded, text) = load_program(&path).unwrap();
        assert_eq!(loaded, program);
        assert!(!text.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_program_reports_missing_file_as_io_error() {
        let path = scratch_path("missing.json");
        let err = load_program(&path).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn load_program_reports_invalid_json_as_decode_error() {
        let path = scratch_path("garbage.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_program(&path).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));

        std::fs::remove_file(&path).ok();
    }
}
