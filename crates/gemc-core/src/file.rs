//! Per-file compilation context.

use std::path::{Path, PathBuf};

use crate::scope::Scope;

/// Compile options. All booleans, mirroring the original
/// implementation's `GemCompileOptions`/`CompileOptions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompileOptions {
    pub clean: bool,
    pub optimize: bool,
    pub debug: bool,
    pub no_stdlib: bool,
}

/// Artefacts accumulated by downstream passes/backend. Treated as an opaque
/// sink by the middle-end - only object-file path bookkeeping is
/// modeled here, matching the original `codegen_data.object_files`.
#[derive(Debug, Clone, Default)]
pub struct CodegenData {
    pub object_files: Vec<PathBuf>,
}

/// `{path, scope, options, codegen_data}`. Generic over the
/// scope's symbol payload `V`, same reason `Scope<V>` is generic.
#[derive(Debug, Clone)]
pub struct File<V> {
    pub path: PathBuf,
    pub scope: Scope<V>,
    pub options: CompileOptions,
    pub codegen_data: CodegenData,
    /// Paths of modules currently being imported on the way to this file,
    /// innermost last. Threaded into each recursively-constructed `File`
    /// when a `use` resolves to a source file, so the module loader can
    /// detect cycles (see DESIGN.md).
    pub import_stack: Vec<PathBuf>,
    source: String,
}

impl<V: Clone> File<V> {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>, scope: Scope<V>, options: CompileOptions) -> Self {
        Self {
            path: path.into(),
            scope,
            options,
            codegen_data: CodegenData::default(),
            import_stack: Vec::new(),
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render a `CompError` against this file's text and path as
    /// `<source line>\n<caret>\nerror: <msg>`.
    pub fn render_error(&self, err: &crate::position::CompError) -> String {
        err.render(&self.path.to_string_lossy(), &self.source)
    }

    pub fn render_error_colored(&self, err: &crate::position::CompError, colorize: bool) -> String {
        err.render_colored(&self.path.to_string_lossy(), &self.source, colorize)
    }
}
