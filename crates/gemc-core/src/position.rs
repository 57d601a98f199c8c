//! Source coordinates and the fatal-diagnostic type every pass returns.

use std::fmt;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use serde::{Deserialize, Serialize};

/// A `(line, column)` pair, both 1-based, identifying where an IR node came
/// from in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Placeholder position for compiler-synthesised nodes (intrinsic
    /// declarations, desugared calls) that have no source counterpart.
    pub const fn synthetic() -> Self {
        Self { line: 0, column: 0 }
    }

    pub fn is_synthetic(self) -> bool {
        self.line == 0
    }

    /// Build a fatal compilation diagnostic. Passes return this wrapped in
    /// `Err` rather than calling `process::exit` themselves - only the
    /// driver decides how a `CompError` ends the process.
    pub fn comptime_error(self, message: impl Into<String>) -> CompError {
        CompError {
            pos: self,
            message: message.into(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A fatal, non-recoverable compilation error anchored at a [`Position`].
///
/// Every pass function that can fail returns `Result<T, CompError>`. There
/// is no recovery protocol: the first `CompError` produced aborts the
/// compilation. No exceptions are used for control flow.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct CompError {
    pub pos: Position,
    pub message: String,
}

impl CompError {
    pub fn new(pos: Position, message: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
        }
    }

    /// Render as `<source line>\n<caret>\nerror: <msg>`.
    ///
    /// `source` is the full text of the file the error was raised against.
    /// Lines are 1-based and the caret is placed at `self.pos.column`
    /// (0-based byte offset within the line).
    pub fn render(&self, path: &str, source: &str) -> String {
        self.render_colored(path, source, true)
    }

    /// Same as [`Self::render`], but lets the driver disable ANSI styling
    /// (e.g. when output isn't a terminal, per `--color`).
    pub fn render_colored(&self, path: &str, source: &str, colorize: bool) -> String {
        if self.pos.is_synthetic() {
            return format!("error: {}", self.message);
        }

        let Some(line_text) = source.lines().nth(self.pos.line - 1) else {
            return format!("{path}:{}: error: {}", self.pos, self.message);
        };

        let start = self.pos.column.min(line_text.len());
        let end = (start + 1).min(line_text.len().max(start));
        let renderer = if colorize { Renderer::styled() } else { Renderer::plain() };
        let snippet = Snippet::source(line_text)
            .line_start(self.pos.line)
            .path(path)
            .annotation(AnnotationKind::Primary.span(start..end).label(&self.message));
        let group = Level::ERROR.primary_title(&self.message).element(snippet);
        renderer.render(&[group])
    }
}
