//! Build error types.

use std::path::PathBuf;

/// Errors that abort a unit of work.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid site configuration: {0}")]
    Config(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    #[error("Malformed page data in {path}: {message}")]
    DataError { path: PathBuf, message: String },

    #[error("Failed to render {} template(s): {}", .0.len(), render_summary(.0))]
    RenderError(Vec<RenderFailure>),

    #[error("Failed to write {path}: {message}")]
    WriteError { path: PathBuf, message: String },
}

/// A template that could not be rendered.
#[derive(Debug, Clone)]
pub struct RenderFailure {
    /// Template source path
    pub template: PathBuf,
    /// Engine error message
    pub message: String,
}

fn render_summary(failures: &[RenderFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.template.display(), f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl BuildError {
    pub(crate) fn read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::ReadError {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::WriteError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
