//! Build units for pagesmith sites.
//!
//! Renders page templates against a shared JSON data file, compiles Sass and
//! CSS, and copies scripts and images into a mirrored output tree.

pub mod assets;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod styles;
pub mod templates;

use std::fs;
use std::path::Path;

pub use assets::{AssetCopier, SCRIPT_EXTENSIONS};
pub use config::SiteConfig;
pub use error::{BuildError, RenderFailure};
pub use pipeline::{Pipeline, Task, TaskReport};
pub use styles::{CompileReport, OutputStyle, StyleCompiler, StyleError};
pub use templates::{load_page_data, TemplateRenderer};

/// Write a file, creating parent directories as needed.
pub(crate) fn write_output(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::write(parent, e))?;
    }

    fs::write(path, contents).map_err(|e| BuildError::write(path, e))
}
