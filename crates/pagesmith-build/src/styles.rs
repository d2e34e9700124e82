//! Sass and CSS compilation.
//!
//! Compile errors are isolated per file: they are logged, counted in the
//! report, and the file's previous output is left in place.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::BuildError;
use crate::write_output;

/// A single file that failed to compile.
#[derive(Debug, Clone)]
pub struct StyleError {
    /// Source file
    pub path: PathBuf,
    /// Compiler message
    pub message: String,
}

/// Outcome of compiling one source tree.
#[derive(Debug, Default)]
pub struct CompileReport {
    /// Output files written
    pub written: Vec<PathBuf>,
    /// Sources that failed to compile
    pub failed: Vec<StyleError>,
}

/// Compiler output formatting, `style = "expanded" | "compressed"` in the
/// config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

/// Style compiler backed by grass.
#[derive(Debug, Clone, Default)]
pub struct StyleCompiler {
    load_paths: Vec<PathBuf>,
    style: OutputStyle,
}

impl OutputStyle {
    pub fn name(&self) -> &'static str {
        match self {
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compressed => "compressed",
        }
    }
}

impl StyleCompiler {
    /// Create a compiler with expanded output and no extra load paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory searched by `@use` and `@import`.
    pub fn with_load_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.load_paths.push(path.into());
        self
    }

    pub fn with_style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    fn options(&self) -> grass::Options<'_> {
        let style = match self.style {
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
        };

        self.load_paths
            .iter()
            .fold(grass::Options::default().style(style), |opts, path| {
                opts.load_path(path)
            })
    }

    /// Compile one file. Syntax is chosen from the file extension.
    pub fn compile_file(&self, path: &Path) -> Result<String, StyleError> {
        grass::from_path(path, &self.options()).map_err(|e| StyleError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Compile source text as SCSS.
    pub fn compile_str(&self, source: &str) -> Result<String, StyleError> {
        grass::from_string(source.to_string(), &self.options()).map_err(|e| StyleError {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    /// Compile every `*.<extension>` file under `src_dir` into `out_dir`,
    /// keeping relative paths and switching the extension to `.css`.
    ///
    /// Partials (file names starting with `_`) are only compiled through the
    /// files that import them. Only write failures are returned as errors.
    pub fn compile_tree(
        &self,
        src_dir: &Path,
        out_dir: &Path,
        extension: &str,
    ) -> Result<CompileReport, BuildError> {
        let mut report = CompileReport::default();

        if !src_dir.exists() {
            tracing::debug!("Style source {} does not exist, skipping", src_dir.display());
            return Ok(report);
        }

        let mut sources: Vec<PathBuf> = WalkDir::new(src_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
            .filter(|p| !is_partial(p))
            .collect();
        sources.sort();

        for source in sources {
            match self.compile_file(&source) {
                Ok(css) => {
                    let relative = source.strip_prefix(src_dir).unwrap_or(&source);
                    let output = out_dir.join(relative).with_extension("css");
                    write_output(&output, css.as_bytes())?;
                    report.written.push(output);
                }
                Err(e) => {
                    tracing::error!("Style compile error in {}:\n{}", e.path.display(), e.message);
                    report.failed.push(e);
                }
            }
        }

        Ok(report)
    }
}

fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}
