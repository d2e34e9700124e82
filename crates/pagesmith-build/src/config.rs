//! Page-set configuration and the source/output layout derived from it.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::BuildError;
use crate::styles::OutputStyle;

/// The single active page-set a build operates on.
///
/// Sources live under `<src_dir>/<page_set>/` and are mirrored into
/// `<out_dir>/<page_set>/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Page-set path, e.g. `jp-ja/special/gscollection202502`
    pub page_set: String,

    /// Asset folder inside the page-set, e.g. `asset`
    pub asset_root: String,

    /// Source tree root
    pub src_dir: PathBuf,

    /// Output tree root
    pub out_dir: PathBuf,

    /// Page data file, relative to the asset folder
    pub data_file: PathBuf,

    /// File name of the page templates to render
    pub template_name: String,

    /// Formatting of compiled stylesheets
    pub style: OutputStyle,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page_set: "jp-ja/special/gscollection202502".to_string(),
            asset_root: "asset".to_string(),
            src_dir: PathBuf::from("src"),
            out_dir: PathBuf::from("htdocs"),
            data_file: PathBuf::from("data/common.json"),
            template_name: "index.html.jinja".to_string(),
            style: OutputStyle::Expanded,
        }
    }
}

impl SiteConfig {
    /// Check that the page-set and asset folder name plain relative paths.
    pub fn validate(&self) -> Result<(), BuildError> {
        check_relative("page_set", &self.page_set)?;
        check_relative("asset_root", &self.asset_root)?;

        if self.template_name.is_empty() || self.template_name.contains('/') {
            return Err(BuildError::Config(format!(
                "template_name must be a bare file name, got {:?}",
                self.template_name
            )));
        }

        // The watcher matches template changes by extension.
        if self.template_extension().is_none() {
            return Err(BuildError::Config(format!(
                "template_name must have an extension, got {:?}",
                self.template_name
            )));
        }

        Ok(())
    }

    /// `<src>/<page_set>`
    pub fn source_root(&self) -> PathBuf {
        self.src_dir.join(&self.page_set)
    }

    /// `<out>/<page_set>`, the directory the dev server serves.
    pub fn output_root(&self) -> PathBuf {
        self.out_dir.join(&self.page_set)
    }

    /// `<src>/<page_set>/<asset_root>`
    pub fn asset_source(&self) -> PathBuf {
        self.source_root().join(&self.asset_root)
    }

    /// `<out>/<page_set>/<asset_root>`
    pub fn asset_output(&self) -> PathBuf {
        self.output_root().join(&self.asset_root)
    }

    pub fn data_path(&self) -> PathBuf {
        self.asset_source().join(&self.data_file)
    }

    /// Source directory of one asset kind (`scss`, `css`, `js`, `img`, `data`).
    pub fn asset_dir(&self, kind: &str) -> PathBuf {
        self.asset_source().join(kind)
    }

    /// Output directory of one asset kind.
    pub fn asset_out_dir(&self, kind: &str) -> PathBuf {
        self.asset_output().join(kind)
    }

    /// Extension of the template files, used by the watcher (`jinja` for
    /// `index.html.jinja`).
    pub fn template_extension(&self) -> Option<&str> {
        Path::new(&self.template_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
    }
}

fn check_relative(field: &str, value: &str) -> Result<(), BuildError> {
    if value.trim().is_empty() {
        return Err(BuildError::Config(format!("{} must not be empty", field)));
    }

    let path = Path::new(value);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if escapes {
        return Err(BuildError::Config(format!(
            "{} must be a relative path without '..', got {:?}",
            field, value
        )));
    }

    Ok(())
}
