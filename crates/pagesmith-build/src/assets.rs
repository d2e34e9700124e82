//! Verbatim asset copying.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BuildError;

/// Script output: hand-written modules plus the compiled UI package.
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "wasm"];

/// Copies already-built files into the output tree unchanged.
pub struct AssetCopier;

impl AssetCopier {
    /// Copy every file under `src_dir` into `out_dir` at the same relative
    /// path. A non-empty `extensions` keeps only files with one of them.
    ///
    /// A missing source directory copies nothing.
    pub fn copy_tree(
        src_dir: &Path,
        out_dir: &Path,
        extensions: &[&str],
    ) -> Result<Vec<PathBuf>, BuildError> {
        let mut copied = Vec::new();

        if !src_dir.exists() {
            tracing::debug!("Asset source {} does not exist, skipping", src_dir.display());
            return Ok(copied);
        }

        for entry in WalkDir::new(src_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = entry.map_err(|e| BuildError::read(src_dir, e))?;
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if !extensions.is_empty() && !extensions.contains(&ext) {
                continue;
            }

            let relative = path.strip_prefix(src_dir).unwrap_or(path);
            let target = out_dir.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::write(parent, e))?;
            }
            fs::copy(path, &target).map_err(|e| BuildError::write(&target, e))?;

            copied.push(target);
        }

        Ok(copied)
    }
}
