//! CLI command implementations.

use std::path::PathBuf;

use anyhow::Result;
use pagesmith_build::Pipeline;

use crate::config::{load_config, ConfigFile};

pub mod build;
pub mod dev;
pub mod init;

/// Global flags that override the config file.
pub struct Overrides {
    pub config: PathBuf,
    pub page_set: Option<String>,
    pub asset_root: Option<String>,
}

impl Overrides {
    /// Load the config file and apply command-line overrides.
    pub fn resolve(&self) -> Result<ConfigFile> {
        let mut file = load_config(&self.config)?;

        if let Some(page_set) = &self.page_set {
            file.site.page_set = page_set.clone();
        }
        if let Some(asset_root) = &self.asset_root {
            file.site.asset_root = asset_root.clone();
        }

        Ok(file)
    }
}

/// Build a validated pipeline for the active page-set.
pub fn pipeline(file: &ConfigFile) -> Result<Pipeline> {
    Ok(Pipeline::new(file.site.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn flags_override_config_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pagesmith.toml");
        std::fs::write(&path, "[site]\npage_set = \"a\"\nasset_root = \"shared\"\n").unwrap();

        let overrides = Overrides {
            config: path,
            page_set: Some("b".to_string()),
            asset_root: None,
        };
        let file = overrides.resolve().unwrap();

        assert_eq!(file.site.page_set, "b");
        assert_eq!(file.site.asset_root, "shared");
    }

    #[test]
    fn rejects_invalid_page_set() {
        let temp = tempdir().unwrap();
        let overrides = Overrides {
            config: temp.path().join("missing.toml"),
            page_set: Some("../outside".to_string()),
            asset_root: None,
        };

        let file = overrides.resolve().unwrap();
        assert!(pipeline(&file).is_err());
    }
}
