//! Configuration file loading (pagesmith.toml).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pagesmith_build::SiteConfig;
use pagesmith_server::DevServerConfig;
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_open")]
    pub open: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: default_open(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_open() -> bool {
    true
}

impl ServerSettings {
    pub fn to_dev_config(&self) -> DevServerConfig {
        DevServerConfig {
            port: self.port,
            host: self.host.clone(),
            open: self.open,
        }
    }
}

/// Load configuration if the file exists.
/// Returns an error if the file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("{} not found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = load_config(&temp.path().join("pagesmith.toml")).unwrap();

        assert_eq!(config.site, SiteConfig::default());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pagesmith.toml");
        fs::write(
            &path,
            "[site]\npage_set = \"jp-ja/special/gscollection202502-en\"\n\n[server]\nport = 8080\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.site.page_set, "jp-ja/special/gscollection202502-en");
        assert_eq!(config.site.asset_root, "asset");
        assert_eq!(config.site.out_dir, PathBuf::from("htdocs"));
        assert_eq!(config.server.port, 8080);
        assert!(config.server.open);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pagesmith.toml");
        fs::write(&path, "[site\npage_set = ").unwrap();

        assert!(load_config(&path).is_err());
    }
}
