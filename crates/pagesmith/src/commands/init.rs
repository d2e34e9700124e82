//! Scaffold a page-set source tree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pagesmith_build::SiteConfig;

use super::Overrides;
use crate::config::ConfigFile;

/// Run the init command.
pub async fn run(overrides: &Overrides, yes: bool) -> Result<()> {
    let file = overrides.resolve()?;
    file.site.validate()?;

    tracing::info!("Initializing page-set {}...", file.site.page_set);

    if !overrides.config.exists() || yes {
        fs::write(&overrides.config, config_template(&file))
            .with_context(|| format!("Failed to write {}", overrides.config.display()))?;
        tracing::info!("Created {}", overrides.config.display());
    }

    scaffold(&file.site, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'pagesmith' to build and start the development server.");

    Ok(())
}

/// Write the starter sources for a page-set. Existing files are kept unless
/// `overwrite` is set.
pub fn scaffold(site: &SiteConfig, overwrite: bool) -> Result<()> {
    let root = site.source_root();

    if root.exists() && !overwrite {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite starter files.",
            root.display()
        );
        return Ok(());
    }

    let files = [
        (root.join(&site.template_name), DEFAULT_TEMPLATE),
        (root.join("partials/head.html.jinja"), DEFAULT_HEAD),
        (site.data_path(), DEFAULT_DATA),
        (site.asset_dir("scss").join("style.scss"), DEFAULT_SCSS),
        (site.asset_dir("scss").join("_variables.scss"), DEFAULT_VARIABLES),
        (site.asset_dir("js").join("script.js"), DEFAULT_SCRIPT),
    ];

    for (path, contents) in files {
        write_new(&path, contents, overwrite)?;
    }

    fs::create_dir_all(site.asset_dir("css")).context("Failed to create css directory")?;
    fs::create_dir_all(site.asset_dir("img")).context("Failed to create img directory")?;

    Ok(())
}

fn write_new(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

/// Render the config file for the resolved settings, so flags given to
/// `init` are what later runs load.
fn config_template(file: &ConfigFile) -> String {
    let site = &file.site;
    let server = &file.server;

    format!(
        r#"# pagesmith configuration

[site]
# Page-set to build: sources in <src_dir>/<page_set>, output in <out_dir>/<page_set>
page_set = {}

# Asset folder inside the page-set
asset_root = {}

src_dir = {}
out_dir = {}

# Page data, relative to the asset folder
data_file = {}
template_name = {}

# "expanded" or "compressed"
style = {}

[server]
host = {}
port = {}
open = {}
"#,
        quoted(&site.page_set),
        quoted(&site.asset_root),
        quoted(&site.src_dir.to_string_lossy()),
        quoted(&site.out_dir.to_string_lossy()),
        quoted(&site.data_file.to_string_lossy()),
        quoted(&site.template_name),
        quoted(site.style.name()),
        quoted(&server.host),
        server.port,
        server.open,
    )
}

fn quoted(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ common.lang }}">
<head>
  {% include "partials/head.html.jinja" %}
</head>
<body>
  <main>
    <h1>{{ common.title }}</h1>
    {% for item in common.items %}
    <section class="fade-element">
      <h2>{{ item.name }}</h2>
      <p>{{ item.text }}</p>
    </section>
    {% endfor %}
  </main>
  <script src="https://code.jquery.com/jquery-3.7.1.min.js"></script>
  <script src="https://cdn.jsdelivr.net/npm/swiper@11/swiper-bundle.min.js"></script>
  <script src="./asset/js/script.js" type="module"></script>
</body>
</html>
"#;

const DEFAULT_HEAD: &str = r#"<meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ common.title }}</title>
  <link rel="stylesheet" href="./asset/css/style.css">"#;

const DEFAULT_DATA: &str = r#"{
  "lang": "en",
  "title": "Collection",
  "items": [
    { "name": "First", "text": "Lorem ipsum dolor sit amet." },
    { "name": "Second", "text": "Consectetur adipiscing elit." }
  ]
}
"#;

const DEFAULT_VARIABLES: &str = r#"$accent: #1a1a1a;
$fade-distance: 40px;
"#;

const DEFAULT_SCSS: &str = r#"@import "variables";

body {
  margin: 0;
  color: $accent;
}

.fade-element {
  opacity: 0;
  transform: translateY($fade-distance);
  transition: opacity 0.6s ease, transform 0.6s ease;

  &.is-active {
    opacity: 1;
    transform: none;
  }
}
"#;

const DEFAULT_SCRIPT: &str = r#"// Page behaviors come from the pagesmith-ui package:
//   wasm-pack build crates/pagesmith-ui --target web --features web --out-dir <this dir>/pkg
// Without it, content is simply shown.
import('./pkg/pagesmith_ui.js')
  .then((ui) => ui.default())
  .catch(() => {
    document.querySelectorAll('.fade-element').forEach((el) => {
      el.classList.add('is-active');
    });
  });
"#;
