//! Template rendering for page markup.
//!
//! Every template named [`SiteConfig::template_name`] below the page-set
//! source directory is rendered with the shared page data and written to the
//! mirrored path in the output tree with an `.html` extension.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{context, path_loader, AutoEscape, Environment, UndefinedBehavior};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::error::{BuildError, RenderFailure};
use crate::write_output;

/// Load the page data document.
///
/// A missing or malformed file is fatal for the render pass.
pub fn load_page_data(path: &Path) -> Result<serde_json::Value, BuildError> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::read(path, e))?;

    serde_json::from_str(&content).map_err(|e| BuildError::DataError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Renders page templates for one page-set.
pub struct TemplateRenderer {
    source_root: PathBuf,
    output_root: PathBuf,
    template_name: String,
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer whose includes resolve relative to the page-set
    /// source directory.
    pub fn new(config: &SiteConfig) -> Self {
        let source_root = config.source_root();

        let mut env = Environment::new();
        env.set_loader(path_loader(&source_root));
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(auto_escape);

        Self {
            source_root,
            output_root: config.output_root(),
            template_name: config.template_name.clone(),
            env,
        }
    }

    /// Find all page templates, sorted for a stable render order.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut templates: Vec<PathBuf> = WalkDir::new(&self.source_root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_str() == Some(self.template_name.as_str()))
            .map(|e| e.into_path())
            .collect();

        templates.sort();
        templates
    }

    /// Render every template with `data` as the shared `common` context.
    ///
    /// Templates that fail are skipped and reported together once the rest
    /// have been written.
    pub fn render_all(&self, data: &serde_json::Value) -> Result<Vec<PathBuf>, BuildError> {
        let mut written = Vec::new();
        let mut failures = Vec::new();

        for template in self.discover() {
            let relative = template
                .strip_prefix(&self.source_root)
                .unwrap_or(&template)
                .to_path_buf();

            match self.render_one(&relative, data) {
                Ok(html) => {
                    let output = self.output_path(&relative);
                    write_output(&output, html.as_bytes())?;
                    tracing::debug!("Rendered {} -> {}", template.display(), output.display());
                    written.push(output);
                }
                Err(e) => {
                    tracing::error!("Failed to render {}: {:#}", template.display(), e);
                    failures.push(RenderFailure {
                        template,
                        message: e.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(BuildError::RenderError(failures))
        }
    }

    fn render_one(
        &self,
        relative: &Path,
        data: &serde_json::Value,
    ) -> Result<String, minijinja::Error> {
        let name = loader_name(relative);
        let tmpl = self.env.get_template(&name)?;

        tmpl.render(context! {
            root => self.source_root.display().to_string(),
            common => data,
        })
    }

    /// `<out>/<page_set>/<rel-dir>/<stem>.html`
    fn output_path(&self, relative: &Path) -> PathBuf {
        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");
        let stem = Path::new(stem).with_extension("html");

        match relative.parent() {
            Some(parent) => self.output_root.join(parent).join(stem),
            None => self.output_root.join(stem),
        }
    }
}

/// HTML escaping for `*.html.jinja` and `*.htm.jinja`.
fn auto_escape(name: &str) -> AutoEscape {
    let name = name.strip_suffix(".jinja").unwrap_or(name);
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => AutoEscape::Html,
        _ => AutoEscape::None,
    }
}

/// Template names use forward slashes regardless of platform.
fn loader_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn site(root: &Path) -> SiteConfig {
        SiteConfig {
            page_set: "jp-ja/special/spring".to_string(),
            src_dir: root.join("src"),
            out_dir: root.join("htdocs"),
            ..Default::default()
        }
    }

    #[test]
    fn renders_one_page_per_template() {
        let temp = tempdir().unwrap();
        let config = site(temp.path());
        let src = config.source_root();

        fs::create_dir_all(src.join("en")).unwrap();
        fs::create_dir_all(src.join("partials")).unwrap();
        fs::write(
            src.join("partials/head.html.jinja"),
            "<title>{{ common.title }}</title>",
        )
        .unwrap();
        fs::write(
            src.join("index.html.jinja"),
            "{% include \"partials/head.html.jinja\" %}<h1>{{ common.title }}</h1>\n",
        )
        .unwrap();
        fs::write(src.join("en/index.html.jinja"), "<p>{{ common.lead }}</p>\n").unwrap();

        let data = serde_json::json!({ "title": "Spring", "lead": "Fish & Chips" });
        let written = TemplateRenderer::new(&config).render_all(&data).unwrap();

        assert_eq!(written.len(), 2);

        let out = config.output_root();
        assert_eq!(
            fs::read_to_string(out.join("index.html")).unwrap(),
            "<title>Spring</title><h1>Spring</h1>\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("en/index.html")).unwrap(),
            "<p>Fish &amp; Chips</p>\n"
        );
        assert!(!out.join("partials").exists());
    }

    #[test]
    fn failed_template_does_not_block_others() {
        let temp = tempdir().unwrap();
        let config = site(temp.path());
        let src = config.source_root();

        fs::create_dir_all(src.join("broken")).unwrap();
        fs::write(src.join("index.html.jinja"), "ok").unwrap();
        fs::write(src.join("broken/index.html.jinja"), "{{ common.missing.key }}").unwrap();

        let result = TemplateRenderer::new(&config).render_all(&serde_json::json!({}));

        match result {
            Err(BuildError::RenderError(failures)) => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].template.ends_with("broken/index.html.jinja"));
            }
            other => panic!("expected render error, got {:?}", other),
        }

        assert!(config.output_root().join("index.html").exists());
        assert!(!config.output_root().join("broken/index.html").exists());
    }

    #[test]
    fn missing_data_file_is_fatal() {
        let temp = tempdir().unwrap();
        let result = load_page_data(&temp.path().join("common.json"));

        assert!(matches!(result, Err(BuildError::ReadError { .. })));
    }

    #[test]
    fn malformed_data_file_is_fatal() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("common.json");
        fs::write(&path, "{ \"title\": ").unwrap();

        assert!(matches!(
            load_page_data(&path),
            Err(BuildError::DataError { .. })
        ));
    }
}
