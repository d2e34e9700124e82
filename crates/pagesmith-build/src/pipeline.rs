//! Named units of work and the sequential build orchestrator.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::assets::{AssetCopier, SCRIPT_EXTENSIONS};
use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::styles::StyleCompiler;
use crate::templates::{load_page_data, TemplateRenderer};

/// An independently invokable build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Render page templates with the page data
    Render,
    /// Run plain CSS through the style compiler
    Css,
    /// Compile Sass sources
    Sass,
    /// Copy scripts
    Js,
    /// Copy images
    Images,
}

impl Task {
    /// The build part of the default pipeline, in execution order.
    pub const SEQUENCE: [Task; 5] = [Task::Render, Task::Css, Task::Sass, Task::Js, Task::Images];

    pub fn name(&self) -> &'static str {
        match self {
            Task::Render => "render",
            Task::Css => "css",
            Task::Sass => "sass",
            Task::Js => "js",
            Task::Images => "images",
        }
    }

    /// Whether connected browsers can pick up this task's output by
    /// swapping stylesheets instead of reloading.
    pub fn is_style(&self) -> bool {
        matches!(self, Task::Css | Task::Sass)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Task::SEQUENCE
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| BuildError::Config(format!("unknown task: {}", s)))
    }
}

/// Result of running one task.
#[derive(Debug)]
pub struct TaskReport {
    pub task: Task,

    /// Files written to the output tree
    pub written: usize,

    /// Sources that failed without failing the task
    pub failed: usize,

    pub duration_ms: u64,
}

/// Runs build tasks for one page-set.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: SiteConfig,
    styles: StyleCompiler,
}

impl Pipeline {
    /// Create a pipeline after validating the configuration.
    pub fn new(config: SiteConfig) -> Result<Self, BuildError> {
        config.validate()?;

        let styles = StyleCompiler::new()
            .with_load_path(config.asset_dir("scss"))
            .with_load_path(config.asset_dir("css"))
            .with_style(config.style);

        Ok(Self { config, styles })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Run a single task to completion.
    pub fn run(&self, task: Task) -> Result<TaskReport, BuildError> {
        let start = Instant::now();

        let (written, failed) = match task {
            Task::Render => {
                let data = load_page_data(&self.config.data_path())?;
                let pages = TemplateRenderer::new(&self.config).render_all(&data)?;
                (pages.len(), 0)
            }
            Task::Css => self.compile_styles("css")?,
            Task::Sass => self.compile_styles("scss")?,
            Task::Js => {
                let copied = AssetCopier::copy_tree(
                    &self.config.asset_dir("js"),
                    &self.config.asset_out_dir("js"),
                    SCRIPT_EXTENSIONS,
                )?;
                (copied.len(), 0)
            }
            Task::Images => {
                let copied = AssetCopier::copy_tree(
                    &self.config.asset_dir("img"),
                    &self.config.asset_out_dir("img"),
                    &[],
                )?;
                (copied.len(), 0)
            }
        };

        let report = TaskReport {
            task,
            written,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "[{}] wrote {} file(s){} in {}ms",
            task,
            report.written,
            if report.failed > 0 {
                format!(", {} failed", report.failed)
            } else {
                String::new()
            },
            report.duration_ms
        );

        Ok(report)
    }

    /// Run tasks strictly in order, stopping at the first error.
    pub fn run_sequence(&self, tasks: &[Task]) -> Result<Vec<TaskReport>, BuildError> {
        tasks.iter().map(|task| self.run(*task)).collect()
    }

    fn compile_styles(&self, kind: &str) -> Result<(usize, usize), BuildError> {
        let report = self.styles.compile_tree(
            &self.config.asset_dir(kind),
            &self.config.asset_out_dir("css"),
            kind,
        )?;

        Ok((report.written.len(), report.failed.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn fixture(root: &Path) -> SiteConfig {
        let config = SiteConfig {
            page_set: "jp-ja/special/spring".to_string(),
            src_dir: root.join("src"),
            out_dir: root.join("htdocs"),
            ..Default::default()
        };

        let src = config.source_root();
        let asset = config.asset_source();
        for dir in ["data", "scss", "css", "js", "img"] {
            fs::create_dir_all(asset.join(dir)).unwrap();
        }

        fs::write(src.join("index.html.jinja"), "<h1>{{ common.title }}</h1>").unwrap();
        fs::write(asset.join("data/common.json"), r#"{"title":"Spring"}"#).unwrap();
        fs::write(asset.join("scss/style.scss"), ".a { .b { color: red; } }").unwrap();
        fs::write(asset.join("css/reset.css"), "html { margin: 0; }").unwrap();
        fs::write(asset.join("js/script.js"), "console.log(1);").unwrap();
        fs::write(asset.join("img/logo.svg"), "<svg/>").unwrap();

        config
    }

    #[test]
    fn runs_default_sequence_in_order() {
        let temp = tempdir().unwrap();
        let config = fixture(temp.path());
        let pipeline = Pipeline::new(config.clone()).unwrap();

        let reports = pipeline.run_sequence(&Task::SEQUENCE).unwrap();
        let order: Vec<Task> = reports.iter().map(|r| r.task).collect();

        assert_eq!(order, Task::SEQUENCE.to_vec());
        assert!(reports.iter().all(|r| r.written == 1 && r.failed == 0));

        let out = config.asset_output();
        assert!(config.output_root().join("index.html").exists());
        assert!(out.join("css/style.css").exists());
        assert!(out.join("css/reset.css").exists());
        assert!(out.join("js/script.js").exists());
        assert!(out.join("img/logo.svg").exists());
    }

    #[test]
    fn style_errors_do_not_fail_the_task() {
        let temp = tempdir().unwrap();
        let config = fixture(temp.path());
        fs::write(config.asset_dir("scss").join("broken.scss"), ".x {").unwrap();

        let report = Pipeline::new(config).unwrap().run(Task::Sass).unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn missing_data_aborts_sequence() {
        let temp = tempdir().unwrap();
        let config = fixture(temp.path());
        fs::remove_file(config.data_path()).unwrap();

        let pipeline = Pipeline::new(config.clone()).unwrap();
        let result = pipeline.run_sequence(&Task::SEQUENCE);

        assert!(matches!(result, Err(BuildError::ReadError { .. })));
        // Later tasks never ran.
        assert!(!config.asset_output().join("js/script.js").exists());
    }

    #[test]
    fn parses_task_names() {
        assert_eq!("sass".parse::<Task>().unwrap(), Task::Sass);
        assert!("format".parse::<Task>().is_err());
        assert!(Task::Css.is_style());
        assert!(!Task::Images.is_style());
    }
}
