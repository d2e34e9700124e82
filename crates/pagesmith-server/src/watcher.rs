//! Source watching: maps changed files to the build task that owns them.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use pagesmith_build::{SiteConfig, Task, SCRIPT_EXTENSIONS};

/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// A source change that needs a task re-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub task: Task,
}

/// One watched glob: files below `subdir` of the page-set source directory,
/// optionally restricted to one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRule {
    pub subdir: PathBuf,
    pub extension: Option<String>,
    pub task: Task,
}

impl WatchRule {
    fn new(subdir: impl Into<PathBuf>, extension: Option<&str>, task: Task) -> Self {
        Self {
            subdir: subdir.into(),
            extension: extension.map(str::to_string),
            task,
        }
    }

    /// Check a path relative to the page-set source directory.
    pub fn matches(&self, relative: &Path) -> bool {
        if !relative.starts_with(&self.subdir) {
            return false;
        }

        match &self.extension {
            Some(ext) => relative.extension().and_then(|e| e.to_str()) == Some(ext.as_str()),
            None => true,
        }
    }
}

/// Watch rules for a page-set: templates, page data, Sass, scripts and
/// images. Plain CSS sources are not watched.
pub fn watch_rules(config: &SiteConfig) -> Vec<WatchRule> {
    let asset = PathBuf::from(&config.asset_root);

    let mut rules = vec![
        WatchRule::new("", config.template_extension(), Task::Render),
        WatchRule::new(asset.join("data"), Some("json"), Task::Render),
        WatchRule::new(asset.join("scss"), Some("scss"), Task::Sass),
    ];
    for ext in SCRIPT_EXTENSIONS {
        rules.push(WatchRule::new(asset.join("js"), Some(*ext), Task::Js));
    }
    rules.push(WatchRule::new(asset.join("img"), None, Task::Images));

    rules
}

/// File watcher for the page-set source directory.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `root` recursively and classify changes with `rules`.
    ///
    /// Returns the watcher and a channel to receive events. Events are
    /// forwarded in arrival order without debouncing.
    pub fn new(
        root: &Path,
        rules: Vec<WatchRule>,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        // Backends may report canonical paths, so compare against the
        // canonical root.
        let root = root.canonicalize()?;

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(std::io::Error::other)?;

        std::thread::spawn(move || {
            while let Ok(event) = sync_rx.recv() {
                for path in &event.paths {
                    if let Some(e) = classify_event(&root, &rules, path, &event.kind) {
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(
    root: &Path,
    rules: &[WatchRule],
    path: &Path,
    kind: &notify::EventKind,
) -> Option<WatchEvent> {
    use notify::EventKind;

    let kind = match kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Removed,
        _ => return None,
    };

    let relative = path.strip_prefix(root).ok()?;
    let rule = rules.iter().find(|r| r.matches(relative))?;

    Some(WatchEvent {
        path: path.to_path_buf(),
        kind,
        task: rule.task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use notify::EventKind;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    fn task_for(rules: &[WatchRule], rel: &str) -> Option<Task> {
        classify_event(
            Path::new("/site"),
            rules,
            &Path::new("/site").join(rel),
            &EventKind::Modify(ModifyKind::Any),
        )
        .map(|e| e.task)
    }

    #[test]
    fn routes_sources_to_tasks() {
        let rules = watch_rules(&SiteConfig::default());

        assert_eq!(task_for(&rules, "index.html.jinja"), Some(Task::Render));
        assert_eq!(task_for(&rules, "en/parts/head.html.jinja"), Some(Task::Render));
        assert_eq!(task_for(&rules, "asset/data/common.json"), Some(Task::Render));
        assert_eq!(task_for(&rules, "asset/scss/base/_vars.scss"), Some(Task::Sass));
        assert_eq!(task_for(&rules, "asset/js/script.js"), Some(Task::Js));
        assert_eq!(task_for(&rules, "asset/js/pkg/pagesmith_ui_bg.wasm"), Some(Task::Js));
        assert_eq!(task_for(&rules, "asset/img/kv/main.webp"), Some(Task::Images));
    }

    #[test]
    fn ignores_unwatched_files() {
        let rules = watch_rules(&SiteConfig::default());

        assert_eq!(task_for(&rules, "asset/css/reset.css"), None);
        assert_eq!(task_for(&rules, "asset/js/notes.md"), None);
        assert_eq!(task_for(&rules, "README.md"), None);
        assert_eq!(
            classify_event(
                Path::new("/site"),
                &rules,
                Path::new("/elsewhere/index.html.jinja"),
                &EventKind::Modify(ModifyKind::Any),
            ),
            None
        );
    }

    #[test]
    fn reports_change_kind() {
        let rules = watch_rules(&SiteConfig::default());
        let path = Path::new("/site/asset/js/script.js");

        let created =
            classify_event(Path::new("/site"), &rules, path, &EventKind::Create(CreateKind::File));
        let removed =
            classify_event(Path::new("/site"), &rules, path, &EventKind::Remove(RemoveKind::File));

        assert_eq!(created.map(|e| e.kind), Some(ChangeKind::Created));
        assert_eq!(removed.map(|e| e.kind), Some(ChangeKind::Removed));
    }

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let scss = temp.path().join("asset/scss");
        fs::create_dir_all(&scss).unwrap();

        let rules = watch_rules(&SiteConfig::default());
        let (watcher, mut rx) = FileWatcher::new(temp.path(), rules).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(scss.join("style.scss"), ".a { color: red; }").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        let event = event
            .expect("timeout waiting for file watch event")
            .expect("channel should not be closed");
        assert_eq!(event.task, Task::Sass);
    }
}
