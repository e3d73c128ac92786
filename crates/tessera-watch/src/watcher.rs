//! Filesystem watching over configured source directories.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// The source category a change belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Templates,
    Scripts,
    Styles,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Templates => "templates",
            Category::Scripts => "scripts",
            Category::Styles => "styles",
        }
    }
}

/// A classified filesystem change.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub category: Category,
    pub path: PathBuf,
}

/// Errors that can occur setting up a watcher.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to create filesystem watcher: {0}")]
    Init(String),

    #[error("failed to watch {path}: {message}")]
    Watch { path: String, message: String },
}

/// Watcher over all configured source directories.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch the given category roots.
    ///
    /// Returns the watcher and a channel of classified change events. Roots
    /// that do not exist are skipped. The watcher stops when dropped.
    pub fn new(
        roots: &[(Category, PathBuf)],
    ) -> Result<(Self, async_mpsc::Receiver<ChangeEvent>), WatchError> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(|e| WatchError::Init(e.to_string()))?;

        // Canonicalize roots up front so classification matches the absolute
        // paths notify reports.
        let mut canonical: Vec<(Category, PathBuf)> = Vec::new();
        for (category, root) in roots {
            if !root.exists() {
                tracing::warn!("Not watching missing directory: {}", root.display());
                continue;
            }
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| WatchError::Watch {
                    path: root.display().to_string(),
                    message: e.to_string(),
                })?;
            let resolved = root.canonicalize().unwrap_or_else(|_| root.clone());
            canonical.push((*category, resolved));
        }

        // Forward and classify events on a dedicated thread.
        std::thread::spawn(move || {
            while let Ok(event) = sync_rx.recv() {
                if !is_change(&event.kind) {
                    continue;
                }
                for path in event.paths {
                    if let Some(category) = classify(&path, &canonical) {
                        let _ = async_tx.blocking_send(ChangeEvent { category, path });
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Only content-affecting events trigger rebuilds.
fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Map a changed path to the category whose root contains it.
fn classify(path: &Path, roots: &[(Category, PathBuf)]) -> Option<Category> {
    roots
        .iter()
        .find(|(_, root)| path.starts_with(root))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn classifies_by_containing_root() {
        let roots = vec![
            (Category::Templates, PathBuf::from("/site/src/templates")),
            (Category::Styles, PathBuf::from("/site/src/scss")),
        ];

        assert_eq!(
            classify(Path::new("/site/src/scss/main.scss"), &roots),
            Some(Category::Styles)
        );
        assert_eq!(
            classify(Path::new("/site/src/templates/index.html"), &roots),
            Some(Category::Templates)
        );
        assert_eq!(classify(Path::new("/site/other/x"), &roots), None);
    }

    #[tokio::test]
    async fn reports_changes_under_a_watched_root() {
        let temp = tempdir().unwrap();
        let styles = temp.path().join("scss");
        fs::create_dir_all(&styles).unwrap();

        let (watcher, mut rx) =
            FileWatcher::new(&[(Category::Styles, styles.clone())]).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(styles.join("main.scss"), "body { color: red; }").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;
        drop(watcher);

        let event = event.expect("timeout waiting for change event");
        assert_eq!(event.expect("channel closed").category, Category::Styles);
    }

    #[test]
    fn skips_missing_roots() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("does-not-exist");

        let result = FileWatcher::new(&[(Category::Templates, missing)]);
        assert!(result.is_ok());
    }
}
