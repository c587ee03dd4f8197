//! Recursive file watcher over several roots.
//!
//! Every create, modify or remove event is forwarded as it arrives. Hidden
//! files and directories are skipped; routing to tasks happens in the caller.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CliError, Result};

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_kind(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl FileWatcher {
    /// Watch each existing root recursively.
    ///
    /// Roots that do not exist are skipped with a warning; if none exist the
    /// watcher cannot start.
    pub fn new(roots: Vec<PathBuf>) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let (existing, missing): (Vec<_>, Vec<_>) = roots.into_iter().partition(|r| r.is_dir());
        for root in &missing {
            tracing::warn!("not watching {}: directory does not exist", root.display());
        }
        if existing.is_empty() {
            return Err(match missing.into_iter().next() {
                Some(root) => CliError::FileNotFound(root),
                None => CliError::Custom("nothing to watch".to_string()),
            });
        }
        let roots = existing;

        let (tx, rx) = mpsc::channel(256);
        let filter_roots = roots.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("watch error: {e}");
                    return;
                }
            };
            for path in event.paths {
                if should_ignore(&path, &filter_roots) {
                    continue;
                }
                if let Some(change) = FileChange::from_kind(&event.kind, path) {
                    // Receiver gone means the watch loop has exited.
                    let _ = tx.blocking_send(change);
                }
            }
        })?;

        for root in &roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
            tracing::debug!("watching {}", root.display());
        }

        Ok((
            Self {
                _watcher: watcher,
                roots,
            },
            rx,
        ))
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// Paths outside every root, or with a hidden component below their root.
fn should_ignore(path: &Path, roots: &[PathBuf]) -> bool {
    let Some(relative) = roots.iter().find_map(|root| path.strip_prefix(root).ok()) else {
        return true;
    };

    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}
