//! Watch mode plumbing: file watcher, reload hub and live-reload server.

pub mod config;
pub mod server;
pub mod state;
pub mod watcher;

pub use config::SyncConfig;
pub use server::{RELOAD_PATH, RELOAD_SCRIPT_PATH, ReloadServer};
pub use state::{ReloadHub, SharedHub};
pub use watcher::{FileChange, FileWatcher};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Messages pushed to connected browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadEvent {
    /// Output changed; `paths` are URL paths under the build root
    Reload { paths: Vec<String> },

    /// Sent to a client right after it subscribes
    Connected { id: usize },
}

impl ReloadEvent {
    /// A reload for absolute output paths, expressed as URL paths.
    pub fn reload(build_root: &Path, paths: &[PathBuf]) -> Self {
        let paths = paths
            .iter()
            .map(|path| {
                let relative = path.strip_prefix(build_root).unwrap_or(path);
                let joined = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                format!("/{joined}")
            })
            .collect();
        ReloadEvent::Reload { paths }
    }
}
