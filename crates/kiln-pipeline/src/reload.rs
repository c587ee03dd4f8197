//! Seam between tasks and the live-reload hub.

use std::path::PathBuf;

/// Receives the paths a task just wrote.
///
/// The CLI's reload hub implements this; library users that do not serve a
/// browser use [`NoopNotifier`].
pub trait ReloadNotifier: Send + Sync {
    fn notify(&self, paths: &[PathBuf]);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ReloadNotifier for NoopNotifier {
    fn notify(&self, _paths: &[PathBuf]) {}
}
