//! Live-reload client registry.
//!
//! Clients are only ever added by subscribing; a client leaves the registry
//! when a broadcast finds its channel closed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use kiln_pipeline::ReloadNotifier;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::dev::ReloadEvent;

/// Per-client event buffer. A client that falls this far behind misses events
/// rather than stalling the broadcaster.
const CLIENT_BUFFER: usize = 32;

/// A reload identical to the previous one within this window is not sent
/// again. The js task and the build-root watcher both report the bundle.
const RELOAD_COALESCE: Duration = Duration::from_millis(250);

/// Connected SSE clients, keyed by id.
pub type ClientRegistry = Arc<RwLock<HashMap<usize, mpsc::Sender<String>>>>;

pub struct ReloadHub {
    clients: ClientRegistry,
    next_client_id: AtomicUsize,
    last_reload: Mutex<Option<(ReloadEvent, Instant)>>,
    build_root: PathBuf,
}

pub type SharedHub = Arc<ReloadHub>;

impl ReloadHub {
    pub fn new(build_root: PathBuf) -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            next_client_id: AtomicUsize::new(0),
            last_reload: Mutex::new(None),
            build_root,
        }
    }

    /// Register a new SSE client and return its id and event receiver.
    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);
        (id, rx)
    }

    /// Send `event` to every client; returns how many received it.
    pub fn broadcast(&self, event: &ReloadEvent) -> usize {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("failed to encode reload event: {e}");
                return 0;
            }
        };

        let clients = self.clients.read().clone();
        let mut delivered = 0;
        let mut closed = Vec::new();

        for (id, tx) in clients {
            match tx.try_send(json.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!("reload client {id} is lagging, event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(id),
            }
        }

        if !closed.is_empty() {
            let mut registry = self.clients.write();
            for id in closed {
                registry.remove(&id);
                tracing::debug!("reload client {id} disconnected");
            }
        }

        delivered
    }

    /// Broadcast a reload for absolute output paths.
    ///
    /// Returns 0 without sending when the same reload went out moments ago.
    pub fn reload(&self, paths: &[PathBuf]) -> usize {
        let event = ReloadEvent::reload(&self.build_root, paths);
        {
            let mut last = self.last_reload.lock();
            let now = Instant::now();
            let repeated = last.as_ref().is_some_and(|(previous, at)| {
                *previous == event && now.duration_since(*at) < RELOAD_COALESCE
            });
            if repeated {
                tracing::debug!("reload for {paths:?} already sent");
                return 0;
            }
            *last = Some((event.clone(), now));
        }
        let delivered = self.broadcast(&event);
        tracing::debug!("reload sent to {delivered} client(s)");
        delivered
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }
}

impl ReloadNotifier for ReloadHub {
    fn notify(&self, paths: &[PathBuf]) {
        self.reload(paths);
    }
}
