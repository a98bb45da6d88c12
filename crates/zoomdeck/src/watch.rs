//! Live reload of the presented file.
//!
//! The debouncer runs its own thread and only sends batches over a channel;
//! the viewer drains that channel once per frame.

use anyhow::Result;
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::time::Duration;

const DEBOUNCE: Duration = Duration::from_millis(200);

pub struct FileWatcher {
    path: PathBuf,
    rx: Receiver<DebounceEventResult>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl FileWatcher {
    /// Watch `path` for changes. The parent directory is watched rather
    /// than the file itself, so editors that save by renaming still trigger.
    pub fn new(path: &Path) -> Result<Self> {
        let path = path
            .canonicalize()
            .map_err(|e| anyhow::anyhow!("Failed to resolve {}: {e}", path.display()))?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx)
            .map_err(|e| anyhow::anyhow!("Failed to start file watcher: {e}"))?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow::anyhow!("Failed to watch {}: {e}", dir.display()))?;
        tracing::debug!(path = %path.display(), "watching for changes");

        Ok(Self {
            path,
            rx,
            _debouncer: debouncer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events; true when any of them touched the watched file.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(events)) => {
                    changed |= touches(events.iter().map(|e| e.path.as_path()), &self.path);
                }
                Ok(Err(error)) => tracing::warn!(%error, "file watcher error"),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("file watcher stopped");
                    break;
                }
            }
        }
        changed
    }
}

pub fn touches<'a>(mut paths: impl Iterator<Item = &'a Path>, target: &Path) -> bool {
    paths.any(|p| p == target)
}
