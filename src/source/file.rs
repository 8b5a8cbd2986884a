//! File watching for open documents.
//!
//! Changes on disk play the role of editor edits: the host marks the
//! document's views stale, reloads the text, and re-indexes the outline
//! on the next turn of the event loop.

use crate::model::error::SourceError;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tracing::warn;

/// Debounce window for file system events.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Outcome of draining watcher events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    /// No events since the last poll.
    Unchanged,
    /// The file was written.
    Modified,
    /// The file is gone.
    Deleted,
}

/// Watches one document for modifications.
pub struct DocumentWatcher {
    path: PathBuf,
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    event_rx: Receiver<DebounceEventResult>,
}

impl std::fmt::Debug for DocumentWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl DocumentWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::FileNotFound` if the file does not exist and
    /// `SourceError::Watch` if the platform watcher cannot be started.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SourceError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let (tx, rx) = std::sync::mpsc::channel();
        let mut debouncer =
            new_debouncer(DEBOUNCE, tx).map_err(|e| SourceError::Watch(e.to_string()))?;
        debouncer
            .watcher()
            .watch(path, notify::RecursiveMode::NonRecursive)
            .map_err(|e| SourceError::Watch(e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            _debouncer: debouncer,
            event_rx: rx,
        })
    }

    /// Watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events without blocking.
    pub fn poll_changes(&mut self) -> FileChange {
        let mut change = FileChange::Unchanged;

        while let Ok(result) = self.event_rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        if matches!(event.kind, DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous) {
                            change = FileChange::Modified;
                        }
                    }
                }
                Err(error) => {
                    if let notify::ErrorKind::PathNotFound = error.kind {
                        return FileChange::Deleted;
                    }
                    warn!(path = %self.path.display(), %error, "watch error");
                }
            }
        }

        if change == FileChange::Modified && !self.path.exists() {
            return FileChange::Deleted;
        }
        change
    }
}
