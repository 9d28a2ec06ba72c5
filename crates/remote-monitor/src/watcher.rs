//! File-system notifications for the remote log.
//!
//! `notify` delivers events on its own thread. The watcher never touches
//! tailer state; it only sends a wake-up over a channel so the event loop
//! polls the tailer on its own task.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use cursorhome_common::error::{CursorHomeError, CursorHomeResult};
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Watches the directories holding candidate logs.
///
/// Directories are watched instead of files so that rotation (delete and
/// recreate) keeps producing events. Dropping the watcher stops delivery.
pub struct LogWatcher {
    _watcher: RecommendedWatcher,
    directories: Vec<PathBuf>,
}

impl LogWatcher {
    /// Start watching; returns the watcher and the wake-up receiver.
    ///
    /// Candidates whose parent directory does not exist are skipped; the
    /// tailer's periodic rediscovery still covers them.
    pub fn watch(candidates: &[PathBuf]) -> CursorHomeResult<(Self, mpsc::UnboundedReceiver<()>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let files: BTreeSet<PathBuf> = candidates.iter().cloned().collect();

        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if is_relevant(&event, &files) {
                    // Receiver gone means the loop is shutting down.
                    let _ = tx.send(());
                }
            }
            Err(e) => tracing::warn!(error = %e, "Log watcher error"),
        })
        .map_err(|e| CursorHomeError::remote_log(format!("failed to create watcher: {e}")))?;

        let directories: BTreeSet<PathBuf> = candidates
            .iter()
            .filter_map(|path| path.parent())
            .filter(|dir| dir.is_dir())
            .map(Path::to_path_buf)
            .collect();

        let mut watched = Vec::new();
        for dir in directories {
            match watcher.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    tracing::debug!(dir = %dir.display(), "Watching log directory");
                    watched.push(dir);
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Cannot watch log directory");
                }
            }
        }

        if watched.is_empty() {
            tracing::info!("No log directory to watch, relying on periodic polling");
        }

        Ok((
            Self {
                _watcher: watcher,
                directories: watched,
            },
            rx,
        ))
    }

    /// Directories currently watched.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }
}

fn is_relevant(event: &Event, files: &BTreeSet<PathBuf>) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| files.contains(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn test_relevance_filters_by_candidate() {
        let files: BTreeSet<PathBuf> = [PathBuf::from("/logs/synergy.log")].into_iter().collect();

        let modify = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/logs/synergy.log"));
        assert!(is_relevant(&modify, &files));

        let other = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/logs/other.log"));
        assert!(!is_relevant(&other, &files));
    }

    #[test]
    fn test_missing_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("synergy.log");
        let absent = dir.path().join("nope/synergy.log");

        let (watcher, _rx) = LogWatcher::watch(&[present, absent]).unwrap();
        assert_eq!(watcher.directories(), &[dir.path().to_path_buf()]);
    }
}
