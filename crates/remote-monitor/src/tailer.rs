//! Incremental reader for an append-only log file.

use std::fs::{self, File, Metadata};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use cursorhome_common::clock::Throttle;
use cursorhome_common::config::RemoteLogSettings;

/// Lifecycle of a [`LogTailer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailerState {
    /// Not started, or stopped.
    Stopped,
    /// No candidate exists; rediscovery runs periodically.
    Searching,
    /// Reading appended data from one file.
    Following,
}

#[derive(Debug)]
struct FollowedFile {
    path: PathBuf,
    file: File,
    position: u64,
    identity: Option<u64>,
    /// Raw bytes after the last newline. Kept undecoded so a character
    /// split across two reads survives.
    partial: Vec<u8>,
}

/// Follows the first existing candidate log and returns complete lines as
/// they are appended.
///
/// Poll-driven: the owner calls [`LogTailer::poll`] on a timer or when a
/// file-system notification arrives.
#[derive(Debug)]
pub struct LogTailer {
    candidates: Vec<PathBuf>,
    followed: Option<FollowedFile>,
    state: TailerState,
    rediscovery: Throttle,
    rediscovery_interval: Duration,
    last_growth: Option<Instant>,
    last_path: Option<PathBuf>,
}

impl LogTailer {
    pub fn new(rediscovery_interval: Duration) -> Self {
        Self {
            candidates: Vec::new(),
            followed: None,
            state: TailerState::Stopped,
            rediscovery: Throttle::new(rediscovery_interval),
            rediscovery_interval,
            last_growth: None,
            last_path: None,
        }
    }

    pub fn from_settings(settings: &RemoteLogSettings) -> Self {
        Self::new(settings.rediscovery_interval())
    }

    /// Follow the first existing candidate from its current end.
    ///
    /// With no existing candidate the tailer keeps searching; this is never
    /// an error. Returns the chosen path.
    pub fn start(&mut self, candidates: Vec<PathBuf>, now: Instant) -> Option<&Path> {
        self.stop();
        self.candidates = candidates;
        self.rediscovery.mark(now);
        self.last_growth = Some(now);

        match self.discover() {
            Some(followed) => {
                tracing::info!(path = %followed.path.display(), offset = followed.position, "Following remote log");
                self.follow(followed);
            }
            None => {
                tracing::info!(
                    candidates = self.candidates.len(),
                    "No remote log found, will keep searching"
                );
                self.state = TailerState::Searching;
            }
        }
        self.path()
    }

    /// Read whatever was appended since the last poll.
    ///
    /// Only complete lines are returned, in file order; a trailing partial
    /// line waits for its newline. Also handles truncation, deletion, and
    /// idle-triggered rediscovery.
    pub fn poll(&mut self, now: Instant) -> Vec<String> {
        match self.state {
            TailerState::Stopped => Vec::new(),
            TailerState::Searching => {
                self.try_rediscover(now);
                if self.state == TailerState::Following {
                    self.poll_followed(now)
                } else {
                    Vec::new()
                }
            }
            TailerState::Following => self.poll_followed(now),
        }
    }

    /// Release the file. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(followed) = self.followed.take() {
            tracing::debug!(path = %followed.path.display(), "Stopped following remote log");
        }
        self.state = TailerState::Stopped;
    }

    pub fn state(&self) -> TailerState {
        self.state
    }

    /// The file currently followed.
    pub fn path(&self) -> Option<&Path> {
        self.followed.as_ref().map(|f| f.path.as_path())
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    fn poll_followed(&mut self, now: Instant) -> Vec<String> {
        let Some(followed) = self.followed.as_mut() else {
            self.state = TailerState::Searching;
            return Vec::new();
        };

        let metadata = match fs::metadata(&followed.path) {
            Ok(metadata) => metadata,
            Err(_) => {
                tracing::warn!(path = %followed.path.display(), "Remote log disappeared");
                self.lose_file(now);
                return Vec::new();
            }
        };

        let replaced = match (followed.identity, file_identity(&metadata)) {
            (Some(old), Some(new)) => old != new,
            _ => false,
        };
        if replaced || metadata.len() < followed.position {
            tracing::info!(
                path = %followed.path.display(),
                replaced,
                "Remote log truncated or replaced, reading from start"
            );
            match open_at(&followed.path, false) {
                Ok(reopened) => *followed = reopened,
                Err(e) => {
                    tracing::warn!(path = %followed.path.display(), error = %e, "Failed to reopen remote log");
                    self.lose_file(now);
                    return Vec::new();
                }
            }
        }

        if metadata.len() == followed.position && !replaced {
            self.check_idle(now);
            return Vec::new();
        }

        match read_appended(followed) {
            Ok(lines) => {
                self.last_growth = Some(now);
                lines
            }
            Err(e) => {
                tracing::warn!(path = %followed.path.display(), error = %e, "Failed to read remote log");
                self.lose_file(now);
                Vec::new()
            }
        }
    }

    fn check_idle(&mut self, now: Instant) {
        let idle = self
            .last_growth
            .map(|t| now.saturating_duration_since(t) >= self.rediscovery_interval)
            .unwrap_or(true);
        if idle {
            self.try_rediscover(now);
        }
    }

    fn lose_file(&mut self, now: Instant) {
        if let Some(followed) = self.followed.take() {
            self.last_path = Some(followed.path);
        }
        self.state = TailerState::Searching;
        self.try_rediscover(now);
    }

    fn try_rediscover(&mut self, now: Instant) {
        if !self.rediscovery.should_run(now) {
            return;
        }
        let current = self.path().map(Path::to_path_buf);

        match self.discover() {
            Some(found) if Some(&found.path) == current.as_ref() => {
                // Still the best candidate; keep our offset.
            }
            Some(mut found) => {
                if self.last_path.as_ref() == Some(&found.path) {
                    // The file we lost came back: read it from the start.
                    found.position = 0;
                    if let Err(e) = found.file.seek(SeekFrom::Start(0)) {
                        tracing::warn!(error = %e, "Failed to rewind remote log");
                        return;
                    }
                }
                tracing::info!(path = %found.path.display(), offset = found.position, "Following remote log");
                self.last_growth = Some(now);
                self.follow(found);
            }
            None => {
                tracing::debug!(candidates = self.candidates.len(), "Remote log still not found");
            }
        }
    }

    fn follow(&mut self, followed: FollowedFile) {
        self.last_path = Some(followed.path.clone());
        self.followed = Some(followed);
        self.state = TailerState::Following;
    }

    /// First existing candidate, opened at its end.
    fn discover(&self) -> Option<FollowedFile> {
        self.candidates
            .iter()
            .filter(|path| path.is_file())
            .find_map(|path| match open_at(path, true) {
                Ok(followed) => Some(followed),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Cannot open remote log");
                    None
                }
            })
    }
}

fn open_at(path: &Path, at_end: bool) -> io::Result<FollowedFile> {
    let mut file = File::open(path)?;
    let metadata = file.metadata()?;
    let position = if at_end {
        file.seek(SeekFrom::End(0))?
    } else {
        0
    };
    Ok(FollowedFile {
        path: path.to_path_buf(),
        file,
        position,
        identity: file_identity(&metadata),
        partial: Vec::new(),
    })
}

fn read_appended(followed: &mut FollowedFile) -> io::Result<Vec<String>> {
    followed.file.seek(SeekFrom::Start(followed.position))?;
    let mut bytes = Vec::new();
    let read = followed.file.read_to_end(&mut bytes)?;
    followed.position += read as u64;

    followed.partial.extend_from_slice(&bytes);
    let Some(last_newline) = followed.partial.iter().rposition(|&b| b == b'\n') else {
        return Ok(Vec::new());
    };

    let rest = followed.partial.split_off(last_newline + 1);
    let complete = std::mem::replace(&mut followed.partial, rest);
    Ok(String::from_utf8_lossy(&complete)
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}

#[cfg(unix)]
fn file_identity(metadata: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.ino())
}

#[cfg(not(unix))]
fn file_identity(_metadata: &Metadata) -> Option<u64> {
    None
}
