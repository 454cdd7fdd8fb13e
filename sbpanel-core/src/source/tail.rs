use crate::conf::TailConfig;
use crate::source::error::SourceError;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailEvent {
    Line(String),
    /// Everything present at open time has been read. Emitted once.
    CaughtUp,
}

type FileId = (u64, u64);

/// Follows a log file across appends, truncation and rotation.
#[derive(Debug)]
pub struct LogTail {
    path: PathBuf,
    config: TailConfig,
    reader: BufReader<File>,
    identity: Option<FileId>,
    /// Bytes of complete lines consumed from the current file.
    offset: u64,
    /// Bytes read past `offset`; a line without its newline yet.
    pending: Vec<u8>,
    /// Partial line salvaged from a rotated file, delivered before anything
    /// read from its replacement.
    leftover: Option<String>,
    caught_up: bool,
}

impl LogTail {
    /// Open `path` from the beginning. Failing here is fatal to the caller.
    pub async fn open(path: impl Into<PathBuf>, config: TailConfig) -> Result<Self, SourceError> {
        let path = path.into();
        let file = File::open(&path).await.map_err(|e| SourceError::Open {
            path: path.clone(),
            source: e,
        })?;
        let identity = identify(&file).await;

        Ok(Self {
            path,
            config,
            reader: BufReader::new(file),
            identity,
            offset: 0,
            pending: Vec::new(),
            leftover: None,
            caught_up: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next line, or the one-time catch-up marker. Waits for new data at EOF.
    ///
    /// Cancel safe: read bytes and salvaged lines live on `self`, so a
    /// dropped call loses nothing.
    pub async fn next(&mut self) -> TailEvent {
        loop {
            if let Some(line) = self.leftover.take() {
                return TailEvent::Line(line);
            }

            match self.reader.read_until(b'\n', &mut self.pending).await {
                Ok(0) => {}
                Ok(_) => {
                    if self.pending.ends_with(b"\n") {
                        let line = self.take_pending();
                        return TailEvent::Line(line);
                    }
                    continue;
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "log read failed; reopening");
                    self.rotate().await;
                    continue;
                }
            }

            if !self.caught_up {
                self.caught_up = true;
                return TailEvent::CaughtUp;
            }

            if self.rotated().await {
                self.rotate().await;
                continue;
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    fn take_pending(&mut self) -> String {
        self.offset += self.pending.len() as u64;
        let line = decode_line(&self.pending);
        self.pending.clear();
        line
    }

    fn position(&self) -> u64 {
        self.offset + self.pending.len() as u64
    }

    async fn rotated(&self) -> bool {
        match fs::metadata(&self.path).await {
            Ok(meta) => meta.len() < self.position() || file_id(&meta) != self.identity,
            Err(_) => true,
        }
    }

    /// Reopen from the start. A dangling partial line from the old file is
    /// parked in `leftover` before any await point.
    async fn rotate(&mut self) {
        if !self.pending.is_empty() {
            let line = self.take_pending();
            self.leftover = Some(line);
        }

        tracing::info!(path = %self.path.display(), offset = self.offset, "log rotated or truncated");
        self.reopen().await;
    }

    async fn reopen(&mut self) {
        let mut delay = self.config.retry_initial();
        let mut attempts = 0u32;

        loop {
            match File::open(&self.path).await {
                Ok(file) => {
                    self.identity = identify(&file).await;
                    self.reader = BufReader::new(file);
                    self.offset = 0;
                    tracing::info!(path = %self.path.display(), attempts, "log reopened");
                    return;
                }
                Err(e) => {
                    if attempts == 0 {
                        tracing::warn!(path = %self.path.display(), error = %e, "log unavailable; retrying");
                    } else {
                        tracing::debug!(path = %self.path.display(), error = %e, ?delay, "log still unavailable");
                    }
                    attempts += 1;
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.config.retry_max());
                }
            }
        }
    }
}

/// Read a whole log at once, for offline replay.
pub fn read_log(path: &Path) -> Result<Vec<String>, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(bytes
        .split_inclusive(|b| *b == b'\n')
        .map(decode_line)
        .collect())
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

async fn identify(file: &File) -> Option<FileId> {
    file.metadata().await.ok().as_ref().and_then(file_id)
}

#[cfg(unix)]
fn file_id(meta: &std::fs::Metadata) -> Option<FileId> {
    use std::os::unix::fs::MetadataExt;
    Some((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn file_id(_meta: &std::fs::Metadata) -> Option<FileId> {
    None
}
