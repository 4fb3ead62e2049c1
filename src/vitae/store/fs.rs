use super::retry::{self, Sleeper, StorePolicy, ThreadSleeper};
use super::DocumentStore;
use crate::error::{Result, VitaeError};
use crate::model::Document;
use chrono::Local;
use parking_lot::Mutex;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const TMP_PREFIX: &str = "tmp_resume_";
const BACKUP_PREFIX: &str = "corrupt_backup_";

/// The raw filesystem calls the store retries. Swappable so tests can simulate a
/// file that another process keeps locked.
pub trait FileOps: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileOps;

impl FileOps for OsFileOps {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }
}

/// Result of the read loop. `Degraded` means every attempt failed, so the caller
/// never saw what is on disk.
enum Loaded {
    Ready(Document),
    Degraded { attempts: u32, last: VitaeError },
}

enum ReadFailure {
    /// The bytes are there but are not a document.
    Corrupt(serde_json::Error),
    /// Could not get at the bytes (or could not create the file) this time.
    Unavailable(VitaeError),
}

pub struct FileStore {
    path: PathBuf,
    policy: StorePolicy,
    ops: Box<dyn FileOps>,
    sleeper: Box<dyn Sleeper>,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: StorePolicy::default(),
            ops: Box::new(OsFileOps),
            sleeper: Box::new(ThreadSleeper),
            lock: Mutex::new(()),
        }
    }

    pub fn with_policy(mut self, policy: StorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn with_file_ops(mut self, ops: impl FileOps + 'static) -> Self {
        self.ops = Box::new(ops);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &StorePolicy {
        &self.policy
    }

    fn dir(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(VitaeError::Io)?;
        }
        Ok(())
    }

    // The `*_locked` helpers below expect the caller to hold `self.lock`.

    fn save_locked(&self, doc: &Document) -> Result<()> {
        let dir = self.dir();
        self.ensure_dir(&dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(TMP_PREFIX)
            .suffix(".json")
            .tempfile_in(&dir)
            .map_err(VitaeError::Io)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, doc).map_err(VitaeError::Serialization)?;
            writer.flush().map_err(VitaeError::Io)?;
        }
        tmp.as_file().sync_all().map_err(VitaeError::Io)?;

        // Dropping the TempPath on an early return removes the temp file.
        let tmp_path = tmp.into_temp_path();
        self.rename_with_retry(&tmp_path)?;
        // The temp name no longer exists; stop the drop guard from chasing it.
        let _ = tmp_path.keep();

        sync_dir(&dir);
        Ok(())
    }

    fn rename_with_retry(&self, from: &Path) -> Result<()> {
        let policy = self.policy.save;
        let max = policy.max_attempts();
        let mut attempt = 1;
        loop {
            match self.ops.rename(from, &self.path) {
                Ok(()) => return Ok(()),
                Err(err) if retry::is_transient(&err) => {
                    if attempt >= max {
                        return Err(VitaeError::Busy {
                            path: self.path.clone(),
                            attempts: attempt,
                            source: err,
                        });
                    }
                    let delay = policy.delay_for(attempt);
                    debug!(attempt, ?delay, error = %err, "target busy, retrying rename");
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(VitaeError::Io(err)),
            }
        }
    }

    fn load_locked(&self) -> Result<Loaded> {
        let policy = self.policy.load;
        let max = policy.max_attempts();
        let mut attempt = 1;
        loop {
            let outcome = if self.path.exists() {
                self.read_locked()
            } else {
                self.bootstrap_locked()
            };

            match outcome {
                Ok(doc) => return Ok(Loaded::Ready(doc)),
                Err(ReadFailure::Corrupt(err)) => {
                    return self.recover_locked(err).map(Loaded::Ready)
                }
                Err(ReadFailure::Unavailable(err)) => {
                    warn!(
                        attempt,
                        path = %self.path.display(),
                        error = %err,
                        "load attempt failed"
                    );
                    if attempt >= max {
                        return Ok(Loaded::Degraded {
                            attempts: attempt,
                            last: err,
                        });
                    }
                    self.sleeper.sleep(policy.delay_for(attempt));
                    attempt += 1;
                }
            }
        }
    }

    /// The error a write reports when the current document could not be read.
    fn unreadable(&self, attempts: u32, last: VitaeError) -> VitaeError {
        match last {
            VitaeError::Io(source) => VitaeError::Busy {
                path: self.path.clone(),
                attempts,
                source,
            },
            other => other,
        }
    }

    fn read_locked(&self) -> std::result::Result<Document, ReadFailure> {
        let bytes = self
            .ops
            .read(&self.path)
            .map_err(|e| ReadFailure::Unavailable(VitaeError::Io(e)))?;
        serde_json::from_slice(&bytes).map_err(ReadFailure::Corrupt)
    }

    fn bootstrap_locked(&self) -> std::result::Result<Document, ReadFailure> {
        let doc = Document::default();
        self.save_locked(&doc).map_err(ReadFailure::Unavailable)?;
        debug!(path = %self.path.display(), "created new document");
        Ok(doc)
    }

    fn recover_locked(&self, err: serde_json::Error) -> Result<Document> {
        warn!(
            path = %self.path.display(),
            error = %err,
            "document is not valid JSON, resetting to defaults"
        );
        match self.backup_corrupt() {
            Ok(backup) => info!(backup = %backup.display(), "backed up corrupt document"),
            Err(e) => error!(error = %e, "failed to back up corrupt document"),
        }

        let doc = Document::default();
        self.save_locked(&doc)?;
        Ok(doc)
    }

    fn backup_corrupt(&self) -> io::Result<PathBuf> {
        let dir = self.dir();
        let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f").to_string();
        let mut backup = dir.join(format!("{BACKUP_PREFIX}{stamp}.json"));
        let mut n = 1;
        while backup.exists() {
            backup = dir.join(format!("{BACKUP_PREFIX}{stamp}-{n}.json"));
            n += 1;
        }
        self.ops.copy(&self.path, &backup)?;
        Ok(backup)
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        debug!(dir = %dir.display(), error = %e, "directory fsync failed");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<Document> {
        let _guard = self.lock.lock();
        match self.load_locked()? {
            Loaded::Ready(doc) => Ok(doc),
            Loaded::Degraded { attempts, .. } => {
                error!(
                    path = %self.path.display(),
                    attempts,
                    "load failed after retries, using an empty document"
                );
                Ok(Document::default())
            }
        }
    }

    fn save(&self, doc: &Document) -> Result<()> {
        let _guard = self.lock.lock();
        self.save_locked(doc)
    }

    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let _guard = self.lock.lock();
        // An empty stand-in must never be saved over a document we could not read.
        let mut doc = match self.load_locked()? {
            Loaded::Ready(doc) => doc,
            Loaded::Degraded { attempts, last } => {
                error!(
                    path = %self.path.display(),
                    attempts,
                    "load failed after retries, nothing written"
                );
                return Err(self.unreadable(attempts, last));
            }
        };
        let out = f(&mut doc)?;
        self.save_locked(&doc)?;
        Ok(out)
    }
}
