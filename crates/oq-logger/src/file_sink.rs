//! File-based record sink with rotation support.
//!
//! This module provides:
//! - [`RotationPolicy`] — Size, backup-count, age and compression limits
//! - [`RotatingSink`] — Appends records to one active file and archives it
//!   when the size limit is reached
//!
//! Rotated files live next to the active file and are named
//! `<stem>-<YYYY-MM-DDTHH-MM-SS.mmm>-<seq>.<ext>` (UTC), with `.gz` appended
//! once compressed. Backup-count and age limits are enforced on every
//! rotation; there is no background sweep.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use oq_config::LoggingConfig;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::traits::LogSink;

/// Layout of the timestamp embedded in backup file names.
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

const COMPRESS_SUFFIX: &str = ".gz";

/// Rotation limits for a [`RotatingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Path of the active log file.
    pub filename: PathBuf,
    /// Size in bytes after which the active file is rotated. `None` never rotates.
    pub max_size: Option<u64>,
    /// Number of backups to keep. Zero keeps all.
    pub max_backups: usize,
    /// Age after which backups are removed. `None` keeps them forever.
    pub max_age: Option<TimeDelta>,
    /// Whether backups are gzip-compressed.
    pub compress: bool,
}

impl RotationPolicy {
    /// Creates a policy for the given file that never rotates.
    #[must_use]
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            max_size: None,
            max_backups: 0,
            max_age: None,
            compress: false,
        }
    }

    /// Builds a policy from the `[logging]` configuration section.
    ///
    /// Sizes there are in bytes. Zero values disable the corresponding limit.
    #[must_use]
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self::new(&config.filename)
            .with_max_size_bytes(config.max_size)
            .with_max_backups(config.max_backups)
            .with_max_age_days(config.max_age)
            .with_compress(config.compress)
    }

    /// Sets the rotation size in bytes. Zero disables rotation.
    #[must_use]
    pub fn with_max_size_bytes(mut self, bytes: u64) -> Self {
        self.max_size = (bytes > 0).then_some(bytes);
        self
    }

    /// Sets the number of retained backups.
    #[must_use]
    pub const fn with_max_backups(mut self, backups: usize) -> Self {
        self.max_backups = backups;
        self
    }

    /// Sets the backup retention age in days. Zero disables age-based removal.
    #[must_use]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age = i64::try_from(days)
            .ok()
            .filter(|d| *d > 0)
            .and_then(TimeDelta::try_days);
        self
    }

    /// Enables or disables compression of backups.
    #[must_use]
    pub const fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Returns true if appending `len` bytes to a file of `current` bytes
    /// crosses the size limit.
    #[must_use]
    pub fn exceeds(&self, current: u64, len: u64) -> bool {
        self.max_size
            .is_some_and(|max| current.saturating_add(len) > max)
    }

    fn dir(&self) -> &Path {
        match self.filename.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn stem(&self) -> String {
        self.filename
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn extension(&self) -> String {
        self.filename
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    fn backup_path(&self, timestamp: DateTime<Utc>, seq: u64) -> PathBuf {
        let name = format!(
            "{}-{}-{seq:04}{}",
            self.stem(),
            timestamp.format(BACKUP_TIME_FORMAT),
            self.extension()
        );
        self.dir().join(name)
    }

    /// Recognizes a backup of this policy's file by name.
    fn parse_backup(&self, path: &Path) -> Option<BackupFile> {
        let name = path.file_name()?.to_str()?;
        let (name, compressed) = match name.strip_suffix(COMPRESS_SUFFIX) {
            Some(inner) => (inner, true),
            None => (name, false),
        };
        let prefix = format!("{}-", self.stem());
        let middle = name
            .strip_prefix(prefix.as_str())?
            .strip_suffix(self.extension().as_str())?;
        let (time, seq) = middle.rsplit_once('-')?;
        let timestamp = NaiveDateTime::parse_from_str(time, BACKUP_TIME_FORMAT)
            .ok()?
            .and_utc();
        let seq = seq.parse().ok()?;

        Some(BackupFile {
            path: path.to_path_buf(),
            timestamp,
            seq,
            compressed,
        })
    }
}

/// A rotated log file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFile {
    /// Location of the backup.
    pub path: PathBuf,
    /// When the backup was rotated out.
    pub timestamp: DateTime<Utc>,
    /// Sequence number distinguishing rotations within one millisecond.
    pub seq: u64,
    /// Whether the backup is gzip-compressed.
    pub compressed: bool,
}

/// Internal state for the active file.
struct FileState {
    /// Open handle, `None` until the first write or after a failure.
    file: Option<File>,
    /// Bytes in the active file.
    size: u64,
    /// Next backup sequence number.
    seq: u64,
}

/// Appends encoded records to a file, rotating it by size.
///
/// All file operations happen under one lock, so each record lands in the
/// file as a single contiguous write and rotation decisions are never lost.
pub struct RotatingSink {
    policy: RotationPolicy,
    state: Mutex<FileState>,
}

impl RotatingSink {
    /// Creates a sink. The file is opened lazily on the first write.
    #[must_use]
    pub fn new(policy: RotationPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(FileState {
                file: None,
                size: 0,
                seq: 0,
            }),
        }
    }

    /// Returns the rotation policy.
    #[must_use]
    pub const fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.policy.filename
    }

    /// Bytes written to the active file, as tracked by the sink.
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.state.lock().size
    }

    /// Appends one record, rotating first if it would cross the size limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, rotated or written.
    /// The handle is dropped on failure so the next write reopens the file.
    pub fn write(&self, record: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let len = record.len() as u64;

        if state.file.is_none() {
            self.open_existing_or_new(&mut state, len)?;
        }

        if state.size > 0 && self.policy.exceeds(state.size, len) {
            self.rotate_locked(&mut state)?;
        }

        let Some(file) = state.file.as_mut() else {
            return Err(io::Error::other("log file is not open").into());
        };
        if let Err(e) = file.write_all(record) {
            state.file = None;
            return Err(e.into());
        }
        state.size += len;
        Ok(())
    }

    /// Rotates the active file now, regardless of its size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be renamed or reopened.
    pub fn rotate(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.rotate_locked(&mut state)
    }

    /// Lists backups of the active file, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn backups(&self) -> Result<Vec<BackupFile>> {
        let dir = self.policy.dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups: Vec<BackupFile> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter_map(|p| self.policy.parse_backup(&p))
            .collect();

        // Newest first; an uncompressed copy sorts ahead of its .gz twin.
        backups.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then(b.seq.cmp(&a.seq))
                .then(a.compressed.cmp(&b.compressed))
        });
        backups.dedup_by(|later, earlier| {
            later.timestamp == earlier.timestamp && later.seq == earlier.seq
        });
        Ok(backups)
    }

    // ========== Internal Methods ==========

    fn open_existing_or_new(&self, state: &mut FileState, len: u64) -> Result<()> {
        let path = &self.policy.filename;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        match fs::metadata(path) {
            Ok(meta) if meta.len() > 0 && self.policy.exceeds(meta.len(), len) => {
                state.size = meta.len();
                self.rotate_locked(state)
            }
            Ok(meta) => {
                state.file = Some(open_append(path)?);
                state.size = meta.len();
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                state.file = Some(open_append(path)?);
                state.size = 0;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn rotate_locked(&self, state: &mut FileState) -> Result<()> {
        state.file = None;

        let path = &self.policy.filename;
        if path.exists() {
            let backup = self.policy.backup_path(Utc::now(), state.seq);
            state.seq += 1;
            fs::rename(path, &backup)?;
            debug!(
                active = %path.display(),
                backup = %backup.display(),
                "rotated log file"
            );
        }

        state.file = Some(open_append(path)?);
        state.size = 0;

        if let Err(e) = self.enforce_retention() {
            warn!(error = %e, path = %path.display(), "failed to enforce log retention");
        }
        Ok(())
    }

    /// Removes surplus or expired backups, then compresses the survivors.
    fn enforce_retention(&self) -> Result<()> {
        let mut backups = self.backups()?;
        let mut expired = Vec::new();

        if self.policy.max_backups > 0 && backups.len() > self.policy.max_backups {
            expired.extend(backups.split_off(self.policy.max_backups));
        }

        if let Some(max_age) = self.policy.max_age {
            let cutoff = Utc::now() - max_age;
            let (old, keep): (Vec<_>, Vec<_>) =
                backups.into_iter().partition(|b| b.timestamp < cutoff);
            expired.extend(old);
            backups = keep;
        }

        for backup in &expired {
            remove_backup(backup);
        }

        if self.policy.compress {
            for backup in backups.iter().filter(|b| !b.compressed) {
                if let Err(e) = compress_file(&backup.path) {
                    warn!(
                        error = %e,
                        path = %backup.path.display(),
                        "failed to compress log backup"
                    );
                }
            }
        }
        Ok(())
    }
}

impl LogSink for RotatingSink {
    fn write_record(&self, record: &[u8]) -> Result<()> {
        self.write(record)
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(file) = state.file.as_mut() {
            file.flush()?;
            file.sync_data()?;
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(COMPRESS_SUFFIX);
    PathBuf::from(name)
}

fn remove_backup(backup: &BackupFile) {
    let mut paths = vec![backup.path.clone()];
    if !backup.compressed {
        paths.push(gz_path(&backup.path));
    }
    for path in paths {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed log backup"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %path.display(), "failed to remove log backup"),
        }
    }
}

/// Gzips `src` into `src.gz` and removes `src`.
fn compress_file(src: &Path) -> Result<()> {
    let dst = gz_path(src);
    let result = (|| -> Result<()> {
        let mut reader = BufReader::new(File::open(src)?);
        let out = BufWriter::new(File::create(&dst)?);
        let mut encoder = GzEncoder::new(out, Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&dst);
        return Err(e);
    }
    fs::remove_file(src)?;
    debug!(path = %dst.display(), "compressed log backup");
    Ok(())
}
