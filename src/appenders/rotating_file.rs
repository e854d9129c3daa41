//! Size-based rotating file writer
//!
//! The active file keeps its configured name (`app.log`). When a write would
//! push it past the size limit, it is renamed to a timestamped backup
//! (`app-2025-01-08T10-30-45.123.log`), a fresh file is opened, and old
//! backups are pruned by count and age and optionally gzip-compressed
//! (`app-2025-01-08T10-30-45.123.log.gz`). Log shippers glob these names, so
//! the layout must not change.

use crate::core::error::{LoggerError, Result};
use chrono::{Local, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fallback rotation threshold when the configured size is zero
pub const DEFAULT_MAX_SIZE_MB: u64 = 512;

const MEGABYTE: u64 = 1024 * 1024;

/// strftime pattern embedded in backup file names
pub const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

const COMPRESS_SUFFIX: &str = ".gz";

/// Rotation and retention settings
///
/// # Examples
///
/// ```
/// use tee_logger::appenders::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(100)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(30 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_bytes(), 100 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotation threshold in bytes; zero selects [`DEFAULT_MAX_SIZE_MB`]
    pub max_bytes: u64,
    /// Rotated files to retain; zero keeps all of them
    pub max_backups: usize,
    /// Rotated files older than this are deleted; `None` never expires
    pub max_age: Option<Duration>,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: 0,
            max_age: None,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rotation threshold in bytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    /// Set the rotation threshold in megabytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = (!age.is_zero()).then_some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(self, days: u64) -> Self {
        self.with_max_age(Duration::from_secs(days.saturating_mul(24 * 3600)))
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Effective rotation threshold in bytes
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        if self.max_bytes == 0 {
            DEFAULT_MAX_SIZE_MB * MEGABYTE
        } else {
            self.max_bytes
        }
    }
}

/// A rotated file found next to the active log
#[derive(Debug, Clone)]
pub struct Backup {
    pub path: PathBuf,
    pub rotated_at: NaiveDateTime,
    pub compressed: bool,
}

/// Buffered file writer that rotates on size
///
/// Not synchronized; [`super::file::RotatingFileSink`] puts it behind a
/// mutex.
pub struct RotatingFileWriter {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    rotations: u64,
    last_rotated_at: Option<NaiveDateTime>,
}

impl RotatingFileWriter {
    /// Open (or create) the active log file, continuing after existing content
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::SinkConstruction`] if the directory or file
    /// cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LoggerError::sink_construction("file", e))?;
        }

        let file = Self::open_append(&base_path).map_err(|e| LoggerError::sink_construction("file", e))?;
        let current_size = file
            .metadata()
            .map_err(|e| LoggerError::sink_construction("file", e))?
            .len();

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
            rotations: 0,
            last_rotated_at: None,
        })
    }

    fn open_append(path: &Path) -> std::io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// Write one encoded record, rotating first if it would overflow the file
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        let len = buf.len() as u64;
        let max = self.policy.max_bytes();
        if len > max {
            return Err(LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("write length {} exceeds maximum file size {}", len, max),
            ));
        }

        if self.writer.is_none() {
            self.reopen()?;
        }

        if self.current_size + len > max {
            if let Err(e) = self.rotate() {
                eprintln!("[WARN] Log rotation failed: {}. Continuing with current file.", e);
                if self.writer.is_none() {
                    self.reopen().map_err(|reopen_err| {
                        eprintln!(
                            "[ERROR] Failed to reopen log file after rotation failure: {}",
                            reopen_err
                        );
                        e
                    })?;
                }
                // Let the file outgrow the limit instead of retrying on every write
                self.current_size = 0;
            }
        }

        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::file_appender(self.base_path.display().to_string(), "writer not initialized")
        })?;
        writer.write_all(buf).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += len;
        Ok(())
    }

    /// Flush buffered bytes and sync them to disk
    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
            writer.get_ref().sync_data().map_err(|e| {
                LoggerError::io_operation("syncing log file", self.base_path.display().to_string(), e)
            })?;
        }
        Ok(())
    }

    /// Close the active file, move it to a timestamped backup and start a new one
    pub fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                // into_parts hands back the unwritten bytes without a second flush
                let (_, unwritten) = writer.into_parts();
                let dropped = unwritten.map(|buf| buf.len()).unwrap_or(0);
                eprintln!(
                    "[LOGGER ERROR] Dropping {} buffered bytes of '{}': {}",
                    dropped,
                    self.base_path.display(),
                    e
                );
                return Err(LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!(
                        "Failed to flush before rotation ({} buffered bytes dropped): {}",
                        dropped, e
                    ),
                ));
            }
        }

        if self.base_path.exists() {
            let (backup, rotated_at) = self.next_backup_path();
            self.last_rotated_at = Some(rotated_at);
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rename to '{}': {}", backup.display(), e),
                )
            })?;
        }

        let file = Self::open_append(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;
        self.rotations += 1;

        if let Err(e) = self.mill() {
            eprintln!("[WARN] Failed to clean up rotated log files: {}", e);
        }
        Ok(())
    }

    fn reopen(&mut self) -> Result<()> {
        let file = Self::open_append(&self.base_path).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to reopen: {}", e),
            )
        })?;
        self.current_size = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn name_parts(&self) -> (String, String) {
        let prefix = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app")
            .to_string();
        let ext = self
            .base_path
            .extension()
            .and_then(|s| s.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (prefix, ext)
    }

    fn log_dir(&self) -> PathBuf {
        match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn backup_path_at(&self, rotated_at: NaiveDateTime) -> PathBuf {
        let (prefix, ext) = self.name_parts();
        self.log_dir()
            .join(format!("{}-{}{}", prefix, rotated_at.format(BACKUP_TIME_FORMAT), ext))
    }

    /// Backup name for a rotation happening now
    ///
    /// Stamps are strictly increasing per writer and never reuse an existing
    /// name, so rotations within one millisecond still sort in order.
    fn next_backup_path(&self) -> (PathBuf, NaiveDateTime) {
        let step = chrono::Duration::milliseconds(1);
        let now = Local::now().naive_local();
        let mut rotated_at = match self.last_rotated_at {
            Some(last) if last + step > now => last + step,
            _ => now,
        };
        loop {
            let candidate = self.backup_path_at(rotated_at);
            if !candidate.exists() && !gz_path(&candidate).exists() {
                return (candidate, rotated_at);
            }
            rotated_at += step;
        }
    }

    /// Rotated files belonging to this log, newest first
    pub fn backups(&self) -> Result<Vec<Backup>> {
        let (prefix, ext) = self.name_parts();
        let name_prefix = format!("{}-", prefix);
        let dir = self.log_dir();

        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation("listing log backups", dir.display().to_string(), e)
        })?;

        let mut backups = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(rest) = name.strip_prefix(&name_prefix) else { continue };

            let (stamp, compressed) = match rest.strip_suffix(COMPRESS_SUFFIX) {
                Some(inner) => (inner.strip_suffix(ext.as_str()), true),
                None => (rest.strip_suffix(ext.as_str()), false),
            };
            let Some(stamp) = stamp else { continue };

            if let Ok(rotated_at) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
                backups.push(Backup {
                    path: entry.path(),
                    rotated_at,
                    compressed,
                });
            }
        }

        backups.sort_by(|a, b| b.rotated_at.cmp(&a.rotated_at));
        Ok(backups)
    }

    /// Apply retention by count and age, then compress what remains
    fn mill(&mut self) -> Result<()> {
        if self.policy.max_backups == 0 && self.policy.max_age.is_none() && !self.policy.compress {
            return Ok(());
        }

        let mut remaining = self.backups()?;
        let mut doomed = Vec::new();

        if self.policy.max_backups > 0 {
            // A backup and its compressed twin count as one file
            let mut kept_stamps: Vec<NaiveDateTime> = Vec::new();
            let mut kept = Vec::new();
            for backup in remaining {
                if !kept_stamps.contains(&backup.rotated_at) {
                    kept_stamps.push(backup.rotated_at);
                }
                if kept_stamps.len() > self.policy.max_backups {
                    doomed.push(backup);
                } else {
                    kept.push(backup);
                }
            }
            remaining = kept;
        }

        let cutoff = self.policy.max_age.and_then(|age| {
            let age = chrono::Duration::from_std(age).ok()?;
            Local::now().naive_local().checked_sub_signed(age)
        });
        if let Some(cutoff) = cutoff {
            let (expired, fresh): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|b| b.rotated_at < cutoff);
            doomed.extend(expired);
            remaining = fresh;
        }

        for backup in &doomed {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!("[WARN] Failed to remove old backup {}: {}", backup.path.display(), e);
            }
        }

        if self.policy.compress {
            for backup in remaining.iter().filter(|b| !b.compressed) {
                compress_file(&backup.path)?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Number of rotations performed by this writer
    #[must_use]
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(COMPRESS_SUFFIX);
    PathBuf::from(name)
}

/// Gzip a rotated file using streaming I/O
///
/// The compressed copy is written to a temporary name and renamed into
/// place; the original is removed only after that succeeded.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, Read};

    let gz_path = gz_path(path);
    let mut temp_name = gz_path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(temp_name);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to read from file: {}", path.display()),
                e,
            )
        })?;
        if bytes_read == 0 {
            break;
        }
        encoder.write_all(&buffer[..bytes_read]).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to compress data chunk", e)
        })?;
    }

    encoder
        .finish()
        .and_then(|mut inner| inner.flush())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to finish compression", e)
        })?;

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}
