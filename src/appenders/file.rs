//! Rotating file sink implementation

use super::rotating_file::{Backup, RotatingFileWriter, RotationPolicy};
use crate::core::error::Result;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Thread-safe front of a [`RotatingFileWriter`]
///
/// The mutex serializes writers of this one file; it is never held while
/// another sink is written.
pub struct RotatingFileSink {
    path: PathBuf,
    inner: Mutex<RotatingFileWriter>,
}

impl RotatingFileSink {
    pub fn new(path: impl AsRef<Path>, policy: RotationPolicy) -> Result<Self> {
        let writer = RotatingFileWriter::new(path.as_ref(), policy)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            inner: Mutex::new(writer),
        })
    }

    pub fn write(&self, record: &[u8]) -> Result<()> {
        self.inner.lock().write(record)
    }

    pub fn flush(&self) -> Result<()> {
        self.inner.lock().flush()
    }

    /// Force a rotation regardless of the current size
    pub fn rotate(&self) -> Result<()> {
        self.inner.lock().rotate()
    }

    pub fn backups(&self) -> Result<Vec<Backup>> {
        self.inner.lock().backups()
    }

    pub fn rotations(&self) -> u64 {
        self.inner.lock().rotations()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
