//! Atomic TOML file operations.
//!
//! Writes go to a temporary sibling file that is fsynced and renamed over the
//! target; read-modify-write cycles hold an exclusive lock file.

use mirage_core::MirageError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicTomlError> for MirageError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io(e) => e.into(),
            AtomicTomlError::Parse(e) => e.into(),
            AtomicTomlError::Serialize(e) => e.into(),
            AtomicTomlError::Lock(message) => MirageError::persistence(message),
        }
    }
}

/// A handle to a TOML file that is never observed half-written.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `f` receives the current value (or `default_value` when the file does
    /// not exist yet). The modified value is saved only when `f` succeeds, and
    /// `f`'s output is returned.
    pub fn update<R, F>(&self, default_value: T, f: F) -> Result<R, AtomicTomlError>
    where
        F: FnOnce(&mut T) -> Result<R, AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let output = f(&mut data)?;
        self.save(&data)?;

        Ok(output)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let invalid = |what: &str| {
            AtomicTomlError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Path has no {what}"),
            ))
        };
        let parent = self.path.parent().ok_or_else(|| invalid("parent directory"))?;
        let file_name = self.path.file_name().ok_or_else(|| invalid("file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock guard; the lock file is removed on drop.
struct FileLock {
    _file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicTomlError::Lock(format!("Failed to acquire lock: {e}")))?;
        }

        Ok(FileLock {
            _file: file,
            lock_path,
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock happens when the handle closes; removing the file is best effort.
        let _ = fs::remove_file(&self.lock_path);
    }
}
