//! Persistence Module
//!
//! The I/O edge of the cache. Everything here returns typed errors; the cache
//! turns them into log events so a bad disk never becomes a caller failure.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::cache::CacheEntry;

/// In-memory layout of a cache, and the shape written to disk.
pub type Entries<V> = HashMap<String, CacheEntry<V>>;

// == Persist Error ==
/// Failure while reading, writing or deleting a persisted cache.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed cache file {path}: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// == Persistence Trait ==
/// Storage backend for a persistent cache.
pub trait Persistence<V>: Send + Sync {
    /// Reads the stored entries. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Entries<V>>, PersistError>;

    /// Replaces the stored entries with `entries`.
    fn save(&self, entries: &Entries<V>) -> Result<(), PersistError>;

    /// Deletes the stored entries. Removing something that does not exist succeeds.
    fn remove(&self) -> Result<(), PersistError>;

    /// Human-readable location, used in log messages.
    fn location(&self) -> String;
}

// == JSON File ==
/// Persists the whole store as a single JSON object.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the new contents are written to before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("cache"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn serde_error(&self, source: serde_json::Error) -> PersistError {
        PersistError::Serde {
            path: self.path.clone(),
            source,
        }
    }
}

impl<V> Persistence<V> for JsonFile
where
    V: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<Entries<V>>, PersistError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        let entries = serde_json::from_slice(&bytes).map_err(|e| self.serde_error(e))?;
        Ok(Some(entries))
    }

    fn save(&self, entries: &Entries<V>) -> Result<(), PersistError> {
        let json = serde_json::to_vec(entries).map_err(|e| self.serde_error(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write then rename so a reader sees either the old or the new file
        let staging = self.staging_path();
        fs::write(&staging, json).map_err(|e| self.io_error(e))?;
        fs::rename(&staging, &self.path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            self.io_error(e)
        })
    }

    fn remove(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
