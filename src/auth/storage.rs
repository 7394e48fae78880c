// ABOUTME: Session storage backends holding the bearer token and serialized user record
// ABOUTME: In-memory storage for process lifetime, file storage for persistence across runs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::constants::storage_keys;
use crate::errors::{ClientError, ClientResult};

/// String key/value storage for the auth session
pub trait SessionStorage: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Remove a value; removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// Storage that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ClientError {
    ClientError::storage("session storage lock poisoned")
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// Storage persisted as a JSON object in a single file
///
/// Meant for a small local file. The parsed contents are kept in memory and
/// the file is only re-read when its modification time or length changes, so
/// the per-request token lookup costs one `stat` while logins written by other
/// processes are still picked up. A missing or corrupt file reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
    snapshot: Mutex<Option<Snapshot>>,
}

/// Parsed file contents and the metadata they were read at
#[derive(Debug)]
struct Snapshot {
    stamp: FileStamp,
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(metadata: &fs::Metadata) -> Self {
        Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        }
    }
}

impl FileStorage {
    /// Use the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            snapshot: Mutex::new(None),
        }
    }

    /// Default location under the platform data directory
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| {
            dir.join(storage_keys::APP_DIR)
                .join(storage_keys::SESSION_FILE_NAME)
        })
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stamp(&self) -> ClientResult<Option<FileStamp>> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(Some(FileStamp::of(&metadata))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::storage(format!(
                "Failed to stat {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn read_all(&self) -> ClientResult<BTreeMap<String, String>> {
        let mut snapshot = self.snapshot.lock().map_err(poisoned)?;
        let Some(stamp) = self.stamp()? else {
            *snapshot = None;
            return Ok(BTreeMap::new());
        };
        if let Some(current) = snapshot.as_ref().filter(|s| s.stamp == stamp) {
            return Ok(current.entries.clone());
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                *snapshot = None;
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(ClientError::storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let entries: BTreeMap<String, String> =
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                BTreeMap::new()
            });
        *snapshot = Some(Snapshot {
            stamp,
            entries: entries.clone(),
        });
        drop(snapshot);
        Ok(entries)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ClientError::storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let serialized = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::serialization("session file", e))?;
        fs::write(&self.path, serialized).map_err(|e| {
            ClientError::storage(format!("Failed to write {}: {e}", self.path.display()))
        })?;
        // Forces the next read to reload, even if the stamp did not move
        *self.snapshot.lock().map_err(poisoned)? = None;
        debug!(path = %self.path.display(), keys = entries.len(), "Session file written");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> ClientResult<()> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let mut entries = self.read_all()?;
        apply(&mut entries);
        self.write_all(&entries)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
