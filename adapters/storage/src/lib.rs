#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Key/value persistence for high scores, statistics and saved sessions.
//!
//! Stores hold opaque string payloads under string keys. [`Persistence`]
//! layers typed access on top and degrades to defaults when data is missing
//! or unreadable, so a broken store never blocks play.

mod file;

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use snake_arcade_core::{SessionSave, StatsRecord};
use thiserror::Error;
use tracing::warn;

pub use file::FileStore;

/// Key holding the best score as a JSON number.
pub const HIGH_SCORE_KEY: &str = "snake-arcade.high-score";
/// Key holding the lifetime statistics record.
pub const STATS_KEY: &str = "snake-arcade.stats";
/// Key holding the saved session checkpoint.
pub const SAVE_KEY: &str = "snake-arcade.save";

/// Errors raised while reading or writing a store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("store at {path} is not accessible")]
    Io {
        /// Location of the backing file.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A payload could not be encoded or decoded.
    #[error("payload under `{key}` is malformed")]
    Payload {
        /// Key whose payload failed.
        key: String,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Minimal key/value collaborator used for persistence.
pub trait Store {
    /// Returns the payload stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous payload.
    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Removes the payload stored under `key`.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store used by tests and by sessions that opt out of persistence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let _ = self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let _ = self.entries.remove(key);
        Ok(())
    }
}

/// Typed persistence over any [`Store`].
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: Store> Persistence<S> {
    /// Wraps the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the wrapper and returns the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Best score on record, or zero when absent or unreadable.
    pub fn load_high_score(&self) -> u32 {
        self.load_or_default(HIGH_SCORE_KEY)
    }

    /// Lifetime statistics, or a fresh record when absent or unreadable.
    pub fn load_statistics(&self) -> StatsRecord {
        self.load_or_default(STATS_KEY)
    }

    /// Saved session checkpoint, if one is stored and readable.
    pub fn load_session(&self) -> Option<SessionSave> {
        self.load_or_default(SAVE_KEY)
    }

    /// Persists the best score.
    pub fn save_high_score(&mut self, score: u32) -> Result<(), StorageError> {
        self.save(HIGH_SCORE_KEY, &score)
    }

    /// Persists the statistics record.
    pub fn save_statistics(&mut self, record: &StatsRecord) -> Result<(), StorageError> {
        self.save(STATS_KEY, record)
    }

    /// Persists a session checkpoint.
    pub fn save_session(&mut self, save: &SessionSave) -> Result<(), StorageError> {
        self.save(SAVE_KEY, save)
    }

    /// Removes any stored session checkpoint.
    pub fn clear_session(&mut self) -> Result<(), StorageError> {
        self.store.remove(SAVE_KEY)
    }

    fn load_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.load(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(error) => {
                warn!(key, %error, "ignoring unreadable stored data");
                T::default()
            }
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(payload) = self.store.read(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|source| StorageError::Payload {
                key: key.to_owned(),
                source,
            })
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let payload = serde_json::to_string(value).map_err(|source| StorageError::Payload {
            key: key.to_owned(),
            source,
        })?;
        self.store.write(key, payload)
    }
}
