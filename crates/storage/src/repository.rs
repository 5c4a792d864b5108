use async_trait::async_trait;
use daily_core::model::{IdSet, Settings};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted id sets, addressed by the key names the store has always used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdSetKey {
    Learned,
    Favorites,
}

impl IdSetKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IdSetKey::Learned => "learned",
            IdSetKey::Favorites => "favs",
        }
    }
}

impl fmt::Display for IdSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of the settings record.
pub const SETTINGS_KEY: &str = "settings";

/// Repository contract for learning progress.
///
/// Each key is written atomically: readers observe either the previous or
/// the new value, never a partial set.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch an id set; an absent key reads as the empty set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or the stored
    /// value cannot be decoded.
    async fn get_ids(&self, key: IdSetKey) -> Result<IdSet, StorageError>;

    /// Replace an id set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn put_ids(&self, key: IdSetKey, ids: &IdSet) -> Result<(), StorageError>;

    /// Fetch persisted settings, `None` on first run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn get_settings(&self) -> Result<Option<Settings>, StorageError>;

    /// Persist settings.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn save_settings(&self, settings: &Settings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    id_sets: Arc<Mutex<HashMap<IdSetKey, IdSet>>>,
    settings: Arc<Mutex<Option<Settings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_ids(&self, key: IdSetKey) -> Result<IdSet, StorageError> {
        let guard = self
            .id_sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned().unwrap_or_default())
    }

    async fn put_ids(&self, key: IdSetKey, ids: &IdSet) -> Result<(), StorageError> {
        let mut guard = self
            .id_sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, ids.clone());
        Ok(())
    }

    async fn get_settings(&self) -> Result<Option<Settings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Wraps the progress repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryRepository::new()),
        }
    }
}
