use std::sync::Arc;

use daily_core::model::{CommandId, IdSet, ProgressState};
use storage::repository::{IdSetKey, ProgressRepository};
use tokio::sync::Mutex;

use crate::error::ServiceError;

/// Mutates and queries the learned and favorite sets.
///
/// Every mutation is a read-modify-write of one key performed while holding
/// that key's lock, so overlapping toggles from rapid clicks cannot lose an
/// update. A mutation returns only after the store acknowledged the write.
/// Clones share the locks.
#[derive(Clone)]
pub struct MasteryTracker {
    repo: Arc<dyn ProgressRepository>,
    learned_lock: Arc<Mutex<()>>,
    favorites_lock: Arc<Mutex<()>>,
}

impl MasteryTracker {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            repo,
            learned_lock: Arc::new(Mutex::new(())),
            favorites_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock_for(&self, key: IdSetKey) -> &Mutex<()> {
        match key {
            IdSetKey::Learned => &self.learned_lock,
            IdSetKey::Favorites => &self.favorites_lock,
        }
    }

    async fn update<R>(
        &self,
        key: IdSetKey,
        apply: impl FnOnce(&mut IdSet) -> R,
    ) -> Result<R, ServiceError> {
        let _guard = self.lock_for(key).lock().await;
        let before = self.repo.get_ids(key).await?;
        let mut after = before.clone();
        let result = apply(&mut after);
        if after != before {
            if let Err(err) = self.repo.put_ids(key, &after).await {
                tracing::warn!(%key, error = %err, "progress write failed");
                return Err(err.into());
            }
        }
        Ok(result)
    }

    /// Add `id` to the learned set. Repeating the call changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store cannot be read or written.
    pub async fn mark_learned(&self, id: CommandId) -> Result<bool, ServiceError> {
        let added = self
            .update(IdSetKey::Learned, |set| set.insert(id))
            .await?;
        tracing::debug!(%id, added, "marked learned");
        Ok(true)
    }

    /// Put `id` back in rotation. Removing an id that is not learned changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn unmark_learned(&self, id: CommandId) -> Result<(), ServiceError> {
        let removed = self
            .update(IdSetKey::Learned, |set| set.remove(id))
            .await?;
        tracing::debug!(%id, removed, "unmarked learned");
        Ok(())
    }

    /// Flip learned membership, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn toggle_learned(&self, id: CommandId) -> Result<bool, ServiceError> {
        let learned = self
            .update(IdSetKey::Learned, |set| set.toggle(id))
            .await?;
        tracing::debug!(%id, learned, "toggled learned");
        Ok(learned)
    }

    /// Flip favorite membership, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn toggle_favorite(&self, id: CommandId) -> Result<bool, ServiceError> {
        let favorite = self
            .update(IdSetKey::Favorites, |set| set.toggle(id))
            .await?;
        tracing::debug!(%id, favorite, "toggled favorite");
        Ok(favorite)
    }

    /// Forget every learned command. Favorites are kept.
    ///
    /// Callers are expected to have confirmed the reset with the user.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn reset_learned(&self) -> Result<(), ServiceError> {
        let cleared = self
            .update(IdSetKey::Learned, |set| {
                let count = set.len();
                set.clear();
                count
            })
            .await?;
        tracing::info!(cleared, "learned progress reset");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn is_learned(&self, id: CommandId) -> Result<bool, ServiceError> {
        Ok(self.repo.get_ids(IdSetKey::Learned).await?.contains(id))
    }

    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn is_favorite(&self, id: CommandId) -> Result<bool, ServiceError> {
        Ok(self.repo.get_ids(IdSetKey::Favorites).await?.contains(id))
    }

    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn learned(&self) -> Result<IdSet, ServiceError> {
        Ok(self.repo.get_ids(IdSetKey::Learned).await?)
    }

    /// Read learned, favorites and settings in one go (settings default on first run).
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn snapshot(&self) -> Result<ProgressState, ServiceError> {
        let learned = self.repo.get_ids(IdSetKey::Learned).await?;
        let favorites = self.repo.get_ids(IdSetKey::Favorites).await?;
        let settings = self.repo.get_settings().await?.unwrap_or_default();
        Ok(ProgressState {
            learned,
            favorites,
            settings,
        })
    }
}
