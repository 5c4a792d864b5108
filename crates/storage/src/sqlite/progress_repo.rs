use async_trait::async_trait;
use daily_core::model::{IdSet, Settings};
use sqlx::Row;

use crate::repository::{IdSetKey, ProgressRepository, SETTINGS_KEY, StorageError};

use super::SqliteRepository;
use super::mapping::{decode, encode};

impl SqliteRepository {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT value
            FROM kv_entries
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        row.try_get::<String, _>("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn put_raw(&self, key: &str, value: String) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_ids(&self, key: IdSetKey) -> Result<IdSet, StorageError> {
        match self.get_raw(key.as_str()).await? {
            Some(raw) => decode(key.as_str(), &raw),
            None => Ok(IdSet::new()),
        }
    }

    async fn put_ids(&self, key: IdSetKey, ids: &IdSet) -> Result<(), StorageError> {
        let raw = encode(key.as_str(), ids)?;
        self.put_raw(key.as_str(), raw).await
    }

    async fn get_settings(&self) -> Result<Option<Settings>, StorageError> {
        self.get_raw(SETTINGS_KEY)
            .await?
            .map(|raw| decode(SETTINGS_KEY, &raw))
            .transpose()
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let raw = encode(SETTINGS_KEY, settings)?;
        self.put_raw(SETTINGS_KEY, raw).await
    }
}
