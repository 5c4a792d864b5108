use std::sync::Arc;

use daily_core::model::{SearchEngine, Settings, SettingsDraft};
use storage::repository::ProgressRepository;
use tokio::sync::Mutex;
use url::Url;

use crate::error::ServiceError;

/// Reads and writes the settings record.
///
/// Writes hold a lock shared by all clones, so two changes to different
/// fields cannot overwrite each other.
#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn ProgressRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl SettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            repo,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn load(&self) -> Result<Settings, ServiceError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if validation fails or persistence fails.
    pub async fn save(&self, draft: SettingsDraft) -> Result<Settings, ServiceError> {
        let settings = draft.validate()?;
        let _guard = self.write_lock.lock().await;
        self.repo.save_settings(&settings).await?;
        Ok(settings)
    }

    /// Edit the stored settings in place: `edit` receives a draft of the
    /// current values, and the validated result is written back.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if validation or storage fails.
    pub async fn update(
        &self,
        edit: impl FnOnce(&mut SettingsDraft),
    ) -> Result<Settings, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let current = self.load().await?;
        let mut draft = SettingsDraft::from_settings(&current);
        edit(&mut draft);
        let updated = draft.validate()?;
        if updated != current {
            self.repo.save_settings(&updated).await?;
        }
        Ok(updated)
    }

    /// Switch the search engine, keeping the other settings.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn set_engine(&self, engine: SearchEngine) -> Result<Settings, ServiceError> {
        let updated = self.update(|draft| draft.engine = Some(engine)).await?;
        tracing::debug!(%engine, "search engine changed");
        Ok(updated)
    }

    /// Redirect URL for a web search with the configured engine.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` on storage failures or if the URL cannot be built.
    pub async fn search_url(&self, query: &str) -> Result<Url, ServiceError> {
        let settings = self.load().await?;
        Ok(settings.engine().search_url(query)?)
    }
}
