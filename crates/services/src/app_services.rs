use std::sync::Arc;

use daily_core::model::Catalog;
use daily_core::selection::{RandomSource, ThreadRandom};
use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::library_service::LibraryService;
use crate::mastery::MasteryTracker;
use crate::settings_service::SettingsService;
use crate::study_session::StudySession;

/// Assembles app-facing services over one catalog and one progress store.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    tracker: MasteryTracker,
    settings: Arc<SettingsService>,
    library: Arc<LibraryService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, catalog: Catalog) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        tracing::debug!(commands = catalog.len(), "services ready on sqlite storage");
        Ok(Self::from_storage(&storage, catalog))
    }

    /// Build services that keep progress in memory only.
    #[must_use]
    pub fn in_memory(catalog: Catalog) -> Self {
        Self::from_storage(&Storage::in_memory(), catalog)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let tracker = MasteryTracker::new(Arc::clone(&storage.progress));
        let settings = Arc::new(SettingsService::new(Arc::clone(&storage.progress)));
        let library = Arc::new(LibraryService::new(Arc::clone(&catalog), tracker.clone()));
        Self {
            catalog,
            tracker,
            settings,
            library,
        }
    }

    #[must_use]
    pub fn tracker(&self) -> MasteryTracker {
        self.tracker.clone()
    }

    #[must_use]
    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }

    #[must_use]
    pub fn library(&self) -> Arc<LibraryService> {
        Arc::clone(&self.library)
    }

    /// Open a view session drawing from the thread-local generator.
    #[must_use]
    pub fn study_session(&self) -> StudySession {
        self.study_session_with(Box::new(ThreadRandom))
    }

    /// Open a view session with a caller-provided random source.
    #[must_use]
    pub fn study_session_with(&self, rng: Box<dyn RandomSource>) -> StudySession {
        StudySession::new(
            Arc::clone(&self.catalog),
            self.tracker.clone(),
            self.settings.as_ref().clone(),
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use std::sync::Mutex;

    use tracing_subscriber::EnvFilter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn sqlite_bootstrap_is_quiet_at_info() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("services=info"))
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let catalog = Catalog::from_json(r#"[{"id": 1, "command": "ls", "description": "List"}]"#)
            .unwrap();
        let services =
            AppServices::new_sqlite("sqlite:file:memdb_quiet_bootstrap?mode=memory&cache=shared", catalog)
                .await
                .unwrap();
        assert!(services.tracker().learned().await.unwrap().is_empty());
        tracing::info!("capture check");

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("capture check"));
        assert!(!output.contains("services ready"), "unexpected log output: {output}");
    }
}
