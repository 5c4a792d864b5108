use std::sync::Arc;

use daily_core::library::{self, LibraryFilter};
use daily_core::model::{Catalog, CommandRecord};

use crate::error::ServiceError;
use crate::mastery::MasteryTracker;

/// A library line: the record and the user's flags for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRow {
    pub record: CommandRecord,
    pub is_learned: bool,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryListing {
    pub filter: LibraryFilter,
    pub rows: Vec<LibraryRow>,
}

impl LibraryListing {
    /// Number of rows shown, for the "showing N" line.
    #[must_use]
    pub fn shown(&self) -> usize {
        self.rows.len()
    }
}

/// Library management surface over the catalog and current progress.
#[derive(Clone)]
pub struct LibraryService {
    catalog: Arc<Catalog>,
    tracker: MasteryTracker,
}

impl LibraryService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, tracker: MasteryTracker) -> Self {
        Self { catalog, tracker }
    }

    /// List the library for a filter and search query, recomputed on every call.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if progress cannot be read.
    pub async fn list(
        &self,
        filter: LibraryFilter,
        query: &str,
    ) -> Result<LibraryListing, ServiceError> {
        let progress = self.tracker.snapshot().await?;
        let rows = library::list(&self.catalog, &progress, filter, query)
            .into_iter()
            .map(|entry| LibraryRow {
                record: entry.record.clone(),
                is_learned: entry.is_learned,
                is_favorite: entry.is_favorite,
            })
            .collect();
        Ok(LibraryListing { filter, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use daily_core::model::{CommandId, IdSet};
    use storage::repository::{IdSetKey, InMemoryRepository, ProgressRepository};

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::new(vec![
                CommandRecord::new(CommandId::new(1), "ls", "List files", "", "", "", ""),
                CommandRecord::new(CommandId::new(2), "grep", "Match lines", "", "", "", ""),
                CommandRecord::new(CommandId::new(3), "zgrep", "Grep in gzip files", "", "", "", ""),
                CommandRecord::new(CommandId::new(4), "df -h", "Disk usage", "", "", "", ""),
            ])
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn favorites_only_listing_reads_store() {
        let repo = InMemoryRepository::new();
        let favs: IdSet = [2, 4].into_iter().map(CommandId::new).collect();
        repo.put_ids(IdSetKey::Favorites, &favs).await.unwrap();
        let service = LibraryService::new(catalog(), MasteryTracker::new(Arc::new(repo)));

        let listing = service.list(LibraryFilter::Favorites, "").await.unwrap();
        let ids: Vec<u64> = listing.rows.iter().map(|r| r.record.id().value()).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(listing.shown(), 2);
    }

    #[tokio::test]
    async fn listing_reflects_toggles_immediately() {
        let repo = InMemoryRepository::new();
        let tracker = MasteryTracker::new(Arc::new(repo));
        let service = LibraryService::new(catalog(), tracker.clone());

        tracker.toggle_learned(CommandId::new(3)).await.unwrap();
        let listing = service.list(LibraryFilter::All, "GREP").await.unwrap();
        assert_eq!(listing.shown(), 2);
        assert!(!listing.rows[0].is_learned);
        assert!(listing.rows[1].is_learned);

        tracker.toggle_learned(CommandId::new(3)).await.unwrap();
        let learned = service.list(LibraryFilter::Learned, "").await.unwrap();
        assert!(learned.rows.is_empty());
    }
}
