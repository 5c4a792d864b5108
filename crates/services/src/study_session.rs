use std::sync::Arc;

use daily_core::library;
use daily_core::model::{
    Catalog, CommandId, CommandRecord, ExplanationItem, ProgressState, ProgressSummary,
    parse_explanation,
};
use daily_core::selection::{RandomSource, Selection, pick_review, select_next};

use crate::error::ServiceError;
use crate::library_service::LibraryService;
use crate::mastery::MasteryTracker;
use crate::settings_service::SettingsService;

/// Everything the main card needs to render one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCard {
    pub record: CommandRecord,
    pub is_learned: bool,
    pub is_favorite: bool,
    /// Shown after every command is learned; nothing new to master.
    pub review_mode: bool,
    pub progress: ProgressSummary,
}

impl DisplayCard {
    fn new(
        record: &CommandRecord,
        state: &ProgressState,
        review_mode: bool,
        progress: ProgressSummary,
    ) -> Self {
        Self {
            record: record.clone(),
            is_learned: state.is_learned(record.id()),
            is_favorite: state.is_favorite(record.id()),
            review_mode,
            progress,
        }
    }

    #[must_use]
    pub fn explanation_items(&self) -> Vec<ExplanationItem> {
        parse_explanation(self.record.explanation())
    }
}

/// Result of [`StudySession::load_next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Card(DisplayCard),
    /// All commands are learned; the card is a random review pick.
    Exhausted(DisplayCard),
    NoData,
}

impl LoadOutcome {
    #[must_use]
    pub fn card(&self) -> Option<&DisplayCard> {
        match self {
            LoadOutcome::Card(card) | LoadOutcome::Exhausted(card) => Some(card),
            LoadOutcome::NoData => None,
        }
    }
}

/// State of one open view: the catalog, the command on screen and the
/// services user actions go through.
///
/// The cursor only moves after the store has been read successfully, so a
/// storage failure leaves the view on its previous card.
pub struct StudySession {
    catalog: Arc<Catalog>,
    tracker: MasteryTracker,
    settings: SettingsService,
    rng: Box<dyn RandomSource>,
    current: Option<CommandId>,
}

impl StudySession {
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        tracker: MasteryTracker,
        settings: SettingsService,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            catalog,
            tracker,
            settings,
            rng,
            current: None,
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &MasteryTracker {
        &self.tracker
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    #[must_use]
    pub fn library(&self) -> LibraryService {
        LibraryService::new(Arc::clone(&self.catalog), self.tracker.clone())
    }

    /// Id of the command currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<CommandId> {
        self.current
    }

    /// Pick and present the next command.
    ///
    /// With `force_advance` the command on screen is skipped when another
    /// unlearned command exists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if progress cannot be read.
    pub async fn load_next(&mut self, force_advance: bool) -> Result<LoadOutcome, ServiceError> {
        let state = self.tracker.snapshot().await?;
        let progress = ProgressSummary::for_catalog(&self.catalog, &state.learned);
        let catalog = Arc::clone(&self.catalog);

        let selection = select_next(
            &catalog,
            &state.learned,
            self.current,
            force_advance,
            &mut *self.rng,
        );
        let (record, review_mode) = match selection {
            Selection::Next(record) => (record, false),
            Selection::Exhausted => match pick_review(&catalog, &mut *self.rng) {
                Some(record) => (record, true),
                None => return Ok(self.no_data()),
            },
            Selection::NoData => return Ok(self.no_data()),
        };

        self.current = Some(record.id());
        tracing::debug!(id = %record.id(), review_mode, force_advance, "presenting command");

        let card = DisplayCard::new(record, &state, review_mode, progress);
        Ok(if review_mode {
            LoadOutcome::Exhausted(card)
        } else {
            LoadOutcome::Card(card)
        })
    }

    fn no_data(&mut self) -> LoadOutcome {
        self.current = None;
        LoadOutcome::NoData
    }

    /// "I learned this": mark the current command learned and advance.
    ///
    /// Returns `None` when nothing is on screen.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn master_current(&mut self) -> Result<Option<LoadOutcome>, ServiceError> {
        let Some(id) = self.current else {
            return Ok(None);
        };
        self.tracker.mark_learned(id).await?;
        self.load_next(true).await.map(Some)
    }

    /// Toggle the favorite flag of the command on screen, returning the new flag.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn favorite_current(&self) -> Result<Option<(CommandId, bool)>, ServiceError> {
        let Some(id) = self.current else {
            return Ok(None);
        };
        let favorite = self.tracker.toggle_favorite(id).await?;
        Ok(Some((id, favorite)))
    }

    /// Present a specific command, e.g. a quick-search hit.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CommandNotFound` if the id is not in the catalog,
    /// or `ServiceError::StorageUnavailable` on storage failures.
    pub async fn jump_to(&mut self, id: CommandId) -> Result<DisplayCard, ServiceError> {
        let catalog = Arc::clone(&self.catalog);
        let record = catalog.get(id).ok_or(ServiceError::CommandNotFound(id))?;
        let state = self.tracker.snapshot().await?;
        let progress = ProgressSummary::for_catalog(&catalog, &state.learned);
        self.current = Some(id);
        Ok(DisplayCard::new(record, &state, progress.is_complete(), progress))
    }

    /// Re-read flags for the command on screen without moving the cursor.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn current_card(&self) -> Result<Option<DisplayCard>, ServiceError> {
        let Some(record) = self.current.and_then(|id| self.catalog.get(id)) else {
            return Ok(None);
        };
        let state = self.tracker.snapshot().await?;
        let progress = ProgressSummary::for_catalog(&self.catalog, &state.learned);
        Ok(Some(DisplayCard::new(record, &state, progress.is_complete(), progress)))
    }

    /// Quick search over the whole catalog.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<CommandRecord> {
        library::quick_search(&self.catalog, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Learned count, catalog size and the floored percentage.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` on storage failures.
    pub async fn progress_summary(&self) -> Result<ProgressSummary, ServiceError> {
        let learned = self.tracker.learned().await?;
        Ok(ProgressSummary::for_catalog(&self.catalog, &learned))
    }
}
