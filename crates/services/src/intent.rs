//! Named user intents: the single entry point a front end binds its
//! buttons, keys and commands to.

use daily_core::library::LibraryFilter;
use daily_core::model::{CommandId, CommandRecord, ProgressSummary, SearchEngine};
use url::Url;

use crate::error::ServiceError;
use crate::library_service::LibraryListing;
use crate::study_session::{DisplayCard, LoadOutcome, StudySession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserIntent {
    /// Skip to another command.
    Next,
    /// "I learned this" on the card on screen.
    Master,
    ToggleFavorite,
    Jump(CommandId),
    Search(String),
    Library {
        filter: LibraryFilter,
        query: String,
    },
    ToggleLearned(CommandId),
    ToggleFavoriteId(CommandId),
    /// Destructive; only honoured once the user confirmed.
    ResetLearned {
        confirmed: bool,
    },
    SetEngine(SearchEngine),
    WebSearch(String),
    Progress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    Loaded(LoadOutcome),
    Shown(DisplayCard),
    /// The intent needs a card on screen and there is none.
    NothingShown,
    Favorite { id: CommandId, is_favorite: bool },
    Learned { id: CommandId, is_learned: bool },
    SearchHits(Vec<CommandRecord>),
    Library(LibraryListing),
    ConfirmationRequired,
    Reset,
    EngineChanged(SearchEngine),
    Redirect(Url),
    Progress(ProgressSummary),
}

impl StudySession {
    /// Run one user intent against the session.
    ///
    /// # Errors
    ///
    /// Propagates `ServiceError` from the underlying operation; storage
    /// failures leave the session on its previous card.
    pub async fn dispatch(&mut self, intent: UserIntent) -> Result<IntentOutcome, ServiceError> {
        tracing::trace!(?intent, "dispatching intent");
        let outcome = match intent {
            UserIntent::Next => IntentOutcome::Loaded(self.load_next(true).await?),
            UserIntent::Master => match self.master_current().await? {
                Some(loaded) => IntentOutcome::Loaded(loaded),
                None => IntentOutcome::NothingShown,
            },
            UserIntent::ToggleFavorite => match self.favorite_current().await? {
                Some((id, is_favorite)) => IntentOutcome::Favorite { id, is_favorite },
                None => IntentOutcome::NothingShown,
            },
            UserIntent::Jump(id) => IntentOutcome::Shown(self.jump_to(id).await?),
            UserIntent::Search(query) => IntentOutcome::SearchHits(self.search(&query)),
            UserIntent::Library { filter, query } => {
                IntentOutcome::Library(self.library().list(filter, &query).await?)
            }
            UserIntent::ToggleLearned(id) => IntentOutcome::Learned {
                id,
                is_learned: self.tracker().toggle_learned(id).await?,
            },
            UserIntent::ToggleFavoriteId(id) => IntentOutcome::Favorite {
                id,
                is_favorite: self.tracker().toggle_favorite(id).await?,
            },
            UserIntent::ResetLearned { confirmed: false } => IntentOutcome::ConfirmationRequired,
            UserIntent::ResetLearned { confirmed: true } => {
                self.tracker().reset_learned().await?;
                IntentOutcome::Reset
            }
            UserIntent::SetEngine(engine) => {
                let settings = self.settings().set_engine(engine).await?;
                IntentOutcome::EngineChanged(settings.engine())
            }
            UserIntent::WebSearch(query) => {
                IntentOutcome::Redirect(self.settings().search_url(&query).await?)
            }
            UserIntent::Progress => IntentOutcome::Progress(self.progress_summary().await?),
        };
        Ok(outcome)
    }
}
