//! Shared error types for the services crate.

use thiserror::Error;

use daily_core::model::{CatalogError, CommandId, SettingsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the study services.
///
/// `StorageUnavailable` is recoverable: callers report it and keep the view
/// running with its previous state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("progress storage is unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
    #[error("command catalog could not be loaded: {0}")]
    CatalogLoadFailure(#[from] CatalogError),
    #[error("command {0} is not in the catalog")]
    CommandNotFound(CommandId),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("command catalog could not be loaded: {0}")]
    Catalog(#[from] CatalogError),
}
