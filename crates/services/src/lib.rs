#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod intent;
pub mod library_service;
pub mod mastery;
pub mod settings_service;
pub mod study_session;

pub use app_services::AppServices;
pub use error::{AppServicesError, ServiceError};
pub use intent::{IntentOutcome, UserIntent};
pub use library_service::{LibraryListing, LibraryRow, LibraryService};
pub use mastery::MasteryTracker;
pub use settings_service::SettingsService;
pub use study_session::{DisplayCard, LoadOutcome, StudySession};
