mod command;
mod explanation;
mod ids;
mod progress;
mod settings;

pub use command::{Catalog, CatalogError, CommandRecord};
pub use explanation::{ExplanationItem, parse_explanation};
pub use ids::{CommandId, ParseIdError};
pub use progress::{IdSet, ProgressState, ProgressSummary};
pub use settings::{DEFAULT_DAILY_LIMIT, SearchEngine, Settings, SettingsDraft, SettingsError};
