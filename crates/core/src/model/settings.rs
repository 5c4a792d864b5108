use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Web search provider used for the search redirect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Bing,
    Google,
    Baidu,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 3] = [SearchEngine::Bing, SearchEngine::Google, SearchEngine::Baidu];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchEngine::Bing => "bing",
            SearchEngine::Google => "google",
            SearchEngine::Baidu => "baidu",
        }
    }

    /// Form action the query is submitted to.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            SearchEngine::Bing => "https://www.bing.com/search",
            SearchEngine::Google => "https://www.google.com/search",
            SearchEngine::Baidu => "https://www.baidu.com/s",
        }
    }

    /// Name of the query parameter the provider expects.
    #[must_use]
    pub fn query_param(self) -> &'static str {
        match self {
            SearchEngine::Baidu => "wd",
            SearchEngine::Bing | SearchEngine::Google => "q",
        }
    }

    /// Build the redirect URL for a user-entered query.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidSearchUrl` if the URL cannot be built.
    pub fn search_url(self, query: &str) -> Result<Url, SettingsError> {
        Url::parse_with_params(self.endpoint(), &[(self.query_param(), query.trim())])
            .map_err(|_| SettingsError::InvalidSearchUrl)
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchEngine {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        SearchEngine::ALL
            .into_iter()
            .find(|engine| engine.as_str() == needle)
            .ok_or_else(|| SettingsError::UnknownEngine(s.trim().to_string()))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("unknown search engine {0:?} (expected bing, google or baidu)")]
    UnknownEngine(String),
    #[error("daily limit must be at least 1")]
    InvalidDailyLimit,
    #[error("invalid search URL")]
    InvalidSearchUrl,
}

pub const DEFAULT_DAILY_LIMIT: u32 = 5;

/// User preferences persisted under the `settings` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    engine: SearchEngine,
    daily_limit: u32,
    show_on_startup: bool,
}

#[derive(Clone, Debug, Default)]
pub struct SettingsDraft {
    pub engine: Option<SearchEngine>,
    pub daily_limit: Option<u32>,
    pub show_on_startup: Option<bool>,
}

impl SettingsDraft {
    /// Start a draft from existing settings so unspecified fields are kept.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            engine: Some(settings.engine),
            daily_limit: Some(settings.daily_limit),
            show_on_startup: Some(settings.show_on_startup),
        }
    }

    /// Validate the draft, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidDailyLimit` for a zero daily limit.
    pub fn validate(self) -> Result<Settings, SettingsError> {
        let defaults = Settings::default();
        let daily_limit = self.daily_limit.unwrap_or(defaults.daily_limit);
        if daily_limit == 0 {
            return Err(SettingsError::InvalidDailyLimit);
        }
        Ok(Settings {
            engine: self.engine.unwrap_or(defaults.engine),
            daily_limit,
            show_on_startup: self.show_on_startup.unwrap_or(defaults.show_on_startup),
        })
    }
}

impl Settings {
    #[must_use]
    pub fn engine(&self) -> SearchEngine {
        self.engine
    }

    #[must_use]
    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    #[must_use]
    pub fn show_on_startup(&self) -> bool {
        self.show_on_startup
    }

    #[must_use]
    pub fn with_engine(mut self, engine: SearchEngine) -> Self {
        self.engine = engine;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: SearchEngine::Bing,
            daily_limit: DEFAULT_DAILY_LIMIT,
            show_on_startup: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engine_is_bing() {
        assert_eq!(Settings::default().engine(), SearchEngine::Bing);
    }

    #[test]
    fn engine_parses_case_insensitively() {
        assert_eq!("Google".parse::<SearchEngine>().unwrap(), SearchEngine::Google);
        assert_eq!(" baidu ".parse::<SearchEngine>().unwrap(), SearchEngine::Baidu);
        assert!(matches!(
            "duckduckgo".parse::<SearchEngine>(),
            Err(SettingsError::UnknownEngine(name)) if name == "duckduckgo"
        ));
    }

    #[test]
    fn search_url_uses_provider_parameter() {
        let bing = SearchEngine::Bing.search_url("tar xzf").unwrap();
        assert_eq!(bing.as_str(), "https://www.bing.com/search?q=tar+xzf");

        let baidu = SearchEngine::Baidu.search_url("chmod 755").unwrap();
        assert_eq!(baidu.host_str(), Some("www.baidu.com"));
        assert_eq!(
            baidu.query_pairs().next().map(|(k, v)| (k.into_owned(), v.into_owned())),
            Some(("wd".to_string(), "chmod 755".to_string()))
        );
    }

    #[test]
    fn decoding_tolerates_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"engine":"google"}"#).unwrap();
        assert_eq!(settings.engine(), SearchEngine::Google);
        assert_eq!(settings.daily_limit(), DEFAULT_DAILY_LIMIT);
        assert!(settings.show_on_startup());
    }

    #[test]
    fn draft_rejects_zero_daily_limit() {
        let draft = SettingsDraft {
            daily_limit: Some(0),
            ..SettingsDraft::default()
        };
        assert_eq!(draft.validate(), Err(SettingsError::InvalidDailyLimit));
    }

    #[test]
    fn draft_keeps_existing_fields() {
        let current = Settings::default().with_engine(SearchEngine::Baidu);
        let mut draft = SettingsDraft::from_settings(&current);
        draft.daily_limit = Some(10);
        let updated = draft.validate().unwrap();
        assert_eq!(updated.engine(), SearchEngine::Baidu);
        assert_eq!(updated.daily_limit(), 10);
    }
}
