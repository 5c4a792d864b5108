//! Optional config file at `<config dir>/linux-daily/config.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// SQLite URL or path for the progress store.
    pub database_url: Option<String>,

    /// Catalog JSON to use instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("linux-daily").join("config.toml"))
}

/// Default database location under the user's data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("linux-daily"))
        .unwrap_or_default()
        .join("linux-daily.sqlite3")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn parses_known_fields() {
        let config = Config::from_toml_str(
            r#"
            database_url = "sqlite:///tmp/daily.sqlite3"
            catalog_path = "/opt/daily/commands.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite:///tmp/daily.sqlite3"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/opt/daily/commands.json")));
    }

    #[test]
    fn bad_file_falls_back_to_default() {
        let path = std::env::temp_dir().join(format!("linux-daily-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "database_url = [").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_default() {
        let path = Path::new("/definitely/not/here/config.toml");
        assert_eq!(Config::load_from(path), Config::default());
    }
}
