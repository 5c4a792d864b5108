use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::CommandId;

/// One learnable command as published in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    id: CommandId,
    command: String,
    description: String,
    #[serde(default)]
    example: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    explanation: String,
}

impl CommandRecord {
    #[must_use]
    pub fn new(
        id: CommandId,
        command: impl Into<String>,
        description: impl Into<String>,
        example: impl Into<String>,
        category: impl Into<String>,
        difficulty: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            command: command.into(),
            description: description.into(),
            example: example.into(),
            category: category.into(),
            difficulty: difficulty.into(),
            explanation: explanation.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn example(&self) -> &str {
        &self.example
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Case-insensitive substring match against the command text or its description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.command.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read catalog at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not a valid command list")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains duplicate command id {0}")]
    DuplicateId(CommandId),
}

/// The fixed, ordered list of commands loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<CommandRecord>,
    index: HashMap<CommandId, usize>,
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two records share an id.
    pub fn new(records: Vec<CommandRecord>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.id(), pos).is_some() {
                return Err(CatalogError::DuplicateId(record.id()));
            }
        }
        Ok(Self { records, index })
    }

    /// Parse a catalog from its JSON representation (an array of records).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and
    /// `CatalogError::DuplicateId` for repeated ids.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let records: Vec<CommandRecord> = serde_json::from_str(raw)?;
        Self::new(records)
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise the
    /// same errors as [`Catalog::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    #[must_use]
    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: CommandId) -> Option<&CommandRecord> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    #[must_use]
    pub fn contains(&self, id: CommandId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_keeps_order_and_defaults_optional_fields() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": 3, "command": "ls -la", "description": "List all files"},
                {"id": 1, "command": "grep -r", "description": "Search recursively",
                 "example": "grep -r TODO src", "category": "Text", "difficulty": "Beginner",
                 "explanation": "-r: recurse"}
            ]"#,
        )
        .unwrap();

        let ids: Vec<u64> = catalog.iter().map(|r| r.id().value()).collect();
        assert_eq!(ids, vec![3, 1]);
        let ls = catalog.get(CommandId::new(3)).unwrap();
        assert_eq!(ls.example(), "");
        assert_eq!(ls.category(), "");
        assert_eq!(
            catalog.get(CommandId::new(1)).unwrap().example(),
            "grep -r TODO src"
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Catalog::from_json(
            r#"[{"id": 1, "command": "a", "description": "x"},
                {"id": 1, "command": "b", "description": "y"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == CommandId::new(1)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn empty_list_is_a_valid_catalog() {
        let catalog = Catalog::from_json("[]").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::from_path("/definitely/not/here/commands.json").unwrap_err();
        assert!(err.to_string().contains("commands.json"));
    }

    #[test]
    fn causes_are_chained_not_repeated() {
        use std::error::Error as _;

        let err = Catalog::from_path("/definitely/not/here/commands.json").unwrap_err();
        let source = err.source().expect("io cause").to_string();
        assert!(!err.to_string().contains(&source));

        let err = Catalog::from_json("{not json").unwrap_err();
        let source = err.source().expect("parse cause").to_string();
        assert!(!err.to_string().contains(&source));
    }

    #[test]
    fn match_is_case_insensitive_over_command_and_description() {
        let record = CommandRecord::new(
            CommandId::new(1),
            "find . -name",
            "Locate files with GREP-like patterns",
            "",
            "",
            "",
            "",
        );
        assert!(record.matches_lowercase("grep"));
        assert!(record.matches_lowercase("find"));
        assert!(!record.matches_lowercase("awk"));
    }
}
