use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{Catalog, CommandRecord, ProgressState};

/// Which slice of the catalog the library shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LibraryFilter {
    #[default]
    All,
    Favorites,
    Learned,
}

impl LibraryFilter {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LibraryFilter::All => "all",
            LibraryFilter::Favorites => "fav",
            LibraryFilter::Learned => "learned",
        }
    }
}

impl fmt::Display for LibraryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown library filter {0:?} (expected all, fav or learned)")]
pub struct ParseFilterError(String);

impl FromStr for LibraryFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(LibraryFilter::All),
            "fav" | "favs" | "favorites" | "favorites-only" => Ok(LibraryFilter::Favorites),
            "learned" | "learned-only" => Ok(LibraryFilter::Learned),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// A catalog record annotated with the user's state for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry<'a> {
    pub record: &'a CommandRecord,
    pub is_learned: bool,
    pub is_favorite: bool,
}

/// List catalog records for the library view.
///
/// The filter is applied first, then a non-empty query narrows the result to
/// records whose command or description contains it, ignoring case. Catalog
/// order is preserved.
#[must_use]
pub fn list<'a>(
    catalog: &'a Catalog,
    progress: &ProgressState,
    filter: LibraryFilter,
    query: &str,
) -> Vec<LibraryEntry<'a>> {
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|record| match filter {
            LibraryFilter::All => true,
            LibraryFilter::Favorites => progress.is_favorite(record.id()),
            LibraryFilter::Learned => progress.is_learned(record.id()),
        })
        .filter(|record| needle.is_empty() || record.matches_lowercase(&needle))
        .map(|record| LibraryEntry {
            record,
            is_learned: progress.is_learned(record.id()),
            is_favorite: progress.is_favorite(record.id()),
        })
        .collect()
}

/// Search box on the main card: matches the whole catalog, nothing for an empty query.
#[must_use]
pub fn quick_search<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a CommandRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|record| record.matches_lowercase(&needle))
        .collect()
}
