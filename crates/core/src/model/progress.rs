use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::{Catalog, CommandId, Settings};

/// Set of command ids with O(1) membership.
///
/// Persists as a sorted JSON array of integers; duplicates in stored data
/// collapse on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet(HashSet<CommandId>);

impl IdSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: CommandId) -> bool {
        self.0.contains(&id)
    }

    /// Returns `true` if the id was newly added.
    pub fn insert(&mut self, id: CommandId) -> bool {
        self.0.insert(id)
    }

    /// Returns `true` if the id was present.
    pub fn remove(&mut self, id: CommandId) -> bool {
        self.0.remove(&id)
    }

    /// Flip membership and return the new state.
    pub fn toggle(&mut self, id: CommandId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ids in ascending order.
    #[must_use]
    pub fn sorted(&self) -> Vec<CommandId> {
        let mut ids: Vec<CommandId> = self.0.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = CommandId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CommandId> for IdSet {
    fn from_iter<T: IntoIterator<Item = CommandId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for IdSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sorted().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IdSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<CommandId>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

/// Snapshot of everything the progress store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub learned: IdSet,
    pub favorites: IdSet,
    pub settings: Settings,
}

impl ProgressState {
    #[must_use]
    pub fn is_learned(&self, id: CommandId) -> bool {
        self.learned.contains(id)
    }

    #[must_use]
    pub fn is_favorite(&self, id: CommandId) -> bool {
        self.favorites.contains(id)
    }
}

/// Learned-versus-total counts shown under the main card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub learned_count: usize,
    pub total_count: usize,
    pub percentage: u8,
}

impl ProgressSummary {
    /// `percentage` is `floor(learned / total * 100)` and `0` for an empty total.
    #[must_use]
    pub fn new(learned_count: usize, total_count: usize) -> Self {
        let percentage = if total_count == 0 {
            0
        } else {
            let pct = learned_count.min(total_count) * 100 / total_count;
            u8::try_from(pct).unwrap_or(100)
        };
        Self {
            learned_count,
            total_count,
            percentage,
        }
    }

    /// Summary counting only learned ids that exist in the catalog.
    #[must_use]
    pub fn for_catalog(catalog: &Catalog, learned: &IdSet) -> Self {
        let learned_count = catalog.iter().filter(|r| learned.contains(r.id())).count();
        Self::new(learned_count, catalog.len())
    }

    /// Every command of a non-empty catalog is learned; cards are shown for review.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_count > 0 && self.learned_count >= self.total_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommandRecord;

    fn ids(values: &[u64]) -> IdSet {
        values.iter().copied().map(CommandId::new).collect()
    }

    #[test]
    fn complete_only_when_everything_is_learned() {
        assert!(ProgressSummary::new(2, 2).is_complete());
        assert!(!ProgressSummary::new(1, 2).is_complete());
        assert!(!ProgressSummary::new(0, 0).is_complete());
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut set = ids(&[1, 2]);
        let before = set.clone();
        assert!(set.toggle(CommandId::new(3)));
        assert!(!set.toggle(CommandId::new(3)));
        assert_eq!(set, before);
    }

    #[test]
    fn serializes_sorted_and_collapses_duplicates() {
        let set = ids(&[9, 2, 5]);
        assert_eq!(serde_json::to_string(&set).unwrap(), "[2,5,9]");

        let loaded: IdSet = serde_json::from_str("[4,4,1]").unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains(CommandId::new(4)));
    }

    #[test]
    fn summary_floors_percentage() {
        let summary = ProgressSummary::new(3, 5);
        assert_eq!(summary.percentage, 60);
        assert_eq!(ProgressSummary::new(1, 3).percentage, 33);
        assert_eq!(ProgressSummary::new(5, 5).percentage, 100);
    }

    #[test]
    fn summary_with_empty_total_is_zero() {
        let summary = ProgressSummary::new(0, 0);
        assert_eq!(summary.percentage, 0);
        assert_eq!(summary.total_count, 0);
    }

    #[test]
    fn catalog_summary_ignores_unknown_learned_ids() {
        let catalog = Catalog::new(
            (1..=4)
                .map(|id| CommandRecord::new(CommandId::new(id), "c", "d", "", "", "", ""))
                .collect(),
        )
        .unwrap();
        let summary = ProgressSummary::for_catalog(&catalog, &ids(&[1, 2, 99]));
        assert_eq!(summary.learned_count, 2);
        assert_eq!(summary.percentage, 50);
    }
}
