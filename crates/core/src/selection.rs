//! Picks the next command to present.
//!
//! Selection is uniform over the commands the user has not learned yet. The
//! random source is a capability so callers (and tests) decide how indices
//! are drawn.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{Catalog, CommandId, CommandRecord, IdSet};

/// Source of uniformly distributed indices.
pub trait RandomSource: Send {
    /// Return an index in `0..len`. Callers never pass `len == 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Draws from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Reproducible generator for tests and demos.
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Result of asking for the next command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Next(&'a CommandRecord),
    /// Every catalog command is learned.
    Exhausted,
    /// The catalog has no commands at all.
    NoData,
}

/// Choose the next command to show.
///
/// With `force_advance` the command in `current` is skipped whenever another
/// unlearned command exists. When it is the only one left it may repeat.
pub fn select_next<'a, R>(
    catalog: &'a Catalog,
    learned: &IdSet,
    current: Option<CommandId>,
    force_advance: bool,
    rng: &mut R,
) -> Selection<'a>
where
    R: RandomSource + ?Sized,
{
    if catalog.is_empty() {
        return Selection::NoData;
    }

    let unlearned: Vec<&CommandRecord> = catalog
        .iter()
        .filter(|record| !learned.contains(record.id()))
        .collect();

    if unlearned.is_empty() {
        return Selection::Exhausted;
    }

    let candidates = match current {
        Some(current) if force_advance && unlearned.len() > 1 => {
            let others: Vec<&CommandRecord> = unlearned
                .iter()
                .copied()
                .filter(|record| record.id() != current)
                .collect();
            if others.is_empty() { unlearned } else { others }
        }
        _ => unlearned,
    };

    Selection::Next(candidates[rng.pick_index(candidates.len())])
}

/// Pick any catalog command for review once everything is learned.
pub fn pick_review<'a, R>(catalog: &'a Catalog, rng: &mut R) -> Option<&'a CommandRecord>
where
    R: RandomSource + ?Sized,
{
    if catalog.is_empty() {
        return None;
    }
    catalog.records().get(rng.pick_index(catalog.len()))
}
