//! Vote tally and winner determination

use super::delegate::{Delegate, DelegateId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Votes received per delegate, recomputed from the cast ballots
///
/// # Example
///
/// ```
/// use arena_domain::{DelegateId, VoteTally};
///
/// let d1 = DelegateId::new(1).unwrap();
/// let d2 = DelegateId::new(2).unwrap();
///
/// let tally = VoteTally::from_targets([d1, d1, d2]);
/// assert_eq!(tally.winner(), Some(d1));
///
/// let tied = VoteTally::from_targets([d1, d2]);
/// assert_eq!(tied.winner(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VoteTally {
    counts: BTreeMap<DelegateId, usize>,
}

impl VoteTally {
    /// Tally the ballots of a roster; ballots naming nobody are not counted
    pub fn from_delegates<'a>(delegates: impl IntoIterator<Item = &'a Delegate>) -> Self {
        Self::from_targets(delegates.into_iter().filter_map(|d| d.voted_for()))
    }

    pub fn from_targets(targets: impl IntoIterator<Item = DelegateId>) -> Self {
        let mut counts = BTreeMap::new();
        for target in targets {
            *counts.entry(target).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn votes_for(&self, delegate: DelegateId) -> usize {
        self.counts.get(&delegate).copied().unwrap_or(0)
    }

    /// Total number of counted votes
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DelegateId, usize)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }

    /// The unique delegate with the strictly highest count
    ///
    /// Returns `None` when nobody voted or the maximum is shared.
    pub fn winner(&self) -> Option<DelegateId> {
        let max = *self.counts.values().max()?;
        let mut leaders = self.counts.iter().filter(|(_, count)| **count == max);
        let (leader, _) = leaders.next()?;
        if leaders.next().is_some() {
            None
        } else {
            Some(*leader)
        }
    }

    /// Delegates sharing the top count (more than one means a tie)
    pub fn leaders(&self) -> Vec<DelegateId> {
        let Some(max) = self.counts.values().max().copied() else {
            return Vec::new();
        };
        self.counts
            .iter()
            .filter(|(_, count)| **count == max)
            .map(|(id, _)| *id)
            .collect()
    }
}
