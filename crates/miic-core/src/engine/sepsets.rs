//! Separating-set table.
//!
//! Maps each removed pair to the ordered conditioning sequence that justified
//! its removal. Populated monotonically by the skeleton learner, then read by
//! the orientation engine to recover which variables separated each pair.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::engine::graph::{unordered, NodeId};

/// Conditioning sets are usually small; keep them inline.
pub type CondSet = SmallVec<[NodeId; 4]>;

/// Unordered-pair-keyed table of separating sets.
#[derive(Debug, Clone, Default)]
pub struct SeparationSets {
    table: FxHashMap<(NodeId, NodeId), CondSet>,
}

impl SeparationSets {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the separating set for `{x, y}`, keeping insertion order of
    /// the conditioning nodes. A later record for the same pair overwrites.
    pub fn record(&mut self, x: NodeId, y: NodeId, set: CondSet) {
        self.table.insert(unordered(x, y), set);
    }

    /// The separating set recorded for `{x, y}`, if the pair was cut.
    pub fn get(&self, x: NodeId, y: NodeId) -> Option<&CondSet> {
        self.table.get(&unordered(x, y))
    }

    /// Whether `z` is part of the recorded separator of `{x, y}`.
    pub fn contains(&self, x: NodeId, y: NodeId, z: NodeId) -> bool {
        self.get(x, y).is_some_and(|s| s.contains(&z))
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no pair has been recorded.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
