//! Independence-oracle adapter.
//!
//! The scoring semantics (chi-square, BIC, corrected mutual information, ...)
//! live outside this crate; the engine only consumes signed scores through
//! [`InformationOracle`]. Positive means "dependent", non-positive means
//! "independent enough to cut". Oracle failures propagate verbatim — the
//! engine never retries or swallows them.

use rustc_hash::FxHashMap;

use crate::engine::errors::LearnError;
use crate::engine::graph::{unordered, NodeId};

/// Scores conditional mutual information between variables.
///
/// Implementations must be referentially stable within one run: the same
/// arguments must yield the same score. The engine makes no assumption about
/// call cost; this is the only boundary across which it may block.
pub trait InformationOracle {
    /// Corrected two-point information `I(x, y | cond)`.
    fn pair_info(&self, x: NodeId, y: NodeId, cond: &[NodeId]) -> Result<f64, LearnError>;

    /// Corrected three-point information `I(x, y, z | cond)`.
    fn triple_info(
        &self,
        x: NodeId,
        y: NodeId,
        z: NodeId,
        cond: &[NodeId],
    ) -> Result<f64, LearnError>;
}

/// Map-backed oracle, primarily for tests and replaying precomputed scores.
///
/// Keys are canonicalized: `{x, y}` is unordered, `z` is separate, and the
/// conditioning set is sorted, so the insertion order of arguments does not
/// matter. Missing entries fall back to `default_score` (0.0 unless
/// overridden), which reads as "independent".
#[derive(Debug, Clone)]
pub struct TableOracle {
    pair: FxHashMap<(NodeId, NodeId, Vec<NodeId>), f64>,
    triple: FxHashMap<(NodeId, NodeId, NodeId, Vec<NodeId>), f64>,
    default_score: f64,
}

impl Default for TableOracle {
    fn default() -> Self {
        Self {
            pair: FxHashMap::default(),
            triple: FxHashMap::default(),
            default_score: 0.0,
        }
    }
}

impl TableOracle {
    /// Creates an empty table with default score 0.0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the score returned for entries absent from the table.
    pub fn with_default(mut self, score: f64) -> Self {
        self.default_score = score;
        self
    }

    /// Records `I(x, y | cond) = score`.
    pub fn set_pair(&mut self, x: NodeId, y: NodeId, cond: &[NodeId], score: f64) {
        self.pair.insert(Self::pair_key(x, y, cond), score);
    }

    /// Records `I(x, y, z | cond) = score`. The `{x, y}` pair is unordered;
    /// `z` is positional.
    pub fn set_triple(&mut self, x: NodeId, y: NodeId, z: NodeId, cond: &[NodeId], score: f64) {
        self.triple.insert(Self::triple_key(x, y, z, cond), score);
    }

    fn pair_key(x: NodeId, y: NodeId, cond: &[NodeId]) -> (NodeId, NodeId, Vec<NodeId>) {
        let (a, b) = unordered(x, y);
        let mut c = cond.to_vec();
        c.sort_unstable();
        (a, b, c)
    }

    fn triple_key(
        x: NodeId,
        y: NodeId,
        z: NodeId,
        cond: &[NodeId],
    ) -> (NodeId, NodeId, NodeId, Vec<NodeId>) {
        let (a, b) = unordered(x, y);
        let mut c = cond.to_vec();
        c.sort_unstable();
        (a, b, z, c)
    }
}

impl InformationOracle for TableOracle {
    fn pair_info(&self, x: NodeId, y: NodeId, cond: &[NodeId]) -> Result<f64, LearnError> {
        Ok(self
            .pair
            .get(&Self::pair_key(x, y, cond))
            .copied()
            .unwrap_or(self.default_score))
    }

    fn triple_info(
        &self,
        x: NodeId,
        y: NodeId,
        z: NodeId,
        cond: &[NodeId],
    ) -> Result<f64, LearnError> {
        Ok(self
            .triple
            .get(&Self::triple_key(x, y, z, cond))
            .copied()
            .unwrap_or(self.default_score))
    }
}
