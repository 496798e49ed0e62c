//! Orientation marks.
//!
//! A mark annotates one endpoint of a pair before a final arc is committed:
//! `mark(tail, head)` describes what is known about the `head` endpoint as
//! seen from `tail`. The table is explicit state threaded by `&mut` through
//! every orientation step — never ambient globals — so each step stays pure
//! with respect to its arguments.

use rustc_hash::FxHashMap;

use crate::engine::graph::NodeId;

/// Orientation knowledge about the head endpoint of an ordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mark {
    /// Undetermined.
    #[default]
    Circle,
    /// This endpoint is an arrowhead: the arc points into it.
    Arrowhead,
    /// This endpoint is forbidden as a head.
    Tail,
}

/// Ordered-pair-keyed mark table, defaulting to [`Mark::Circle`].
#[derive(Debug, Clone, Default)]
pub struct MarkTable {
    table: FxHashMap<(NodeId, NodeId), Mark>,
}

impl MarkTable {
    /// Creates an empty table (every pair reads as `Circle`).
    pub fn new() -> Self {
        Self::default()
    }

    /// The mark on the `head` endpoint of `(tail, head)`.
    pub fn get(&self, tail: NodeId, head: NodeId) -> Mark {
        self.table.get(&(tail, head)).copied().unwrap_or_default()
    }

    /// Sets the mark on the `head` endpoint of `(tail, head)`.
    pub fn set(&mut self, tail: NodeId, head: NodeId, mark: Mark) {
        self.table.insert((tail, head), mark);
    }

    /// Records a committed arc `tail -> head`: arrowhead at the head, tail
    /// mark blocking the reverse direction.
    pub fn commit_arc(&mut self, tail: NodeId, head: NodeId) {
        self.set(tail, head, Mark::Arrowhead);
        self.set(head, tail, Mark::Tail);
    }

    /// Whether orienting `tail -> head` is blocked by a tail mark.
    pub fn head_forbidden(&self, tail: NodeId, head: NodeId) -> bool {
        self.get(tail, head) == Mark::Tail
    }

    /// All explicitly marked ordered pairs, ascending.
    pub fn entries(&self) -> Vec<(NodeId, NodeId, Mark)> {
        let mut out: Vec<(NodeId, NodeId, Mark)> = self
            .table
            .iter()
            .map(|(&(t, h), &m)| (t, h, m))
            .collect();
        out.sort_unstable_by_key(|&(t, h, _)| (t, h));
        out
    }
}
