//! Prior structural knowledge supplied once before a run.
//!
//! Mandatory arcs are committed before any statistical step; forbidden arcs
//! block a direction (and delete the edge outright when both directions are
//! forbidden); in-degree bounds silently veto commits at orientation time;
//! mark seeds pre-load the orientation mark table.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine::errors::LearnError;
use crate::engine::graph::{MixedGraph, NodeId};
use crate::engine::marks::Mark;

/// Structural constraints for one learning run.
#[derive(Debug, Clone, Default)]
pub struct PriorKnowledge {
    mandatory: FxHashSet<(NodeId, NodeId)>,
    forbidden: FxHashSet<(NodeId, NodeId)>,
    in_degree_bounds: FxHashMap<NodeId, usize>,
    global_in_degree_bound: Option<usize>,
    mark_seeds: Vec<(NodeId, NodeId, Mark)>,
}

impl PriorKnowledge {
    /// Creates an empty (unconstrained) prior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the arc `tail -> head` in the learned graph.
    pub fn add_mandatory_arc(&mut self, tail: NodeId, head: NodeId) {
        self.mandatory.insert((tail, head));
    }

    /// Forbids the arc `tail -> head`. Forbidding both directions of a pair
    /// forbids the edge itself.
    pub fn add_forbidden_arc(&mut self, tail: NodeId, head: NodeId) {
        self.forbidden.insert((tail, head));
    }

    /// Caps the number of parents any node may acquire.
    pub fn set_global_in_degree_bound(&mut self, bound: usize) {
        self.global_in_degree_bound = Some(bound);
    }

    /// Caps the number of parents of one node, overriding the global bound.
    pub fn set_in_degree_bound(&mut self, node: NodeId, bound: usize) {
        self.in_degree_bounds.insert(node, bound);
    }

    /// Seeds an orientation mark before any statistical orientation.
    pub fn add_mark_seed(&mut self, tail: NodeId, head: NodeId, mark: Mark) {
        self.mark_seeds.push((tail, head, mark));
    }

    /// Whether the arc `tail -> head` is required.
    pub fn is_mandatory_arc(&self, tail: NodeId, head: NodeId) -> bool {
        self.mandatory.contains(&(tail, head))
    }

    /// Whether the arc `tail -> head` is forbidden.
    pub fn is_forbidden_arc(&self, tail: NodeId, head: NodeId) -> bool {
        self.forbidden.contains(&(tail, head))
    }

    /// Whether the edge `{x, y}` is forbidden (both directions forbidden).
    pub fn is_forbidden_edge(&self, x: NodeId, y: NodeId) -> bool {
        self.is_forbidden_arc(x, y) && self.is_forbidden_arc(y, x)
    }

    /// The in-degree bound applying to `node`, if any.
    pub fn in_degree_bound(&self, node: NodeId) -> Option<usize> {
        self.in_degree_bounds
            .get(&node)
            .copied()
            .or(self.global_in_degree_bound)
    }

    /// Whether adding one more parent to `head` would exceed its bound.
    pub fn would_exceed_in_degree(&self, graph: &MixedGraph, head: NodeId) -> bool {
        self.in_degree_bound(head)
            .is_some_and(|bound| graph.in_degree(head) >= bound)
    }

    /// All mandatory arcs, ascending.
    pub fn mandatory_arcs(&self) -> Vec<(NodeId, NodeId)> {
        let mut out: Vec<(NodeId, NodeId)> = self.mandatory.iter().copied().collect();
        out.sort_unstable();
        out
    }

    /// All forbidden arcs, ascending.
    pub fn forbidden_arcs(&self) -> Vec<(NodeId, NodeId)> {
        let mut out: Vec<(NodeId, NodeId)> = self.forbidden.iter().copied().collect();
        out.sort_unstable();
        out
    }

    /// Mark seeds in insertion order.
    pub fn mark_seeds(&self) -> &[(NodeId, NodeId, Mark)] {
        &self.mark_seeds
    }

    /// Rejects contradictory priors.
    pub fn validate(&self) -> Result<(), LearnError> {
        for &(tail, head) in &self.mandatory {
            if self.mandatory.contains(&(head, tail)) {
                return Err(LearnError::Constraint(format!(
                    "arcs {:?} -> {:?} and {:?} -> {:?} cannot both be mandatory",
                    tail, head, head, tail
                )));
            }
            if self.forbidden.contains(&(tail, head)) {
                return Err(LearnError::Constraint(format!(
                    "arc {:?} -> {:?} is both mandatory and forbidden",
                    tail, head
                )));
            }
            if self.in_degree_bound(head) == Some(0) {
                return Err(LearnError::Constraint(format!(
                    "mandatory arc into {:?} conflicts with its in-degree bound of 0",
                    head
                )));
            }
        }
        Ok(())
    }
}
