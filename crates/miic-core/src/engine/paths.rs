//! Directed-path queries used for cycle avoidance.
//!
//! Both queries walk the *parents* relation with an explicit queue (no
//! recursion, so stack depth stays bounded on dense graphs). Arcs whose
//! reverse arc also exists — a currently-bidirected latent pair — are treated
//! as not yet decided and are skipped.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::engine::graph::{MixedGraph, NodeId};

/// Whether a directed path `from -> ... -> to` exists.
///
/// The search starts at `to` and follows single-directed arcs backwards
/// through parents until `from` is reached. `from == to` is trivially true
/// (zero-length path).
pub fn exists_directed_path(graph: &MixedGraph, from: NodeId, to: NodeId) -> bool {
    if from == to {
        return true;
    }
    walk_parents(graph, from, to, false)
}

/// Whether a directed path `from -> ... -> to` of length at least two exists.
///
/// Identical to [`exists_directed_path`] except the direct one-hop arc
/// `from -> to` is ignored, which distinguishes "committing `to -> from`
/// would close a genuine cycle" from "it would merely restate the edge being
/// oriented".
pub fn exists_nontrivial_directed_path(graph: &MixedGraph, from: NodeId, to: NodeId) -> bool {
    walk_parents(graph, from, to, true)
}

fn walk_parents(graph: &MixedGraph, from: NodeId, to: NodeId, skip_direct: bool) -> bool {
    let mut seen: FxHashSet<NodeId> = FxHashSet::default();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    seen.insert(to);
    queue.push_back(to);

    while let Some(current) = queue.pop_front() {
        for parent in graph.parents(current) {
            // Bidirected pairs are undecided, not traversable.
            if graph.has_arc(current, parent) {
                continue;
            }
            if skip_direct && current == to && parent == from {
                continue;
            }
            if parent == from {
                return true;
            }
            if seen.insert(parent) {
                queue.push_back(parent);
            }
        }
    }
    false
}
