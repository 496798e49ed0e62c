//! Shared orientation mechanics.
//!
//! Both orientation strategies (rule-based 3off2 and probabilistic MIIC)
//! run over the same substrate: constraint seeding of the mark table,
//! unshielded-triple collection against the separating-set table, the
//! cycle-safe arc commit, and latent-couple bookkeeping with a final
//! resolution pass. All state is threaded explicitly by `&mut`; nothing is
//! ambient.

use rustc_hash::FxHashMap;

use crate::engine::constraints::PriorKnowledge;
use crate::engine::errors::LearnError;
use crate::engine::graph::{MixedGraph, NodeId};
use crate::engine::marks::{Mark, MarkTable};
use crate::engine::oracle::InformationOracle;
use crate::engine::paths::{exists_directed_path, exists_nontrivial_directed_path};
use crate::engine::sepsets::{CondSet, SeparationSets};

/// Mutable orientation state shared by both strategies.
#[derive(Debug, Clone, Default)]
pub struct OrientationState {
    /// Per-ordered-pair orientation knowledge.
    pub marks: MarkTable,
    /// Arcs whose pair was found to require both directions, in discovery
    /// order. Resolved at the end of the orientation phase.
    pub latent_couples: Vec<(NodeId, NodeId)>,
    /// Posterior confidence per committed arc (probabilistic strategy only).
    pub arc_probabilities: FxHashMap<(NodeId, NodeId), f64>,
}

/// Counters describing one orientation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrientationDiagnostics {
    /// Unshielded triples collected and scored.
    pub triples_examined: usize,
    /// Arcs committed (including forced latent-couple directions).
    pub commits: usize,
    /// Latent couples recorded before resolution.
    pub latent_couples: usize,
}

/// An unshielded triple `x - z - y` with its three-point score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnshieldedTriple {
    pub x: NodeId,
    pub z: NodeId,
    pub y: NodeId,
    /// `I(x, y, z | sepset(x, y) \ {z})`.
    pub info: f64,
    /// Whether `z` appears in the recorded separator of `{x, y}`.
    pub z_in_sepset: bool,
}

/// Outcome of one cycle-safe commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The arc `tail -> head` was committed.
    Committed { tail: NodeId, head: NodeId },
    /// A direction was forced and the pair recorded as a latent couple.
    Latent { tail: NodeId, head: NodeId },
    /// Nothing changed (already oriented, or every direction inadmissible).
    Skipped,
}

impl Commit {
    /// Whether the graph changed.
    pub fn changed(&self) -> bool {
        !matches!(self, Commit::Skipped)
    }
}

/// Seeds marks and commits prior constraints before any statistical step.
///
/// Mandatory arcs are committed immediately (replacing the edge, erasing an
/// opposing arc, blocking reversal through the mark table). A single
/// forbidden direction over a surviving edge forces the opposite arc,
/// cycle-safely.
pub fn seed_from_prior(
    graph: &mut MixedGraph,
    prior: &PriorKnowledge,
    state: &mut OrientationState,
) -> Result<(), LearnError> {
    prior.validate()?;

    for &(tail, head, mark) in prior.mark_seeds() {
        state.marks.set(tail, head, mark);
    }

    for (tail, head) in prior.mandatory_arcs() {
        graph.erase_arc(head, tail);
        graph.add_arc(tail, head);
        state.marks.commit_arc(tail, head);
    }

    for (tail, head) in prior.forbidden_arcs() {
        if prior.is_forbidden_edge(tail, head) {
            continue; // pruned during initiation
        }
        state.marks.set(tail, head, Mark::Tail);
        if graph.has_edge(tail, head) {
            cycle_safe_commit(graph, prior, state, head, tail);
        }
    }
    Ok(())
}

/// Collects and scores every unshielded triple of the current graph.
///
/// For each node `z`, each pair of its adjacents `y < x` with no relation
/// between `x` and `y` forms a triple; its score conditions on the recorded
/// separator of `{x, y}` minus `z`. Collection order (ascending `z`, then
/// ascending pair) is deterministic.
pub fn collect_unshielded_triples<O: InformationOracle>(
    graph: &MixedGraph,
    sepsets: &SeparationSets,
    oracle: &O,
) -> Result<Vec<UnshieldedTriple>, LearnError> {
    let mut triples = Vec::new();
    for z in graph.nodes() {
        let adjacent = graph.adjacents(z);
        for (i, &y) in adjacent.iter().enumerate() {
            for &x in &adjacent[i + 1..] {
                if graph.adjacent(x, y) {
                    continue;
                }
                let z_in_sepset = sepsets.contains(x, y, z);
                let cond: CondSet = sepsets
                    .get(x, y)
                    .map(|s| s.iter().copied().filter(|&c| c != z).collect())
                    .unwrap_or_default();
                let info = oracle.triple_info(x, y, z, &cond)?;
                triples.push(UnshieldedTriple {
                    x,
                    z,
                    y,
                    info,
                    z_in_sepset,
                });
            }
        }
    }
    Ok(triples)
}

/// Attempts to orient the pair `{a, b}` as `a -> b` without closing a cycle.
///
/// A direction is admissible when no tail mark, forbidden arc, or in-degree
/// bound blocks its head. If the admissible forward direction would close a
/// cycle, the reverse is tried under the mirrored checks; if every admissible
/// direction closes a cycle, the first one is forced and the pair recorded
/// as a latent couple. Constraint violations skip the commit silently.
pub fn cycle_safe_commit(
    graph: &mut MixedGraph,
    prior: &PriorKnowledge,
    state: &mut OrientationState,
    a: NodeId,
    b: NodeId,
) -> Commit {
    if graph.has_arc(a, b) {
        return Commit::Skipped;
    }
    if graph.has_arc(b, a) {
        // Anti-parallel arc already present: both directions are now
        // justified. Record the latent couple instead of re-orienting.
        if admissible(graph, prior, state, a, b) {
            graph.add_arc(a, b);
            state.marks.set(a, b, Mark::Arrowhead);
            state.marks.set(b, a, Mark::Arrowhead);
            state.latent_couples.push((a, b));
            return Commit::Latent { tail: a, head: b };
        }
        return Commit::Skipped;
    }

    // Constraint violations skip; the reverse direction is an answer to a
    // cycle, not to a constraint.
    if !admissible(graph, prior, state, a, b) {
        return Commit::Skipped;
    }
    if !exists_nontrivial_directed_path(graph, b, a) {
        graph.add_arc(a, b);
        state.marks.commit_arc(a, b);
        return Commit::Committed { tail: a, head: b };
    }
    if admissible(graph, prior, state, b, a) && !exists_nontrivial_directed_path(graph, a, b) {
        graph.add_arc(b, a);
        state.marks.commit_arc(b, a);
        return Commit::Committed { tail: b, head: a };
    }
    // Both directions close a cycle: force the requested one and leave the
    // conflict to latent-couple resolution.
    graph.add_arc(a, b);
    state.marks.set(a, b, Mark::Arrowhead);
    state.latent_couples.push((a, b));
    Commit::Latent { tail: a, head: b }
}

fn admissible(
    graph: &MixedGraph,
    prior: &PriorKnowledge,
    state: &OrientationState,
    tail: NodeId,
    head: NodeId,
) -> bool {
    !state.marks.head_forbidden(tail, head)
        && !prior.is_forbidden_arc(tail, head)
        && !prior.would_exceed_in_degree(graph, head)
}

/// Resolves recorded latent couples, most recent first.
///
/// For each recorded arc the reverse arc is erased; if a directed path from
/// head back to tail survives the erasure, the kept direction is flipped
/// (last-write-wins, biased toward the most recently discovered pair).
pub fn resolve_latent_couples(graph: &mut MixedGraph, state: &mut OrientationState) {
    let couples: Vec<(NodeId, NodeId)> = state.latent_couples.iter().rev().copied().collect();
    for (tail, head) in couples {
        graph.erase_arc(head, tail);
        if graph.has_arc(tail, head) && exists_directed_path(graph, head, tail) {
            graph.erase_arc(tail, head);
            graph.add_arc(head, tail);
            state.marks.commit_arc(head, tail);
        } else if graph.has_arc(tail, head) {
            state.marks.commit_arc(tail, head);
        }
    }
}
