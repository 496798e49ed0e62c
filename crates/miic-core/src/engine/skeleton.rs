//! Skeleton learner: initiation and iteration phases.
//!
//! Initiation prunes every initial edge that is forbidden or unconditionally
//! independent and seeds the best-contributor heap; iteration greedily grows
//! conditioning sets for the most promising candidates until no entry scores
//! above 0.5. Pairs found independent are removed from the graph and their
//! conditioning set is recorded in the separating-set table for the
//! orientation engine.
//!
//! Heap entries are owned value types; popping one consumes it. The heap
//! order is total and deterministic: `f64::total_cmp` on the score, then
//! ascending lexicographic `(x, y, z)` among equals.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::engine::constraints::PriorKnowledge;
use crate::engine::errors::LearnError;
use crate::engine::graph::{MixedGraph, NodeId};
use crate::engine::oracle::InformationOracle;
use crate::engine::progress::ProgressReporter;
use crate::engine::sepsets::{CondSet, SeparationSets};

/// Configuration for the skeleton phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonConfig {
    /// Magnitude bound on exponent arguments in the logistic surrogates.
    /// Inputs beyond the bound saturate to 0 or 1 instead of producing
    /// non-finite values.
    pub exp_clip: f64,
    /// Scale factor `k` applied to the three-point information inside the
    /// `p_nv` surrogate.
    pub contributor_scale: f64,
    /// Legacy cut rule for the iteration phase: cut only on strictly
    /// negative conditional information (`I < 0`) instead of `I <= 0`.
    /// Initiation always cuts on `I <= 0`.
    pub strict_cut: bool,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            exp_clip: 100.0,
            contributor_scale: 1.0,
            strict_cut: false,
        }
    }
}

impl SkeletonConfig {
    /// Rejects non-finite or non-positive numeric knobs.
    pub fn validate(&self) -> Result<(), LearnError> {
        if !self.exp_clip.is_finite() || self.exp_clip <= 0.0 {
            return Err(LearnError::Constraint(
                "skeleton: exp_clip must be finite and > 0".into(),
            ));
        }
        if !self.contributor_scale.is_finite() || self.contributor_scale <= 0.0 {
            return Err(LearnError::Constraint(
                "skeleton: contributor_scale must be finite and > 0".into(),
            ));
        }
        Ok(())
    }

    fn iteration_cuts(&self, info: f64) -> bool {
        if self.strict_cut {
            info < 0.0
        } else {
            info <= 0.0
        }
    }
}

/// Saturating exponential: arguments beyond `clip` pin to the boundary value.
#[inline]
pub(crate) fn exp_clipped(x: f64, clip: f64) -> f64 {
    x.clamp(-clip, clip).exp()
}

/// Saturating logistic function `1 / (1 + exp(-x))`.
#[inline]
pub(crate) fn sigmoid_clipped(x: f64, clip: f64) -> f64 {
    if x >= clip {
        1.0
    } else if x <= -clip {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

/// One candidate produced by the best-contributor search.
///
/// Owned entirely by the heap until popped; the conditioning set travels with
/// the entry by value.
#[derive(Debug, Clone)]
pub struct RankingEntry {
    /// `min(p_nv, p_b)` for the chosen contributor.
    pub score: f64,
    pub x: NodeId,
    pub y: NodeId,
    /// The chosen contributor, not yet part of `cond`.
    pub z: NodeId,
    /// Conditioning set the search ran under.
    pub cond: CondSet,
}

impl PartialEq for RankingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankingEntry {}

impl PartialOrd for RankingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on score; among equal scores the lexicographically
        // smallest (x, y, z) pops first.
        self.score
            .total_cmp(&other.score)
            .then_with(|| (other.x, other.y, other.z).cmp(&(self.x, self.y, self.z)))
    }
}

/// Counters describing one skeleton run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkeletonDiagnostics {
    /// Edges present when initiation started.
    pub edges_examined: usize,
    /// Edges removed during initiation (forbidden or unconditionally
    /// independent).
    pub edges_removed_initiation: usize,
    /// Heap entries popped during iteration.
    pub iteration_steps: usize,
    /// Edges removed during iteration.
    pub edges_removed_iteration: usize,
}

/// Runs the best-contributor search for `(x, y)` under `cond`.
///
/// For every other node `z`, derives the two surrogates
/// `p_nv = sigma(-I(x,y,z|cond) * k)` ("z plausibly joins the separator") and
/// `p_b` ("z, rather than the current separator, explains the dependency"),
/// and keeps the `z` maximizing their minimum. Returns `None` when no
/// candidate `z` remains.
pub fn find_best_contributor<O: InformationOracle>(
    graph: &MixedGraph,
    oracle: &O,
    config: &SkeletonConfig,
    x: NodeId,
    y: NodeId,
    cond: &CondSet,
    info_xy: f64,
) -> Result<Option<RankingEntry>, LearnError> {
    let clip = config.exp_clip;
    let mut best: Option<(f64, NodeId)> = None;

    for z in graph.nodes() {
        if z == x || z == y || cond.contains(&z) {
            continue;
        }
        let info_xyz = oracle.triple_info(x, y, z, cond)?;
        let info_xz = oracle.pair_info(x, z, cond)?;
        let info_yz = oracle.pair_info(y, z, cond)?;

        let p_nv = sigmoid_clipped(-info_xyz * config.contributor_scale, clip);
        let denom =
            1.0 + exp_clipped(-(info_xz - info_xy), clip) + exp_clipped(-(info_yz - info_xy), clip);
        let p_b = 1.0 / denom;

        let score = p_nv.min(p_b);
        if !score.is_finite() {
            return Err(LearnError::Numerical(format!(
                "contributor score for ({:?}, {:?}, {:?}) is not finite",
                x, y, z
            )));
        }
        // Strict comparison: nodes arrive in ascending id order, so ties
        // keep the smallest id.
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, z));
        }
    }

    Ok(best.map(|(score, z)| RankingEntry {
        score,
        x,
        y,
        z,
        cond: cond.clone(),
    }))
}

/// Learns the skeleton in place and returns the separating-set table.
///
/// Progress spans 0..=33 over the initiation edges and 34..=66 over the
/// iteration heap; an exhausted heap is the normal terminal state, never an
/// error.
pub fn learn_skeleton<O: InformationOracle>(
    graph: &mut MixedGraph,
    oracle: &O,
    prior: &PriorKnowledge,
    config: &SkeletonConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<(SeparationSets, SkeletonDiagnostics), LearnError> {
    config.validate()?;
    prior.validate()?;

    let mut sepsets = SeparationSets::new();
    let mut diagnostics = SkeletonDiagnostics::default();
    let mut heap: BinaryHeap<RankingEntry> = BinaryHeap::new();

    // Initiation: prune forbidden and unconditionally independent pairs,
    // seed the heap for the rest.
    let edges = graph.edges();
    diagnostics.edges_examined = edges.len();
    let initiation_total = edges.len().max(1) as f64;

    for (index, &(x, y)) in edges.iter().enumerate() {
        if prior.is_mandatory_arc(x, y) || prior.is_mandatory_arc(y, x) {
            // The pair stays connected no matter what the oracle says;
            // orientation seeding turns the edge into the mandated arc. No
            // separating set is recorded for a pair that cannot separate.
        } else if prior.is_forbidden_edge(x, y) {
            graph.erase_edge(x, y);
            diagnostics.edges_removed_initiation += 1;
        } else {
            let info = oracle.pair_info(x, y, &[])?;
            if info <= 0.0 {
                graph.erase_edge(x, y);
                sepsets.record(x, y, CondSet::new());
                diagnostics.edges_removed_initiation += 1;
            } else if let Some(entry) =
                find_best_contributor(graph, oracle, config, x, y, &CondSet::new(), info)?
            {
                heap.push(entry);
            }
        }
        let percent = 33.0 * (index + 1) as f64 / initiation_total;
        reporter.report(percent, heap.peek().map_or(0.0, |e| e.score));
    }

    // Iteration: grow conditioning sets for the best-ranked candidates.
    let iteration_budget = heap.len().max(1) as f64;
    while let Some(entry) = heap.pop() {
        if entry.score <= 0.5 {
            break;
        }
        diagnostics.iteration_steps += 1;

        let mut cond: CondSet = entry.cond;
        cond.push(entry.z);
        let info = oracle.pair_info(entry.x, entry.y, &cond)?;
        if config.iteration_cuts(info) {
            graph.erase_edge(entry.x, entry.y);
            sepsets.record(entry.x, entry.y, cond);
            diagnostics.edges_removed_iteration += 1;
        } else if let Some(next) =
            find_best_contributor(graph, oracle, config, entry.x, entry.y, &cond, info)?
        {
            heap.push(next);
        }

        let fraction = (diagnostics.iteration_steps as f64 / iteration_budget).min(1.0);
        reporter.report(33.0 + 33.0 * fraction, info);
    }
    reporter.report(66.0, 0.0);

    Ok((sepsets, diagnostics))
}
