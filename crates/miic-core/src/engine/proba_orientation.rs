//! Probabilistic "MIIC" orientation strategy.
//!
//! Each unshielded triple carries two posterior estimates, one per arm,
//! initialized at 0.5 and refined from the three-point score: non-positive
//! scores (collider evidence) raise both posteriors to a shared baseline,
//! positive scores strengthen already-likely arrowheads through a Bayes odds
//! update. Triples are committed best-first; after every commit the whole
//! remaining list is re-scored and re-sorted so later decisions see the
//! newly oriented arcs. Committed arcs remember the posterior that drove
//! them, and that confidence never decreases once set.

use std::cmp::Ordering;

use crate::engine::constraints::PriorKnowledge;
use crate::engine::errors::LearnError;
use crate::engine::graph::{MixedGraph, NodeId};
use crate::engine::oracle::InformationOracle;
use crate::engine::orientation::{
    collect_unshielded_triples, cycle_safe_commit, resolve_latent_couples, seed_from_prior,
    Commit, OrientationDiagnostics, OrientationState, UnshieldedTriple,
};
use crate::engine::progress::ProgressReporter;
use crate::engine::sepsets::SeparationSets;
use crate::engine::skeleton::exp_clipped;

/// Configuration for the probabilistic strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbaOrientationConfig {
    /// Whether collider commits also fire on a three-point score of exactly
    /// zero (`score <= 0`) instead of requiring strict negativity.
    pub collider_on_zero: bool,
    /// Magnitude bound on exponent arguments in the posterior updates.
    pub exp_clip: f64,
}

impl Default for ProbaOrientationConfig {
    fn default() -> Self {
        Self {
            collider_on_zero: false,
            exp_clip: 100.0,
        }
    }
}

impl ProbaOrientationConfig {
    /// Rejects non-finite or non-positive numeric knobs.
    pub fn validate(&self) -> Result<(), LearnError> {
        if !self.exp_clip.is_finite() || self.exp_clip <= 0.0 {
            return Err(LearnError::Constraint(
                "orientation: exp_clip must be finite and > 0".into(),
            ));
        }
        Ok(())
    }

    fn collider_fires(&self, info: f64) -> bool {
        if self.collider_on_zero {
            info <= 0.0
        } else {
            info < 0.0
        }
    }
}

/// An unshielded triple with per-arm orientation posteriors.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ProbaTriple {
    base: UnshieldedTriple,
    /// Posterior that the `x` arm carries an arrowhead into `z`.
    p_xz: f64,
    /// Posterior that the `y` arm carries an arrowhead into `z`.
    p_yz: f64,
}

impl ProbaTriple {
    fn max_p(&self) -> f64 {
        self.p_xz.max(self.p_yz)
    }

    fn min_p(&self) -> f64 {
        self.p_xz.min(self.p_yz)
    }
}

/// Multiplies the odds of `p` by `exp(info)`, saturating at the clip bound.
fn odds_update(p: f64, info: f64, clip: f64) -> f64 {
    let p = p.clamp(f64::MIN_POSITIVE, 1.0 - 1e-12);
    let odds = p / (1.0 - p) * exp_clipped(info, clip);
    odds / (1.0 + odds)
}

/// Refines every posterior pair from its triple's three-point score.
fn update_proba_triples(triples: &mut [ProbaTriple], clip: f64) {
    for triple in triples.iter_mut() {
        let info = triple.base.info;
        if info <= 0.0 {
            // Collider evidence: both arms share the baseline.
            let p0 = 1.0 / (1.0 + exp_clipped(info, clip));
            triple.p_xz = triple.p_xz.max(p0);
            triple.p_yz = triple.p_yz.max(p0);
        } else {
            if triple.p_xz >= 0.5 {
                triple.p_xz = triple.p_xz.max(odds_update(triple.p_xz, info, clip));
            }
            if triple.p_yz >= 0.5 {
                triple.p_yz = triple.p_yz.max(odds_update(triple.p_yz, info, clip));
            }
        }
    }
}

/// Best-first order: max posterior, then absolute score, then the weaker
/// posterior of the pair, then ascending node ids.
fn sort_triples(triples: &mut [ProbaTriple]) {
    triples.sort_unstable_by(|a, b| compare(b, a));
}

fn compare(a: &ProbaTriple, b: &ProbaTriple) -> Ordering {
    a.max_p()
        .total_cmp(&b.max_p())
        .then_with(|| a.base.info.abs().total_cmp(&b.base.info.abs()))
        .then_with(|| a.min_p().total_cmp(&b.min_p()))
        .then_with(|| {
            (b.base.x, b.base.y, b.base.z).cmp(&(a.base.x, a.base.y, a.base.z))
        })
}

/// Records the posterior that created an arc; later writes only raise it.
fn record_arc_probability(state: &mut OrientationState, tail: NodeId, head: NodeId, p: f64) {
    state
        .arc_probabilities
        .entry((tail, head))
        .and_modify(|existing| *existing = existing.max(p))
        .or_insert(p);
}

/// Orients the skeleton in place with posterior-driven commits.
///
/// Returns the orientation state — including the per-arc probability table —
/// and run counters. Progress runs from 66 toward 100; the terminal 100
/// report is left to the caller.
pub fn orient_probabilistic<O: InformationOracle>(
    graph: &mut MixedGraph,
    oracle: &O,
    sepsets: &SeparationSets,
    prior: &PriorKnowledge,
    config: &ProbaOrientationConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<(OrientationState, OrientationDiagnostics), LearnError> {
    config.validate()?;

    let mut state = OrientationState::default();
    let mut diagnostics = OrientationDiagnostics::default();

    seed_from_prior(graph, prior, &mut state)?;

    let mut triples: Vec<ProbaTriple> = collect_unshielded_triples(graph, sepsets, oracle)?
        .into_iter()
        .map(|base| ProbaTriple {
            base,
            p_xz: 0.5,
            p_yz: 0.5,
        })
        .collect();
    diagnostics.triples_examined = triples.len();

    update_proba_triples(&mut triples, config.exp_clip);
    sort_triples(&mut triples);

    let total = triples.len().max(1) as f64;
    let mut processed = 0usize;
    while let Some(&head) = triples.first() {
        if head.max_p() < 0.5 {
            break;
        }
        triples.remove(0);
        processed += 1;

        let committed = commit_triple(graph, prior, config, &mut state, &head);
        if committed > 0 {
            diagnostics.commits += committed;
            update_proba_triples(&mut triples, config.exp_clip);
            sort_triples(&mut triples);
        }
        reporter.report(66.0 + 30.0 * processed as f64 / total, head.max_p());
    }

    diagnostics.latent_couples = state.latent_couples.len();
    resolve_latent_couples(graph, &mut state);
    Ok((state, diagnostics))
}

/// Commits the orientations implied by one triple; returns how many arcs
/// changed.
fn commit_triple(
    graph: &mut MixedGraph,
    prior: &PriorKnowledge,
    config: &ProbaOrientationConfig,
    state: &mut OrientationState,
    triple: &ProbaTriple,
) -> usize {
    let UnshieldedTriple { x, z, y, info, .. } = triple.base;
    let mut committed = 0;

    if config.collider_fires(info) {
        // Both arms point into z, most confident arm first.
        let arms: [(NodeId, f64); 2] = if triple.p_xz >= triple.p_yz {
            [(x, triple.p_xz), (y, triple.p_yz)]
        } else {
            [(y, triple.p_yz), (x, triple.p_xz)]
        };
        for (tail, p) in arms {
            if p < 0.5 {
                continue;
            }
            match cycle_safe_commit(graph, prior, state, tail, z) {
                Commit::Committed { tail, head } | Commit::Latent { tail, head } => {
                    record_arc_probability(state, tail, head, p);
                    committed += 1;
                }
                Commit::Skipped => {}
            }
        }
    } else {
        // Propagation: an arm already pointing into z pushes the other arm
        // away from z.
        let arms = [(x, y, triple.p_yz), (y, x, triple.p_xz)];
        for (into, other, p) in arms {
            if p >= 0.5
                && graph.has_arc(into, z)
                && !graph.has_arc(z, into)
                && graph.has_edge(z, other)
                && !state.marks.head_forbidden(z, other)
                && !prior.is_forbidden_arc(z, other)
            {
                match cycle_safe_commit(graph, prior, state, z, other) {
                    Commit::Committed { tail, head } | Commit::Latent { tail, head } => {
                        record_arc_probability(state, tail, head, p);
                        committed += 1;
                    }
                    Commit::Skipped => {}
                }
                break;
            }
        }
    }
    committed
}
