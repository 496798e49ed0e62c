//! Deterministic "3off2" orientation strategy.
//!
//! Unshielded triples are processed in strict score order with a worklist
//! that restarts from the top after every successful commit, so downstream
//! triples see newly oriented arcs. Two rules apply: Rule 0 turns a
//! negative-score triple whose middle node is outside the recorded separator
//! into a collider; Rule 1 propagates an existing arrowhead through the
//! remaining undirected arm, away from the middle node.

use crate::engine::constraints::PriorKnowledge;
use crate::engine::errors::LearnError;
use crate::engine::graph::MixedGraph;
use crate::engine::oracle::InformationOracle;
use crate::engine::orientation::{
    collect_unshielded_triples, cycle_safe_commit, resolve_latent_couples, seed_from_prior,
    OrientationDiagnostics, OrientationState, UnshieldedTriple,
};
use crate::engine::progress::ProgressReporter;
use crate::engine::sepsets::SeparationSets;

/// Configuration for the rule-based strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleOrientationConfig {
    /// Whether Rule 0 also fires on a three-point score of exactly zero
    /// (`score <= 0`) instead of requiring strict negativity. The two
    /// historical variants of the algorithm disagree here, so the choice is
    /// an explicit policy.
    pub collider_on_zero: bool,
}

impl RuleOrientationConfig {
    fn collider_fires(&self, info: f64) -> bool {
        if self.collider_on_zero {
            info <= 0.0
        } else {
            info < 0.0
        }
    }
}

/// Orients the skeleton in place with Rules 0 and 1.
///
/// Returns the final orientation state (marks, resolved latent couples) and
/// run counters. Progress runs from 66 toward 100; the terminal 100 report
/// is left to the caller.
pub fn orient_rule_based<O: InformationOracle>(
    graph: &mut MixedGraph,
    oracle: &O,
    sepsets: &SeparationSets,
    prior: &PriorKnowledge,
    config: &RuleOrientationConfig,
    reporter: &mut ProgressReporter<'_>,
) -> Result<(OrientationState, OrientationDiagnostics), LearnError> {
    let mut state = OrientationState::default();
    let mut diagnostics = OrientationDiagnostics::default();

    seed_from_prior(graph, prior, &mut state)?;

    let mut triples = collect_unshielded_triples(graph, sepsets, oracle)?;
    diagnostics.triples_examined = triples.len();
    // Strongest evidence first; deterministic among equals.
    triples.sort_unstable_by(|a, b| {
        b.info
            .abs()
            .total_cmp(&a.info.abs())
            .then_with(|| (a.x, a.y, a.z).cmp(&(b.x, b.y, b.z)))
    });

    let total = triples.len().max(1) as f64;
    let mut index = 0;
    while index < triples.len() {
        let triple = triples[index];
        let changed = apply_rules(graph, prior, &mut state, config, &triple);
        if changed {
            diagnostics.commits += 1;
            // Restart so earlier triples can exploit the new arc.
            index = 0;
        } else {
            index += 1;
        }
        reporter.report(66.0 + 30.0 * index as f64 / total, triple.info);
    }

    diagnostics.latent_couples = state.latent_couples.len();
    resolve_latent_couples(graph, &mut state);
    Ok((state, diagnostics))
}

fn apply_rules(
    graph: &mut MixedGraph,
    prior: &PriorKnowledge,
    state: &mut OrientationState,
    config: &RuleOrientationConfig,
    triple: &UnshieldedTriple,
) -> bool {
    let UnshieldedTriple { x, z, y, info, z_in_sepset } = *triple;

    // Rule 0: collider. The middle node does not separate the pair, so both
    // arms point into it.
    if config.collider_fires(info) && !z_in_sepset {
        let first = cycle_safe_commit(graph, prior, state, x, z);
        let second = cycle_safe_commit(graph, prior, state, y, z);
        return first.changed() || second.changed();
    }

    // Rule 1: propagation. One arm already points into z; the other arm is
    // still a plain edge, which must then point away from z or the triple
    // would have been a collider.
    if !config.collider_fires(info) {
        for (into, other) in [(x, y), (y, x)] {
            if graph.has_arc(into, z)
                && !graph.has_arc(z, into)
                && graph.has_edge(z, other)
                && !state.marks.head_forbidden(z, other)
                && !prior.is_forbidden_arc(z, other)
            {
                return cycle_safe_commit(graph, prior, state, z, other).changed();
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graph::NodeId;
    use crate::engine::oracle::TableOracle;
    use crate::engine::sepsets::CondSet;

    fn n(id: u32) -> NodeId {
        NodeId(id)
    }

    fn orient(
        graph: &mut MixedGraph,
        oracle: &TableOracle,
        sepsets: &SeparationSets,
        prior: &PriorKnowledge,
    ) -> (OrientationState, OrientationDiagnostics) {
        let mut reporter = ProgressReporter::new(None);
        orient_rule_based(
            graph,
            oracle,
            sepsets,
            prior,
            &RuleOrientationConfig::default(),
            &mut reporter,
        )
        .expect("orientation")
    }

    #[test]
    fn rule0_orients_a_collider() {
        // Skeleton 1 - 3 - 2 where {1, 2} separated by the empty set.
        let mut graph = MixedGraph::new();
        graph.add_edge(n(1), n(3));
        graph.add_edge(n(2), n(3));
        let mut sepsets = SeparationSets::new();
        sepsets.record(n(1), n(2), CondSet::new());
        let mut oracle = TableOracle::new();
        oracle.set_triple(n(1), n(2), n(3), &[], -0.5);

        let (state, diagnostics) = orient(&mut graph, &oracle, &sepsets, &PriorKnowledge::new());
        assert!(graph.has_arc(n(1), n(3)));
        assert!(graph.has_arc(n(2), n(3)));
        assert_eq!(graph.edge_count(), 0);
        assert!(state.latent_couples.is_empty());
        assert_eq!(diagnostics.triples_examined, 1);
    }

    #[test]
    fn rule0_respects_the_recorded_separator() {
        // Same shape, but 3 is part of the separator: no collider.
        let mut graph = MixedGraph::new();
        graph.add_edge(n(1), n(3));
        graph.add_edge(n(2), n(3));
        let mut sepsets = SeparationSets::new();
        sepsets.record(n(1), n(2), CondSet::from_slice(&[n(3)]));
        let mut oracle = TableOracle::new();
        oracle.set_triple(n(1), n(2), n(3), &[], -0.5);

        let (_, diagnostics) = orient(&mut graph, &oracle, &sepsets, &PriorKnowledge::new());
        assert!(graph.has_edge(n(1), n(3)));
        assert!(graph.has_edge(n(2), n(3)));
        assert_eq!(diagnostics.commits, 0);
    }

    #[test]
    fn collider_on_zero_is_a_policy_choice() {
        let build = || {
            let mut graph = MixedGraph::new();
            graph.add_edge(n(1), n(3));
            graph.add_edge(n(2), n(3));
            let mut sepsets = SeparationSets::new();
            sepsets.record(n(1), n(2), CondSet::new());
            (graph, sepsets, TableOracle::new()) // triple score defaults to 0.0
        };

        let (mut graph, sepsets, oracle) = build();
        let (_, diagnostics) = orient(&mut graph, &oracle, &sepsets, &PriorKnowledge::new());
        assert_eq!(diagnostics.commits, 0, "strict rule ignores a zero score");

        let (mut graph, sepsets, oracle) = build();
        let mut reporter = ProgressReporter::new(None);
        let config = RuleOrientationConfig { collider_on_zero: true };
        orient_rule_based(
            &mut graph,
            &oracle,
            &sepsets,
            &PriorKnowledge::new(),
            &config,
            &mut reporter,
        )
        .expect("orientation");
        assert!(graph.has_arc(n(1), n(3)));
        assert!(graph.has_arc(n(2), n(3)));
    }

    #[test]
    fn rule1_propagates_away_from_the_middle_node() {
        // 1 -> 2 with edge {2, 3}: the triple 1 - 2 - 3 is not a collider,
        // so the remaining arm points away from 2.
        let mut graph = MixedGraph::new();
        graph.add_arc(n(1), n(2));
        graph.add_edge(n(2), n(3));
        let mut oracle = TableOracle::new();
        oracle.set_triple(n(1), n(3), n(2), &[], 0.4);

        let (_, diagnostics) =
            orient(&mut graph, &oracle, &SeparationSets::new(), &PriorKnowledge::new());
        assert!(graph.has_arc(n(2), n(3)));
        assert_eq!(diagnostics.commits, 1);
    }

    #[test]
    fn rule1_respects_forbidden_marks() {
        let mut graph = MixedGraph::new();
        graph.add_arc(n(1), n(2));
        graph.add_edge(n(2), n(3));
        let mut oracle = TableOracle::new();
        oracle.set_triple(n(1), n(3), n(2), &[], 0.4);
        let mut prior = PriorKnowledge::new();
        prior.add_forbidden_arc(n(2), n(3));
        prior.add_forbidden_arc(n(3), n(2));

        // The forbidden edge normally disappears during initiation; with it
        // still present, Rule 1 must leave it untouched rather than commit a
        // forbidden direction.
        let (_, diagnostics) = orient(&mut graph, &oracle, &SeparationSets::new(), &prior);
        assert_eq!(diagnostics.commits, 0);
        assert!(graph.has_edge(n(2), n(3)));
    }

    #[test]
    fn worklist_restarts_after_each_commit() {
        // Chain 1 -> 2 - 3 - 4. The triple at 3 scores higher but cannot
        // fire until the triple at 2 has oriented 2 -> 3.
        let mut graph = MixedGraph::new();
        graph.add_arc(n(1), n(2));
        graph.add_edge(n(2), n(3));
        graph.add_edge(n(3), n(4));
        let mut oracle = TableOracle::new();
        oracle.set_triple(n(1), n(3), n(2), &[], 0.2);
        oracle.set_triple(n(2), n(4), n(3), &[], 0.9);

        let (_, diagnostics) =
            orient(&mut graph, &oracle, &SeparationSets::new(), &PriorKnowledge::new());
        assert!(graph.has_arc(n(2), n(3)));
        assert!(graph.has_arc(n(3), n(4)));
        assert_eq!(diagnostics.commits, 2);
    }

    #[test]
    fn reorientation_of_a_fully_oriented_graph_is_a_noop() {
        let mut graph = MixedGraph::new();
        graph.add_edge(n(1), n(3));
        graph.add_edge(n(2), n(3));
        let mut sepsets = SeparationSets::new();
        sepsets.record(n(1), n(2), CondSet::new());
        let mut oracle = TableOracle::new();
        oracle.set_triple(n(1), n(2), n(3), &[], -0.5);

        orient(&mut graph, &oracle, &sepsets, &PriorKnowledge::new());
        let arcs = graph.arcs();
        let edges = graph.edges();

        let (_, diagnostics) = orient(&mut graph, &oracle, &sepsets, &PriorKnowledge::new());
        assert_eq!(graph.arcs(), arcs);
        assert_eq!(graph.edges(), edges);
        assert_eq!(diagnostics.commits, 0);
    }

    #[test]
    fn mandatory_arcs_survive_orientation() {
        // Mandatory 3 -> 1 conflicts with the collider at 3; the collider
        // may not reverse it.
        let mut graph = MixedGraph::new();
        graph.add_edge(n(1), n(3));
        graph.add_edge(n(2), n(3));
        let mut sepsets = SeparationSets::new();
        sepsets.record(n(1), n(2), CondSet::new());
        let mut oracle = TableOracle::new();
        oracle.set_triple(n(1), n(2), n(3), &[], -0.5);
        let mut prior = PriorKnowledge::new();
        prior.add_mandatory_arc(n(3), n(1));

        let (_, _) = orient(&mut graph, &oracle, &sepsets, &prior);
        assert!(graph.has_arc(n(3), n(1)));
        assert!(!graph.has_arc(n(1), n(3)));
        assert!(graph.has_arc(n(2), n(3)));
    }
}
