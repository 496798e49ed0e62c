//! End-to-end learning scenarios through the public API.

use miic_core::engine::proba_orientation::ProbaOrientationConfig;
use miic_core::engine::rule_orientation::RuleOrientationConfig;
use miic_core::{
    learn_structure, LearnConfig, MixedGraph, NodeId, OrientationStrategy, PriorKnowledge,
    TableOracle,
};

fn n(id: u32) -> NodeId {
    NodeId(id)
}

/// Oracle scores for the canonical collider A -> C <- B over nodes 1, 2, 3:
/// {A, B} is dependent marginally but independent given C, and the
/// three-point score at C is negative.
fn collider_oracle() -> TableOracle {
    let (a, b, c) = (n(1), n(2), n(3));
    let mut oracle = TableOracle::new();
    oracle.set_pair(a, b, &[], 0.8);
    oracle.set_pair(a, c, &[], 2.0);
    oracle.set_pair(b, c, &[], 1.9);
    oracle.set_triple(a, b, c, &[], -2.0);
    oracle.set_pair(a, b, &[c], -0.2);
    oracle
}

#[test]
fn marginally_independent_pairs_are_cut_with_empty_separators() {
    let mut graph = MixedGraph::complete((1..=4).map(NodeId));
    let mut oracle = TableOracle::new();
    // Only {1, 2} is dependent; everything else scores <= 0.
    oracle.set_pair(n(1), n(2), &[], 0.6);
    oracle.set_pair(n(3), n(4), &[], -0.5);

    let outcome = learn_structure(
        &mut graph,
        &oracle,
        &PriorKnowledge::new(),
        &LearnConfig::default(),
        None,
    )
    .expect("learn");

    assert_eq!(graph.edges(), vec![(n(1), n(2))]);
    for (x, y) in [(n(1), n(3)), (n(1), n(4)), (n(2), n(3)), (n(2), n(4)), (n(3), n(4))] {
        assert!(
            outcome.sepsets.get(x, y).is_some_and(|s| s.is_empty()),
            "pair ({x:?}, {y:?}) should carry an empty separator"
        );
    }
    assert!(outcome.sepsets.get(n(1), n(2)).is_none());
}

#[test]
fn forbidden_edge_is_deleted_regardless_of_the_oracle() {
    let mut graph = MixedGraph::complete([n(1), n(2)]);
    let mut oracle = TableOracle::new();
    oracle.set_pair(n(1), n(2), &[], 10.0);
    let mut prior = PriorKnowledge::new();
    prior.add_forbidden_arc(n(1), n(2));
    prior.add_forbidden_arc(n(2), n(1));

    let outcome =
        learn_structure(&mut graph, &oracle, &prior, &LearnConfig::default(), None).expect("learn");
    assert_eq!(graph.edge_count(), 0);
    assert!(outcome.sepsets.get(n(1), n(2)).is_none(), "no separator for forbidden edges");
}

#[test]
fn collider_scenario_with_the_probabilistic_strategy() {
    let (a, b, c) = (n(1), n(2), n(3));
    let mut graph = MixedGraph::complete([a, b, c]);
    let outcome = learn_structure(
        &mut graph,
        &collider_oracle(),
        &PriorKnowledge::new(),
        &LearnConfig::default(),
        None,
    )
    .expect("learn");

    assert_eq!(outcome.sepsets.get(a, b).map(|s| s.as_slice()), Some(&[c][..]));
    assert!(graph.has_arc(a, c), "A -> C");
    assert!(graph.has_arc(b, c), "B -> C");
    assert_eq!(graph.edge_count(), 0);
    let p_ac = outcome.arc_probabilities[&(a, c)];
    let p_bc = outcome.arc_probabilities[&(b, c)];
    assert!(p_ac > 0.5 && p_bc > 0.5);
}

#[test]
fn rule_based_collider_requires_the_middle_node_outside_the_separator() {
    // Same skeleton, but the pair is cut marginally, so the separator is
    // empty and 3off2's Rule 0 fires.
    let (a, b, c) = (n(1), n(2), n(3));
    let mut graph = MixedGraph::complete([a, b, c]);
    let mut oracle = TableOracle::new();
    oracle.set_pair(a, b, &[], -0.1);
    oracle.set_pair(a, c, &[], 2.0);
    oracle.set_pair(b, c, &[], 1.9);
    oracle.set_triple(a, b, c, &[], -0.5);

    let config = LearnConfig {
        strategy: OrientationStrategy::RuleBased(RuleOrientationConfig::default()),
        ..LearnConfig::default()
    };
    let outcome =
        learn_structure(&mut graph, &oracle, &PriorKnowledge::new(), &config, None).expect("learn");

    assert!(graph.has_arc(a, c));
    assert!(graph.has_arc(b, c));
    assert!(outcome.arc_probabilities.is_empty());
}

#[test]
fn mandatory_arc_overrides_every_statistical_step() {
    let (p, q, r) = (n(1), n(2), n(3));
    let mut graph = MixedGraph::complete([p, q, r]);
    let mut oracle = TableOracle::new();
    oracle.set_pair(p, q, &[], -0.1); // cut marginally
    oracle.set_pair(p, r, &[], 2.0);
    oracle.set_pair(q, r, &[], 1.9);
    // The collider at r wants p -> r and q -> r; the prior forces r -> p.
    oracle.set_triple(p, q, r, &[], -0.5);
    let mut prior = PriorKnowledge::new();
    prior.add_mandatory_arc(r, p);

    let outcome = learn_structure(&mut graph, &oracle, &prior, &LearnConfig::default(), None)
        .expect("learn");
    assert!(graph.has_arc(r, p), "the mandatory arc survives");
    assert!(!graph.has_arc(p, r), "no rule may reverse a mandatory arc");
    assert!(graph.has_arc(q, r), "the unconstrained arm still orients");
    assert!(outcome.marks.head_forbidden(p, r));
}

#[test]
fn mandatory_pair_keeps_no_separating_set() {
    // The oracle would cut {1, 2} marginally; the mandatory arc keeps the
    // pair connected, so no separator may be recorded for it.
    let (p, q) = (n(1), n(2));
    let mut graph = MixedGraph::complete([p, q]);
    let mut oracle = TableOracle::new();
    oracle.set_pair(p, q, &[], -0.3);
    let mut prior = PriorKnowledge::new();
    prior.add_mandatory_arc(p, q);

    let outcome = learn_structure(&mut graph, &oracle, &prior, &LearnConfig::default(), None)
        .expect("learn");
    assert!(graph.has_arc(p, q));
    assert!(outcome.sepsets.get(p, q).is_none());
}

#[test]
fn in_degree_bound_limits_collider_commits() {
    let (a, b, c) = (n(1), n(2), n(3));
    let mut graph = MixedGraph::complete([a, b, c]);
    let mut prior = PriorKnowledge::new();
    prior.set_in_degree_bound(c, 1);

    learn_structure(&mut graph, &collider_oracle(), &prior, &LearnConfig::default(), None)
        .expect("learn");
    assert_eq!(graph.in_degree(c), 1, "the bound admits exactly one parent");
    assert_eq!(graph.edge_count(), 1, "the skipped arm stays undirected");
}

#[test]
fn saturated_node_leaves_both_collider_arms_undirected() {
    // A node already at its bound must not deflect the collider arms into
    // outgoing arcs; the edges simply stay undirected.
    let (a, b, c) = (n(1), n(2), n(3));
    let mut oracle = TableOracle::new();
    oracle.set_pair(a, b, &[], -0.1); // empty separator, so Rule 0 fires
    oracle.set_pair(a, c, &[], 2.0);
    oracle.set_pair(b, c, &[], 1.9);
    oracle.set_triple(a, b, c, &[], -0.5);
    let mut prior = PriorKnowledge::new();
    prior.set_in_degree_bound(c, 0);

    for strategy in [
        OrientationStrategy::RuleBased(RuleOrientationConfig::default()),
        OrientationStrategy::default(),
    ] {
        let mut graph = MixedGraph::complete([a, b, c]);
        let config = LearnConfig { strategy, ..LearnConfig::default() };
        learn_structure(&mut graph, &oracle, &prior, &config, None).expect("learn");
        assert_eq!(graph.arc_count(), 0, "no direction is justified");
        assert!(graph.has_edge(a, c));
        assert!(graph.has_edge(b, c));
    }
}

#[test]
fn strict_collider_policy_changes_zero_score_behavior() {
    let (a, b, c) = (n(1), n(2), n(3));
    let oracle = {
        let mut oracle = TableOracle::new();
        oracle.set_pair(a, b, &[], -0.1);
        oracle.set_pair(a, c, &[], 2.0);
        oracle.set_pair(b, c, &[], 1.9);
        // Three-point score defaults to exactly 0.0.
        oracle
    };

    for (collider_on_zero, expect_arcs) in [(false, 0), (true, 2)] {
        let mut graph = MixedGraph::complete([a, b, c]);
        let config = LearnConfig {
            strategy: OrientationStrategy::Probabilistic(ProbaOrientationConfig {
                collider_on_zero,
                ..ProbaOrientationConfig::default()
            }),
            ..LearnConfig::default()
        };
        learn_structure(&mut graph, &oracle, &PriorKnowledge::new(), &config, None)
            .expect("learn");
        assert_eq!(graph.arc_count(), expect_arcs);
    }
}
