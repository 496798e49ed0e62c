//! Completion hand-off.
//!
//! The engine stops at a partially oriented mixed graph. Turning that into a
//! DAG or CPDAG is the job of an external Meek-rule propagator, invoked by
//! the caller, never by the engine. This module only fixes the contract such
//! a propagator must honor.

use crate::engine::errors::LearnError;
use crate::engine::graph::MixedGraph;

/// Contract for an external orientation-completion pass.
///
/// Implementations may orient remaining edges but must never delete edges or
/// introduce new adjacencies: completion only.
pub trait OrientationPropagator {
    /// Completes orientations as far as the rules allow; the result may
    /// still contain undirected edges.
    fn propagate(&self, graph: MixedGraph) -> Result<MixedGraph, LearnError>;

    /// Like [`propagate`](Self::propagate), but guarantees a fully directed
    /// acyclic result.
    fn propagate_to_dag(&self, graph: MixedGraph) -> Result<MixedGraph, LearnError>;

    /// Like [`propagate`](Self::propagate), but guarantees a completed
    /// partially directed acyclic graph.
    fn propagate_to_cpdag(&self, graph: MixedGraph) -> Result<MixedGraph, LearnError>;
}
