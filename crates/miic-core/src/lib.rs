//! # miic-core
//!
//! Constraint-based causal-structure learning over mixed graphs, in the
//! MIIC / 3off2 family: a greedy best-first skeleton search driven by an
//! external conditional-information oracle, followed by a rule-based or
//! probabilistic orientation pass with cycle avoidance and latent-variable
//! bookkeeping. The output is a partially oriented mixed graph a downstream
//! Meek-rule propagator can complete.

pub mod engine;

// Re-export the types most callers need.
pub use engine::constraints::PriorKnowledge;
pub use engine::errors::LearnError;
pub use engine::graph::{MixedGraph, NodeId};
pub use engine::learner::{
    learn_structure, LearnConfig, LearnOutcome, OrientationStrategy,
};
pub use engine::marks::{Mark, MarkTable};
pub use engine::oracle::{InformationOracle, TableOracle};
pub use engine::progress::ProgressEvent;
