//! The causal-structure-learning engine.
//!
//! This module provides:
//! - **errors**: Error types for learning failures
//! - **graph**: Mixed graph (undirected edges + directed arcs)
//! - **paths**: Directed-path queries for cycle avoidance
//! - **oracle**: Independence-oracle adapter
//! - **constraints**: Prior knowledge (mandatory/forbidden arcs, bounds)
//! - **sepsets**: Separating-set table
//! - **skeleton**: Initiation and iteration phases
//! - **marks** / **orientation**: Shared orientation mechanics
//! - **rule_orientation** / **proba_orientation**: The two strategies
//! - **learner**: End-to-end entry point
//! - **propagation**: External Meek-propagator contract
//! - **progress**: Monotonic progress reporting

pub mod constraints;
pub mod errors;
pub mod graph;
pub mod learner;
pub mod marks;
pub mod oracle;
pub mod orientation;
pub mod paths;
pub mod proba_orientation;
pub mod progress;
pub mod propagation;
pub mod rule_orientation;
pub mod sepsets;
pub mod skeleton;
