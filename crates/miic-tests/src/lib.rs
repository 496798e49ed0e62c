//! Integration and property tests for `miic-core` live under `tests/`.
