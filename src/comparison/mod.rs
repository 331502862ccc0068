//! Independent multi-algorithm comparison.
//!
//! Each requested algorithm runs on its own fresh instance over the same input
//! structures, in parallel on a bounded worker pool. Results are joined by
//! algorithm name; a failing algorithm is recorded as an error entry and does
//! not affect its siblings.

pub mod comparator;

pub use comparator::{compare_structures, AlgorithmOutcome, ComparisonResults};
