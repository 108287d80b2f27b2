//! Tree compression for jsz.
//!
//! This crate provides:
//! - `reduce_vars` - flow-sensitive analysis of which binding values stay
//!   known at each read
//! - `Analysis` - the per-read results, with constant folding on top
//! - rewrites consuming it: constant substitution, property folding, dead
//!   branch and unreachable code removal, unused binding elimination
//! - `Compressor` - the round driver tying them together

pub mod analysis;
pub mod compressor;
pub mod evaluate;
pub mod options;
pub mod reduce_vars;
pub mod side_effects;

mod dead_code;
mod drop_unused;
mod reduce_vars_flow;
mod substitute;
mod tree;

pub use analysis::Analysis;
pub use compressor::{CompressOutput, Compressor};
pub use evaluate::ConstantValue;
pub use options::{CompressOptions, RetainPredicate};
pub use reduce_vars::analyze;

#[cfg(test)]
#[path = "../tests/evaluate_tests.rs"]
mod evaluate_tests;

#[cfg(test)]
#[path = "../tests/reduce_vars_tests.rs"]
mod reduce_vars_tests;

#[cfg(test)]
#[path = "../tests/drop_unused_tests.rs"]
mod drop_unused_tests;

#[cfg(test)]
#[path = "../tests/dead_code_tests.rs"]
mod dead_code_tests;

#[cfg(test)]
#[path = "../tests/compressor_tests.rs"]
mod compressor_tests;
