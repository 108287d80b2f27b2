//! Token definitions and the JavaScript scanner.
//!
//! The scanner turns source text into a flat token vector. Each token carries
//! its byte span, whether a line terminator preceded it (needed for automatic
//! semicolon insertion and restricted productions), and its cooked value.

pub mod syntax_kind;
pub use syntax_kind::*;

pub mod scanner_impl;
pub use scanner_impl::{Scanner, Token};

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
