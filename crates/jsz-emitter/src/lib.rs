//! Compact printer for jsz.
//!
//! [`Printer`] writes a tree back out as JavaScript with no optional
//! whitespace, the fewest parentheses precedence allows, and statement
//! separators only where the grammar needs them.

mod expressions;
pub mod literals;
mod printer;
mod statements;

pub use literals::{format_number, quote_string};
pub use printer::Printer;

#[cfg(test)]
#[path = "../tests/printer_tests.rs"]
mod printer_tests;

#[cfg(test)]
#[path = "../tests/literals_tests.rs"]
mod literals_tests;
