//! Parser module: arena, node definitions, parser state, traversal.

pub mod base;
pub mod node;
pub mod node_access;
pub mod node_arena;
pub mod state;
mod state_expressions;
mod state_statements;
pub mod traversal;

#[cfg(test)]
#[path = "../../tests/parser_tests.rs"]
mod parser_tests;

#[cfg(test)]
#[path = "../../tests/traversal_tests.rs"]
mod traversal_tests;
