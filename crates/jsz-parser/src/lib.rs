//! JavaScript parser and AST types for the jsz minifier.
//!
//! This crate provides:
//! - `NodeArena` - arena of `Node { pos, end, data }` addressed by `NodeIndex`
//! - `NodeData` - the tagged node kind enum
//! - `ParserState` - recursive-descent parser for ES2020 scripts and modules
//! - `traversal` - evaluation-order child enumeration and a rewriting visitor

pub mod parser;

pub use parser::base::{NodeIndex, NodeList};
pub use parser::node::*;
pub use parser::state::{ParseOutput, ParserState};
pub use parser::node_access::number_key;
pub use parser::traversal::{Children, VisitAction, children, children_rev, descendants, visit};
