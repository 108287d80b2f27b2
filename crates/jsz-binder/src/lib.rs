//! Scope graph construction for jsz.
//!
//! The binder walks a parsed program once to create scopes and declare
//! bindings, then resolves every identifier reference to the binding it
//! denotes. The resulting [`BinderState`] is the shared model the compressor
//! and mangler read and annotate.

pub mod scopes;
pub use scopes::*;

pub mod state;
pub use state::{BindError, BindErrorKind, BinderOptions, BinderState};

mod state_compat;
mod state_declare;
mod state_resolve;

#[cfg(test)]
#[path = "../tests/binder_tests.rs"]
mod binder_tests;
