//! Compressor configuration.

use std::fmt;
use std::sync::Arc;

/// Caller hook deciding whether a top-level binding must survive even when
/// unreferenced.
#[derive(Clone)]
pub struct RetainPredicate(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl RetainPredicate {
    pub fn new(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> RetainPredicate {
        RetainPredicate(Arc::new(predicate))
    }

    pub fn retains(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

impl fmt::Debug for RetainPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetainPredicate(..)")
    }
}

#[derive(Clone, Debug)]
pub struct CompressOptions {
    /// Upper bound on analysis/rewrite rounds.
    pub passes: u32,
    /// Treat script top-level bindings as locals.
    pub toplevel: bool,
    pub drop_unused: bool,
    pub dead_code: bool,
    pub reduce_vars: bool,
    pub inline_constants: bool,
    pub retain: Option<RetainPredicate>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            passes: 1,
            toplevel: false,
            drop_unused: true,
            dead_code: true,
            reduce_vars: true,
            inline_constants: true,
            retain: None,
        }
    }
}

impl CompressOptions {
    pub fn retains(&self, name: &str) -> bool {
        self.retain.as_ref().is_some_and(|p| p.retains(name))
    }
}
