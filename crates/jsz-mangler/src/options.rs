//! Mangler configuration.

use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// Caller hook over original names, used for keep-names and property
/// filters.
#[derive(Clone)]
pub struct NamePredicate(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl NamePredicate {
    pub fn new(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> NamePredicate {
        NamePredicate(Arc::new(predicate))
    }

    /// Matches every name.
    pub fn any() -> NamePredicate {
        NamePredicate::new(|_| true)
    }

    pub fn matches(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

impl fmt::Debug for NamePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NamePredicate(..)")
    }
}

#[derive(Clone, Debug, Default)]
pub struct MangleOptions {
    /// Rename script top-level bindings too.
    pub mangle_top_level: bool,
    /// Names never generated and never renamed.
    pub reserved: FxHashSet<String>,
    /// Function names to keep.
    pub keep_function_names: Option<NamePredicate>,
    /// Class names to keep.
    pub keep_class_names: Option<NamePredicate>,
}

impl MangleOptions {
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct PropertyMangleOptions {
    /// Property names never renamed.
    pub reserved: FxHashSet<String>,
    /// Leave names that appear quoted anywhere untouched.
    pub keep_quoted: bool,
    /// Only names this accepts are renamed; all of them when unset.
    pub only: Option<NamePredicate>,
}
