//! Names carried between runs so separately minified files agree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Original name -> mangled name, for top-level bindings and properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCache {
    #[serde(default)]
    pub vars: IndexMap<String, String>,
    #[serde(default)]
    pub props: IndexMap<String, String>,
}

#[derive(Debug)]
pub struct NameCacheError(serde_json::Error);

impl fmt::Display for NameCacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid name cache: {}", self.0)
    }
}

impl std::error::Error for NameCacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl NameCache {
    pub fn from_json(text: &str) -> Result<NameCache, NameCacheError> {
        serde_json::from_str(text).map_err(NameCacheError)
    }

    pub fn to_json(&self) -> Result<String, NameCacheError> {
        serde_json::to_string_pretty(self).map_err(NameCacheError)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty() && self.props.is_empty()
    }
}
