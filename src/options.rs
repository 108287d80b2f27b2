//! Minifier configuration.
//!
//! [`MinifyOptions`] is what the library and CLI accept. It deserializes
//! from camelCase JSON and converts into the per-stage option structs of
//! the binder, compressor and mangler.

use globset::{Glob, GlobSet, GlobSetBuilder};
use jsz_binder::BinderOptions;
use jsz_common::limits::MAX_COMPRESS_PASSES;
use jsz_compressor::{CompressOptions, RetainPredicate};
use jsz_mangler::{MangleOptions, NameCache, NamePredicate, PropertyMangleOptions};
use jsz_scanner::is_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum OptionsError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    InvalidPasses(u32),
    InvalidReservedName(String),
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::Read { path, source } => {
                write!(f, "cannot read options file '{}': {source}", path.display())
            }
            OptionsError::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid options in '{}': {source}", path.display()),
            OptionsError::Parse { path: None, source } => write!(f, "invalid options: {source}"),
            OptionsError::InvalidPasses(passes) => write!(
                f,
                "compress.passes must be between 1 and {MAX_COMPRESS_PASSES}, got {passes}"
            ),
            OptionsError::InvalidReservedName(name) => {
                write!(f, "reserved name '{name}' is not an identifier")
            }
            OptionsError::InvalidPattern { pattern, source } => {
                write!(f, "invalid name pattern '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptionsError::Read { source, .. } => Some(source),
            OptionsError::Parse { source, .. } => Some(source),
            OptionsError::InvalidPattern { source, .. } => Some(source),
            OptionsError::InvalidPasses(_) | OptionsError::InvalidReservedName(_) => None,
        }
    }
}

// =============================================================================
// Option types
// =============================================================================

/// `true`/`false`, or glob patterns naming the bindings to keep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameFilter {
    All(bool),
    Patterns(Vec<String>),
}

impl Default for NameFilter {
    fn default() -> Self {
        NameFilter::All(false)
    }
}

impl NameFilter {
    pub fn to_predicate(&self) -> Result<Option<NamePredicate>, OptionsError> {
        match self {
            NameFilter::All(false) => Ok(None),
            NameFilter::All(true) => Ok(Some(NamePredicate::any())),
            NameFilter::Patterns(patterns) if patterns.is_empty() => Ok(None),
            NameFilter::Patterns(patterns) => {
                let set = glob_set(patterns)?;
                Ok(Some(NamePredicate::new(move |name| set.is_match(name))))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompressConfig {
    pub enabled: bool,
    pub passes: u32,
    pub toplevel: bool,
    pub drop_unused: bool,
    pub dead_code: bool,
    pub reduce_vars: bool,
    pub inline_constants: bool,
}

impl Default for CompressConfig {
    fn default() -> Self {
        CompressConfig {
            enabled: true,
            passes: 1,
            toplevel: false,
            drop_unused: true,
            dead_code: true,
            reduce_vars: true,
            inline_constants: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertiesConfig {
    pub enabled: bool,
    pub reserved: Vec<String>,
    pub keep_quoted: bool,
    /// Glob patterns; only matching names are renamed.
    pub only: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MangleConfig {
    pub enabled: bool,
    pub properties: PropertiesConfig,
}

impl Default for MangleConfig {
    fn default() -> Self {
        MangleConfig {
            enabled: true,
            properties: PropertiesConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinifyOptions {
    /// The source is an ES module.
    pub module: bool,
    pub treat_eval_as_unknown: bool,
    pub compatibility_mode: bool,
    /// Names never generated and never renamed.
    pub reserved_names: Vec<String>,
    pub mangle_top_level: bool,
    pub keep_function_names: NameFilter,
    pub keep_class_names: NameFilter,
    /// Glob patterns naming top-level bindings that must survive.
    pub retain: Vec<String>,
    /// Programmatic counterpart of `retain`.
    #[serde(skip)]
    pub retain_predicate: Option<RetainPredicate>,
    /// Names from earlier runs; updated in the output.
    pub cache: Option<NameCache>,
    pub compress: CompressConfig,
    pub mangle: MangleConfig,
}

impl MinifyOptions {
    pub fn from_json(text: &str) -> Result<MinifyOptions, OptionsError> {
        let options: MinifyOptions =
            serde_json::from_str(text).map_err(|source| OptionsError::Parse { path: None, source })?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file(path: &Path) -> Result<MinifyOptions, OptionsError> {
        let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let options: MinifyOptions =
            serde_json::from_str(&text).map_err(|source| OptionsError::Parse {
                path: Some(path.to_path_buf()),
                source,
            })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(1..=MAX_COMPRESS_PASSES).contains(&self.compress.passes) {
            return Err(OptionsError::InvalidPasses(self.compress.passes));
        }
        if let Some(name) = self.reserved_names.iter().find(|name| !is_identifier(name)) {
            return Err(OptionsError::InvalidReservedName(name.clone()));
        }
        // Surface bad patterns here rather than halfway through a run.
        self.keep_function_names.to_predicate()?;
        self.keep_class_names.to_predicate()?;
        glob_set(&self.retain)?;
        glob_set(&self.mangle.properties.only)?;
        Ok(())
    }

    pub fn binder_options(&self) -> BinderOptions {
        BinderOptions {
            compatibility_mode: self.compatibility_mode,
            treat_eval_as_unknown: self.treat_eval_as_unknown,
            is_module: self.module,
        }
    }

    pub fn compress_options(&self) -> Result<CompressOptions, OptionsError> {
        let compress = &self.compress;
        Ok(CompressOptions {
            passes: compress.passes,
            toplevel: compress.toplevel,
            drop_unused: compress.drop_unused,
            dead_code: compress.dead_code,
            reduce_vars: compress.reduce_vars,
            inline_constants: compress.inline_constants,
            retain: self.retain_hook()?,
        })
    }

    pub fn mangle_options(&self) -> Result<MangleOptions, OptionsError> {
        Ok(MangleOptions {
            mangle_top_level: self.mangle_top_level,
            reserved: self.reserved_names.iter().cloned().collect(),
            keep_function_names: self.keep_function_names.to_predicate()?,
            keep_class_names: self.keep_class_names.to_predicate()?,
        })
    }

    pub fn property_options(&self) -> Result<PropertyMangleOptions, OptionsError> {
        let properties = &self.mangle.properties;
        let only = if properties.only.is_empty() {
            None
        } else {
            let set = glob_set(&properties.only)?;
            Some(NamePredicate::new(move |name| set.is_match(name)))
        };
        Ok(PropertyMangleOptions {
            reserved: properties.reserved.iter().cloned().collect(),
            keep_quoted: properties.keep_quoted,
            only,
        })
    }

    /// `retain` patterns and `retain_predicate` combined.
    fn retain_hook(&self) -> Result<Option<RetainPredicate>, OptionsError> {
        let patterns = (!self.retain.is_empty())
            .then(|| glob_set(&self.retain))
            .transpose()?;
        Ok(match (patterns, self.retain_predicate.clone()) {
            (None, hook) => hook,
            (Some(set), None) => Some(RetainPredicate::new(move |name| set.is_match(name))),
            (Some(set), Some(hook)) => Some(RetainPredicate::new(move |name| {
                set.is_match(name) || hook.retains(name)
            })),
        })
    }
}

fn glob_set(patterns: &[String]) -> Result<GlobSet, OptionsError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| OptionsError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| OptionsError::InvalidPattern {
        pattern: patterns.join(","),
        source,
    })
}
