//! jsz: a JavaScript minifier.
//!
//! The pipeline parses a script or module, compresses it (constant
//! propagation, unused-binding elimination, dead-branch removal), renames
//! local bindings to short names and prints compact output:
//!
//! ```ignore
//! let output = jsz::minify("input.js", "function f(a){var b=1;return a+b}f(2)", &Default::default())?;
//! ```
//!
//! The stages live in their own crates and are re-exported here.

pub mod minify;
pub mod options;
pub mod tracing_config;

#[cfg(feature = "cli")]
pub mod cli;

pub use jsz_binder as binder;
pub use jsz_compressor as compressor;
pub use jsz_emitter as emitter;
pub use jsz_mangler as mangler;
pub use jsz_parser as parser;

pub use minify::{MinifyError, MinifyOutput, minify};
pub use options::{CompressConfig, MangleConfig, MinifyOptions, NameFilter, OptionsError, PropertiesConfig};
