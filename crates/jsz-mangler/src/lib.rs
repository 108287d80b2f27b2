//! Name mangling for jsz.
//!
//! This crate provides:
//! - `CharFrequency` / `Alphabet` - the character order names are drawn from
//! - `mangle_names` - shortest collision-free names for every eligible binding
//! - `mangle_properties` - optional renaming of property names
//! - `NameCache` - names carried between runs

pub mod base54;
pub mod mangler;
pub mod name_cache;
pub mod options;
pub mod properties;

pub use base54::{Alphabet, CharFrequency};
pub use mangler::{char_frequency, is_mangleable, mangle_names};
pub use name_cache::{NameCache, NameCacheError};
pub use options::{MangleOptions, NamePredicate, PropertyMangleOptions};
pub use properties::mangle_properties;

#[cfg(test)]
#[path = "../tests/base54_tests.rs"]
mod base54_tests;

#[cfg(test)]
#[path = "../tests/mangler_tests.rs"]
mod mangler_tests;

#[cfg(test)]
#[path = "../tests/properties_tests.rs"]
mod properties_tests;
