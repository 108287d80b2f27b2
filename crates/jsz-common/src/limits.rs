//! Centralized limits and thresholds.
//!
//! Shared constants for recursion depths and iteration caps used by the
//! parser, binder, compressor and mangler.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth the parser accepts before reporting
/// `NESTING_TOO_DEEP`. Every tree walk downstream recurses at most this deep.
pub const MAX_PARSE_DEPTH: u32 = 1_000;

// =============================================================================
// Operation Counts
// =============================================================================

/// Upper bound on scope-chain walks; a chain longer than this indicates a
/// corrupted parent link.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;

/// Upper bound on optimization rounds a caller may request.
pub const MAX_COMPRESS_PASSES: u32 = 10;

/// Maximum length of a folded string constant that may be substituted for a
/// read. Longer constants stay behind their binding.
pub const MAX_INLINED_STRING_LENGTH: usize = 256;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Rough ratio of tree nodes to bindings, used to pre-size the binding arena.
pub const NODES_PER_BINDING_ESTIMATE: usize = 8;
