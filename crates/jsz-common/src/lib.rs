//! Common types and utilities for the jsz minifier.
//!
//! This crate provides foundational types used across all jsz crates:
//! - Source spans (`Span`, `Spanned`)
//! - Position/line-map types for line/column reporting
//! - Diagnostics (`Diagnostic`, `DiagnosticBag`, codes and messages)
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Position/LineMap types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostics shared by the parser, binder and compressor
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticSeverity};

// Centralized limits and thresholds
pub mod limits;
