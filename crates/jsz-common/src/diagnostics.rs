//! Diagnostic Infrastructure
//!
//! Collects errors and warnings produced while parsing, binding and
//! compressing. Diagnostics carry a byte span; line/column rendering happens
//! at the edges with a [`LineMap`](crate::LineMap).
//!
//! # Code ranges
//!
//! - `1xxx` parse errors
//! - `2xxx` structural (scope) errors
//! - `3xxx` compressor notices (never fatal)

use crate::position::LineMap;
use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Severity
// =============================================================================

/// The severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error = 1,
    Warning = 2,
    Info = 3,
}

impl DiagnosticSeverity {
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DiagnosticSeverity::Error)
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Codes and messages
// =============================================================================

pub mod diagnostic_codes {
    // Parse errors
    pub const UNEXPECTED_TOKEN: u32 = 1001;
    pub const TOKEN_EXPECTED: u32 = 1002;
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1003;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1004;
    pub const UNTERMINATED_REGULAR_EXPRESSION: u32 = 1005;
    pub const UNTERMINATED_COMMENT: u32 = 1006;
    pub const INVALID_CHARACTER: u32 = 1007;
    pub const EXPRESSION_EXPECTED: u32 = 1008;
    pub const IDENTIFIER_EXPECTED: u32 = 1009;
    pub const INVALID_ASSIGNMENT_TARGET: u32 = 1010;
    pub const NESTING_TOO_DEEP: u32 = 1011;

    // Structural errors
    pub const REDECLARATION: u32 = 2001;
    pub const MODULE_ONLY_CONSTRUCT: u32 = 2002;
    pub const UNDEFINED_LABEL: u32 = 2003;
    pub const USE_BEFORE_DECLARATION: u32 = 2004;
    pub const DUPLICATE_LABEL: u32 = 2005;

    // Compressor notices
    pub const DROPPING_UNUSED_VARIABLE: u32 = 3001;
    pub const DROPPING_UNUSED_FUNCTION: u32 = 3002;
    pub const DROPPING_UNUSED_CLASS: u32 = 3003;
    pub const DROPPING_UNUSED_PARAMETER: u32 = 3004;
    pub const SIDE_EFFECTS_IN_UNUSED_INITIALIZER: u32 = 3005;
    pub const DROPPING_VARIABLE_REFERENCED_BY_REMOVED_CODE: u32 = 3006;
    pub const DROPPING_UNREACHABLE_CODE: u32 = 3007;
    pub const DROPPING_DEAD_STORE: u32 = 3008;
    pub const CONDITION_ALWAYS: u32 = 3009;
    pub const DECLARATIONS_IN_UNREACHABLE_CODE: u32 = 3010;
    pub const DROPPING_UNUSED_IMPORT: u32 = 3011;
}

pub mod diagnostic_messages {
    pub const UNEXPECTED_TOKEN: &str = "Unexpected token '{0}'.";
    pub const TOKEN_EXPECTED: &str = "'{0}' expected.";
    pub const UNTERMINATED_STRING_LITERAL: &str = "Unterminated string literal.";
    pub const UNTERMINATED_TEMPLATE_LITERAL: &str = "Unterminated template literal.";
    pub const UNTERMINATED_REGULAR_EXPRESSION: &str = "Unterminated regular expression literal.";
    pub const UNTERMINATED_COMMENT: &str = "'*/' expected.";
    pub const INVALID_CHARACTER: &str = "Invalid character.";
    pub const EXPRESSION_EXPECTED: &str = "Expression expected.";
    pub const IDENTIFIER_EXPECTED: &str = "Identifier expected.";
    pub const INVALID_ASSIGNMENT_TARGET: &str = "Invalid left-hand side in assignment.";
    pub const NESTING_TOO_DEEP: &str = "Expression nesting is too deep.";

    pub const REDECLARATION: &str = "Identifier '{0}' has already been declared.";
    pub const MODULE_ONLY_CONSTRUCT: &str =
        "'{0}' declarations may only appear at the top level of a module.";
    pub const UNDEFINED_LABEL: &str = "Undefined label '{0}'.";
    pub const USE_BEFORE_DECLARATION: &str =
        "Block-scoped variable '{0}' used before its declaration.";
    pub const DUPLICATE_LABEL: &str = "Label '{0}' has already been declared.";

    pub const DROPPING_UNUSED_VARIABLE: &str = "Dropping unused variable '{0}'.";
    pub const DROPPING_UNUSED_FUNCTION: &str = "Dropping unused function '{0}'.";
    pub const DROPPING_UNUSED_CLASS: &str = "Dropping unused class '{0}'.";
    pub const DROPPING_UNUSED_PARAMETER: &str = "Dropping unused function argument '{0}'.";
    pub const SIDE_EFFECTS_IN_UNUSED_INITIALIZER: &str =
        "Side effects in initialization of unused variable '{0}'.";
    pub const DROPPING_VARIABLE_REFERENCED_BY_REMOVED_CODE: &str =
        "Dropping variable '{0}' only referenced by removed code.";
    pub const DROPPING_UNREACHABLE_CODE: &str = "Dropping unreachable code.";
    pub const DROPPING_DEAD_STORE: &str = "Dropping assignment to unused variable '{0}'.";
    pub const CONDITION_ALWAYS: &str = "Condition always {0}.";
    pub const DECLARATIONS_IN_UNREACHABLE_CODE: &str = "Declarations in unreachable code.";
    pub const DROPPING_UNUSED_IMPORT: &str = "Dropping unused import '{0}'.";
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Diagnostic
// =============================================================================

/// A diagnostic message with location, severity, and code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file_name: String,
    pub span: Span,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub code: u32,
}

impl Diagnostic {
    pub fn new(
        file_name: impl Into<String>,
        span: Span,
        message: impl Into<String>,
        severity: DiagnosticSeverity,
        code: u32,
    ) -> Self {
        Diagnostic {
            file_name: file_name.into(),
            span,
            message: message.into(),
            severity,
            code,
        }
    }

    pub fn error(
        file_name: impl Into<String>,
        span: Span,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self::new(file_name, span, message, DiagnosticSeverity::Error, code)
    }

    pub fn warning(
        file_name: impl Into<String>,
        span: Span,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self::new(file_name, span, message, DiagnosticSeverity::Warning, code)
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }

    /// Format as `file:line:col: severity JSZcode: message` (one-based line/col).
    pub fn format(&self, line_map: &LineMap) -> String {
        let pos = line_map.offset_to_position(self.span.start);
        format!(
            "{}:{}:{}: {} JSZ{}: {}",
            self.file_name,
            pos.line + 1,
            pos.column + 1,
            self.severity,
            self.code,
            self.message
        )
    }

    /// Format without position: `severity[JSZcode]: message`.
    pub fn format_simple(&self) -> String {
        format!("{}[JSZ{}]: {}", self.severity, self.code, self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

// =============================================================================
// DiagnosticBag
// =============================================================================

/// A collection of diagnostics for one compilation phase.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    default_file: String,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag::default()
    }

    pub fn with_file(file_name: impl Into<String>) -> Self {
        DiagnosticBag {
            default_file: file_name.into(),
            ..DiagnosticBag::default()
        }
    }

    pub fn default_file(&self) -> &str {
        &self.default_file
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            DiagnosticSeverity::Error => self.error_count += 1,
            DiagnosticSeverity::Warning => self.warning_count += 1,
            DiagnosticSeverity::Info => {}
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, span: Span, message: impl Into<String>, code: u32) {
        let diagnostic = Diagnostic::error(self.default_file.clone(), span, message, code);
        self.add(diagnostic);
    }

    pub fn warning(&mut self, span: Span, message: impl Into<String>, code: u32) {
        let diagnostic = Diagnostic::warning(self.default_file.clone(), span, message, code);
        self.add(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics with the given code.
    pub fn with_code(&self, code: u32) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    /// Move all diagnostics of `other` into this bag.
    pub fn extend(&mut self, other: DiagnosticBag) {
        for diagnostic in other.diagnostics {
            self.add(diagnostic);
        }
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
        self.warning_count = 0;
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
