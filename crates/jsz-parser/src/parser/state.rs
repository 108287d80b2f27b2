//! Parser state: token cursor, context flags and error reporting.
//!
//! The scanner produces the whole token vector up front; the parser walks it
//! with an index, which makes look-ahead a matter of peeking further.

use super::base::NodeIndex;
use super::node::{NodeArena, NodeData};
use jsz_common::diagnostics::{DiagnosticBag, diagnostic_codes, diagnostic_messages, format_message};
use jsz_common::limits::MAX_PARSE_DEPTH;
use jsz_common::Span;
use jsz_scanner::{Scanner, SyntaxKind, Token, token_to_text};
use tracing::debug;

pub(crate) const CONTEXT_FLAG_ASYNC: u8 = 1 << 0;
pub(crate) const CONTEXT_FLAG_GENERATOR: u8 = 1 << 1;
pub(crate) const CONTEXT_FLAG_DISALLOW_IN: u8 = 1 << 2;

/// Result of parsing one file.
#[derive(Debug)]
pub struct ParseOutput {
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub diagnostics: DiagnosticBag,
}

/// Recursive-descent JavaScript parser.
pub struct ParserState {
    pub(crate) file_name: String,
    pub(crate) source: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) cursor: usize,
    pub(crate) arena: NodeArena,
    pub(crate) context_flags: u8,
    pub(crate) recursion_depth: u32,
    pub(crate) is_module: bool,
    /// End offset of the last consumed token.
    pub(crate) prev_end: u32,
    pub parse_diagnostics: DiagnosticBag,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        ParserState {
            parse_diagnostics: DiagnosticBag::with_file(file_name.clone()),
            file_name,
            source: source_text,
            tokens: Vec::new(),
            cursor: 0,
            arena: NodeArena::new(),
            context_flags: 0,
            recursion_depth: 0,
            is_module: false,
            prev_end: 0,
        }
    }

    /// Parse as an ES module: top-level `await` is an operator and the root is
    /// marked as a module.
    pub fn set_module(&mut self, is_module: bool) {
        self.is_module = is_module;
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Parse the source and hand back the arena, root and diagnostics.
    pub fn parse(mut self) -> ParseOutput {
        let root = self.parse_source_file();
        ParseOutput {
            arena: self.arena,
            root,
            diagnostics: self.parse_diagnostics,
        }
    }

    /// Tokenize the source. Called once at the start of `parse_source_file`.
    pub(crate) fn tokenize(&mut self) {
        let (tokens, diagnostics) = Scanner::with_file_name(&self.source, &self.file_name).tokenize_all();
        debug!(
            file = %self.file_name,
            tokens = tokens.len(),
            "tokenized source"
        );
        self.arena = NodeArena::with_capacity(tokens.len());
        self.tokens = tokens;
        self.cursor = 0;
        self.parse_diagnostics.extend(diagnostics);
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.cursor.min(last)]
    }

    #[inline]
    pub(crate) fn token_kind(&self) -> SyntaxKind {
        self.tokens
            .get(self.cursor)
            .map_or(SyntaxKind::EndOfFileToken, |t| t.kind)
    }

    #[inline]
    pub(crate) fn peek_kind(&self, offset: usize) -> SyntaxKind {
        self.tokens
            .get(self.cursor + offset)
            .map_or(SyntaxKind::EndOfFileToken, |t| t.kind)
    }

    pub(crate) fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + offset)
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.token().pos
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.token_kind() == kind
    }

    /// Current token is the identifier `word` (contextual keyword check).
    pub(crate) fn is_contextual(&self, word: &str) -> bool {
        let token = self.token();
        token.kind == SyntaxKind::Identifier && token.value == word
    }

    pub(crate) fn is_contextual_at(&self, offset: usize, word: &str) -> bool {
        self.peek_token(offset)
            .is_some_and(|t| t.kind == SyntaxKind::Identifier && t.value == word)
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.token().preceded_by_line_break
    }

    pub(crate) fn next_token(&mut self) {
        if self.cursor < self.tokens.len() {
            self.prev_end = self.tokens[self.cursor].end;
            if self.tokens[self.cursor].kind != SyntaxKind::EndOfFileToken {
                self.cursor += 1;
            }
        }
    }

    /// Consume the current token and return its value.
    pub(crate) fn take_value(&mut self) -> String {
        let at = self.cursor.min(self.tokens.len() - 1);
        let value = std::mem::take(&mut self.tokens[at].value);
        self.next_token();
        value
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report "'x' expected".
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        let text = token_to_text(kind).unwrap_or("token");
        self.parse_error_at_current_token(
            &format_message(diagnostic_messages::TOKEN_EXPECTED, &[text]),
            diagnostic_codes::TOKEN_EXPECTED,
        );
        false
    }

    /// Automatic semicolon insertion.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token_kind(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return;
        }
        if !self.can_parse_semicolon() {
            self.parse_expected(SyntaxKind::SemicolonToken);
        }
    }

    /// Source text between two offsets.
    pub(crate) fn source_slice(&self, start: u32, end: u32) -> &str {
        self.source
            .get(start as usize..end as usize)
            .unwrap_or_default()
    }

    // =========================================================================
    // Context flags
    // =========================================================================

    pub(crate) fn in_context(&self, flag: u8) -> bool {
        self.context_flags & flag != 0
    }

    /// Run `f` with the context flags replaced by `flags`.
    pub(crate) fn with_context<T>(&mut self, flags: u8, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context_flags;
        self.context_flags = flags;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    pub(crate) fn in_await_context(&self) -> bool {
        self.in_context(CONTEXT_FLAG_ASYNC)
    }

    /// Enter one level of recursion; false when the nesting limit is hit.
    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_PARSE_DEPTH {
            self.parse_error_at_current_token(
                diagnostic_messages::NESTING_TOO_DEEP,
                diagnostic_codes::NESTING_TOO_DEEP,
            );
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(crate) fn parse_error_at(&mut self, start: u32, end: u32, message: &str, code: u32) {
        // One error per position keeps cascades out of the output.
        if self
            .parse_diagnostics
            .iter()
            .any(|d| d.span.start == start && d.is_error())
        {
            return;
        }
        self.parse_diagnostics
            .error(Span::new(start, end), message, code);
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &str, code: u32) {
        let (pos, end) = (self.token().pos, self.token().end);
        self.parse_error_at(pos, end, message, code);
    }

    pub(crate) fn error_unexpected_token(&mut self) {
        let text = match token_to_text(self.token_kind()) {
            Some(text) => text.to_string(),
            None if self.is_token(SyntaxKind::EndOfFileToken) => "end of file".to_string(),
            None => self
                .source_slice(self.token().pos, self.token().end)
                .to_string(),
        };
        self.parse_error_at_current_token(
            &format_message(diagnostic_messages::UNEXPECTED_TOKEN, &[&text]),
            diagnostic_codes::UNEXPECTED_TOKEN,
        );
    }

    /// Placeholder for a node that failed to parse.
    pub(crate) fn missing_node(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.arena.add(
            pos,
            pos,
            NodeData::Identifier {
                name: String::new(),
            },
        )
    }

    pub(crate) fn finish(&mut self, start: u32, data: NodeData) -> NodeIndex {
        let end = self.prev_end.max(start);
        self.arena.add(start, end, data)
    }
}
