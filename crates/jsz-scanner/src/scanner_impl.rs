//! Scanner implementation.
//!
//! Works over the UTF-8 bytes of the source and produces the whole token
//! stream up front, so the parser can look ahead arbitrarily (arrow function
//! detection needs it). Regular expression versus division is decided from the
//! previous significant token; template substitutions are tracked with a brace
//! depth stack.

use crate::syntax_kind::{SyntaxKind, is_identifier_part, is_identifier_start, text_to_keyword};
use jsz_common::Span;
use jsz_common::diagnostics::{DiagnosticBag, diagnostic_codes, diagnostic_messages};

/// A scanned token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    /// Identifier name, cooked string/template text, regexp source text, or the
    /// digits of a bigint. Empty for punctuation.
    pub value: String,
    /// Numeric value of a `NumericLiteral`.
    pub number: f64,
    /// Whether a line terminator appeared between this token and the previous.
    pub preceded_by_line_break: bool,
}

impl Token {
    fn new(kind: SyntaxKind, pos: u32, end: u32, preceded_by_line_break: bool) -> Token {
        Token {
            kind,
            pos,
            end,
            value: String::new(),
            number: 0.0,
            preceded_by_line_break,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.pos, self.end)
    }
}

/// Whether a `/` following `last` starts a regular expression literal.
fn slash_is_regexp(last: Option<SyntaxKind>) -> bool {
    match last {
        None => true,
        Some(kind) => !matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::PrivateIdentifier
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateTail
                | SyntaxKind::RegularExpressionLiteral
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
        ),
    }
}

/// JavaScript tokenizer.
pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Brace depth at each open template substitution.
    template_stack: Vec<usize>,
    brace_depth: usize,
    last_kind: Option<SyntaxKind>,
    diagnostics: DiagnosticBag,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            template_stack: Vec::new(),
            brace_depth: 0,
            last_kind: None,
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn with_file_name(source: &'a str, file_name: &str) -> Scanner<'a> {
        let mut scanner = Scanner::new(source);
        scanner.diagnostics = DiagnosticBag::with_file(file_name);
        scanner
    }

    /// Scan the whole source. The last token is always `EndOfFileToken`.
    pub fn tokenize_all(mut self) -> (Vec<Token>, DiagnosticBag) {
        let mut tokens = Vec::with_capacity(self.source.len() / 4 + 1);
        loop {
            let token = self.scan();
            let done = token.kind == SyntaxKind::EndOfFileToken;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    #[inline]
    fn byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn error(&mut self, start: usize, message: &str, code: u32) {
        self.diagnostics
            .error(Span::new(start as u32, self.pos as u32), message, code);
    }

    /// Skip whitespace and comments. Returns whether a line terminator was seen.
    fn skip_trivia(&mut self) -> bool {
        let mut line_break = false;
        if self.pos == 0 && self.source.starts_with("#!") {
            while let Some(c) = self.char() {
                if crate::is_line_terminator(c) {
                    break;
                }
                self.pos += c.len_utf8();
            }
        }
        while let Some(b) = self.byte() {
            match b {
                b' ' | b'\t' | 0x0b | 0x0c => self.pos += 1,
                b'\n' | b'\r' => {
                    line_break = true;
                    self.pos += 1;
                }
                b'/' if self.byte_at(1) == Some(b'/') => {
                    while let Some(c) = self.char() {
                        if crate::is_line_terminator(c) {
                            break;
                        }
                        self.pos += c.len_utf8();
                    }
                }
                b'/' if self.byte_at(1) == Some(b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.source[self.pos..].find("*/") {
                        Some(close) => {
                            let body = &self.source[self.pos..self.pos + close];
                            if body.chars().any(crate::is_line_terminator) {
                                line_break = true;
                            }
                            self.pos += close + 2;
                        }
                        None => {
                            self.pos = self.bytes.len();
                            self.error(
                                start,
                                diagnostic_messages::UNTERMINATED_COMMENT,
                                diagnostic_codes::UNTERMINATED_COMMENT,
                            );
                        }
                    }
                }
                b if b < 0x80 => break,
                _ => match self.char() {
                    Some(c) if crate::is_line_terminator(c) => {
                        line_break = true;
                        self.pos += c.len_utf8();
                    }
                    Some(c) if crate::is_whitespace(c) => self.pos += c.len_utf8(),
                    _ => break,
                },
            }
        }
        line_break
    }

    // =========================================================================
    // Main scan loop
    // =========================================================================

    /// Scan the next token.
    pub fn scan(&mut self) -> Token {
        let line_break = self.skip_trivia();
        let start = self.pos;
        let Some(b) = self.byte() else {
            return Token::new(
                SyntaxKind::EndOfFileToken,
                start as u32,
                start as u32,
                line_break,
            );
        };

        let mut token = match b {
            b'0'..=b'9' => self.scan_number(start),
            b'.' if matches!(self.byte_at(1), Some(b'0'..=b'9')) => self.scan_number(start),
            b'"' | b'\'' => self.scan_string(start, b),
            b'`' => {
                self.pos += 1;
                self.scan_template(start, true)
            }
            b'}' if self.template_stack.last() == Some(&self.brace_depth) => {
                self.template_stack.pop();
                self.pos += 1;
                self.scan_template(start, false)
            }
            b'/' if slash_is_regexp(self.last_kind) => self.scan_regexp(start),
            b'#' => {
                self.pos += 1;
                match self.scan_identifier_name() {
                    Some(name) => {
                        let mut token =
                            Token::new(SyntaxKind::PrivateIdentifier, 0, 0, line_break);
                        token.value = name;
                        token
                    }
                    None => {
                        self.error(
                            start,
                            diagnostic_messages::INVALID_CHARACTER,
                            diagnostic_codes::INVALID_CHARACTER,
                        );
                        Token::new(SyntaxKind::Unknown, 0, 0, line_break)
                    }
                }
            }
            _ => {
                if let Some(kind) = self.scan_punctuation(b) {
                    match kind {
                        SyntaxKind::OpenBraceToken => self.brace_depth += 1,
                        SyntaxKind::CloseBraceToken => {
                            self.brace_depth = self.brace_depth.saturating_sub(1)
                        }
                        _ => {}
                    }
                    Token::new(kind, 0, 0, line_break)
                } else {
                    match self.scan_identifier_name() {
                        Some(name) => {
                            let raw = &self.source[start..self.pos];
                            let kind = if raw == name {
                                text_to_keyword(&name).unwrap_or(SyntaxKind::Identifier)
                            } else {
                                SyntaxKind::Identifier
                            };
                            let mut token = Token::new(kind, 0, 0, line_break);
                            token.value = name;
                            token
                        }
                        None => {
                            let width = self.char().map_or(1, char::len_utf8);
                            self.pos += width;
                            self.error(
                                start,
                                diagnostic_messages::INVALID_CHARACTER,
                                diagnostic_codes::INVALID_CHARACTER,
                            );
                            Token::new(SyntaxKind::Unknown, 0, 0, line_break)
                        }
                    }
                }
            }
        };

        token.pos = start as u32;
        token.end = self.pos as u32;
        token.preceded_by_line_break = line_break;
        if token.kind == SyntaxKind::TemplateHead || token.kind == SyntaxKind::TemplateMiddle {
            self.template_stack.push(self.brace_depth);
        }
        self.last_kind = Some(token.kind);
        token
    }

    fn scan_punctuation(&mut self, b: u8) -> Option<SyntaxKind> {
        let rest = &self.bytes[self.pos..];
        let (kind, len) = match b {
            b'{' => (SyntaxKind::OpenBraceToken, 1),
            b'}' => (SyntaxKind::CloseBraceToken, 1),
            b'(' => (SyntaxKind::OpenParenToken, 1),
            b')' => (SyntaxKind::CloseParenToken, 1),
            b'[' => (SyntaxKind::OpenBracketToken, 1),
            b']' => (SyntaxKind::CloseBracketToken, 1),
            b';' => (SyntaxKind::SemicolonToken, 1),
            b',' => (SyntaxKind::CommaToken, 1),
            b':' => (SyntaxKind::ColonToken, 1),
            b'~' => (SyntaxKind::TildeToken, 1),
            b'.' if rest.starts_with(b"...") => (SyntaxKind::DotDotDotToken, 3),
            b'.' => (SyntaxKind::DotToken, 1),
            b'?' if rest.starts_with(b"??=") => (SyntaxKind::QuestionQuestionEqualsToken, 3),
            b'?' if rest.starts_with(b"??") => (SyntaxKind::QuestionQuestionToken, 2),
            b'?' if rest.starts_with(b"?.") && !matches!(rest.get(2), Some(b'0'..=b'9')) => {
                (SyntaxKind::QuestionDotToken, 2)
            }
            b'?' => (SyntaxKind::QuestionToken, 1),
            b'<' if rest.starts_with(b"<<=") => (SyntaxKind::LessThanLessThanEqualsToken, 3),
            b'<' if rest.starts_with(b"<<") => (SyntaxKind::LessThanLessThanToken, 2),
            b'<' if rest.starts_with(b"<=") => (SyntaxKind::LessThanEqualsToken, 2),
            b'<' => (SyntaxKind::LessThanToken, 1),
            b'>' if rest.starts_with(b">>>=") => (
                SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
                4,
            ),
            b'>' if rest.starts_with(b">>>") => {
                (SyntaxKind::GreaterThanGreaterThanGreaterThanToken, 3)
            }
            b'>' if rest.starts_with(b">>=") => (SyntaxKind::GreaterThanGreaterThanEqualsToken, 3),
            b'>' if rest.starts_with(b">>") => (SyntaxKind::GreaterThanGreaterThanToken, 2),
            b'>' if rest.starts_with(b">=") => (SyntaxKind::GreaterThanEqualsToken, 2),
            b'>' => (SyntaxKind::GreaterThanToken, 1),
            b'=' if rest.starts_with(b"===") => (SyntaxKind::EqualsEqualsEqualsToken, 3),
            b'=' if rest.starts_with(b"==") => (SyntaxKind::EqualsEqualsToken, 2),
            b'=' if rest.starts_with(b"=>") => (SyntaxKind::EqualsGreaterThanToken, 2),
            b'=' => (SyntaxKind::EqualsToken, 1),
            b'!' if rest.starts_with(b"!==") => (SyntaxKind::ExclamationEqualsEqualsToken, 3),
            b'!' if rest.starts_with(b"!=") => (SyntaxKind::ExclamationEqualsToken, 2),
            b'!' => (SyntaxKind::ExclamationToken, 1),
            b'+' if rest.starts_with(b"++") => (SyntaxKind::PlusPlusToken, 2),
            b'+' if rest.starts_with(b"+=") => (SyntaxKind::PlusEqualsToken, 2),
            b'+' => (SyntaxKind::PlusToken, 1),
            b'-' if rest.starts_with(b"--") => (SyntaxKind::MinusMinusToken, 2),
            b'-' if rest.starts_with(b"-=") => (SyntaxKind::MinusEqualsToken, 2),
            b'-' => (SyntaxKind::MinusToken, 1),
            b'*' if rest.starts_with(b"**=") => (SyntaxKind::AsteriskAsteriskEqualsToken, 3),
            b'*' if rest.starts_with(b"**") => (SyntaxKind::AsteriskAsteriskToken, 2),
            b'*' if rest.starts_with(b"*=") => (SyntaxKind::AsteriskEqualsToken, 2),
            b'*' => (SyntaxKind::AsteriskToken, 1),
            b'/' if rest.starts_with(b"/=") => (SyntaxKind::SlashEqualsToken, 2),
            b'/' => (SyntaxKind::SlashToken, 1),
            b'%' if rest.starts_with(b"%=") => (SyntaxKind::PercentEqualsToken, 2),
            b'%' => (SyntaxKind::PercentToken, 1),
            b'&' if rest.starts_with(b"&&=") => (SyntaxKind::AmpersandAmpersandEqualsToken, 3),
            b'&' if rest.starts_with(b"&&") => (SyntaxKind::AmpersandAmpersandToken, 2),
            b'&' if rest.starts_with(b"&=") => (SyntaxKind::AmpersandEqualsToken, 2),
            b'&' => (SyntaxKind::AmpersandToken, 1),
            b'|' if rest.starts_with(b"||=") => (SyntaxKind::BarBarEqualsToken, 3),
            b'|' if rest.starts_with(b"||") => (SyntaxKind::BarBarToken, 2),
            b'|' if rest.starts_with(b"|=") => (SyntaxKind::BarEqualsToken, 2),
            b'|' => (SyntaxKind::BarToken, 1),
            b'^' if rest.starts_with(b"^=") => (SyntaxKind::CaretEqualsToken, 2),
            b'^' => (SyntaxKind::CaretToken, 1),
            _ => return None,
        };
        self.pos += len;
        Some(kind)
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Scan an identifier name (with `\u` escapes decoded). Returns `None` and
    /// consumes nothing if the current character cannot start one.
    fn scan_identifier_name(&mut self) -> Option<String> {
        let mut name = String::new();
        let mut first = true;
        loop {
            match self.char() {
                Some('\\') if self.byte_at(1) == Some(b'u') => {
                    let save = self.pos;
                    self.pos += 2;
                    match self.scan_unicode_escape() {
                        Some(c) if (first && is_identifier_start(c)) || (!first && is_identifier_part(c)) => {
                            name.push(c);
                        }
                        _ => {
                            self.pos = save;
                            break;
                        }
                    }
                }
                Some(c) if (first && is_identifier_start(c)) || (!first && is_identifier_part(c)) => {
                    name.push(c);
                    self.pos += c.len_utf8();
                }
                _ => break,
            }
            first = false;
        }
        if name.is_empty() { None } else { Some(name) }
    }

    /// After `\u`: either `XXXX` or `{X...}`.
    fn scan_unicode_escape(&mut self) -> Option<char> {
        let code = if self.byte() == Some(b'{') {
            let close = self.source[self.pos..].find('}')?;
            let digits = &self.source[self.pos + 1..self.pos + close];
            let code = u32::from_str_radix(digits, 16).ok()?;
            self.pos += close + 1;
            code
        } else {
            let digits = self.source.get(self.pos..self.pos + 4)?;
            let code = u32::from_str_radix(digits, 16).ok()?;
            self.pos += 4;
            code
        };
        if (0xD800..0xDC00).contains(&code) && self.source[self.pos..].starts_with("\\u") {
            let save = self.pos;
            self.pos += 2;
            if let Some(low) = self
                .source
                .get(self.pos..self.pos + 4)
                .and_then(|d| u32::from_str_radix(d, 16).ok())
                && (0xDC00..0xE000).contains(&low)
            {
                self.pos += 4;
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(combined);
            }
            self.pos = save;
        }
        Some(char::from_u32(code).unwrap_or('\u{fffd}'))
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    fn scan_number(&mut self, start: usize) -> Token {
        let radix = match (self.byte(), self.byte_at(1)) {
            (Some(b'0'), Some(b'x' | b'X')) => 16,
            (Some(b'0'), Some(b'o' | b'O')) => 8,
            (Some(b'0'), Some(b'b' | b'B')) => 2,
            _ => 10,
        };

        if radix != 10 {
            self.pos += 2;
            let digits_start = self.pos;
            while matches!(self.byte(), Some(c) if c.is_ascii_hexdigit() || c == b'_') {
                self.pos += 1;
            }
            let digits: String = self.source[digits_start..self.pos]
                .chars()
                .filter(|c| *c != '_')
                .collect();
            if self.byte() == Some(b'n') {
                self.pos += 1;
                let mut token = Token::new(SyntaxKind::BigIntLiteral, 0, 0, false);
                token.value = self.source[start..self.pos - 1].to_string();
                return token;
            }
            let mut token = Token::new(SyntaxKind::NumericLiteral, 0, 0, false);
            token.number = parse_radix(&digits, radix);
            token.value = self.source[start..self.pos].to_string();
            return token;
        }

        // Legacy octal: 0 followed only by octal digits.
        if self.byte() == Some(b'0') && matches!(self.byte_at(1), Some(b'0'..=b'9')) {
            let digits_start = self.pos;
            while matches!(self.byte(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
            let digits = &self.source[digits_start..self.pos];
            let mut token = Token::new(SyntaxKind::NumericLiteral, 0, 0, false);
            token.number = if digits.bytes().all(|c| c < b'8') {
                parse_radix(digits, 8)
            } else {
                digits.parse().unwrap_or(f64::NAN)
            };
            token.value = digits.to_string();
            return token;
        }

        while matches!(self.byte(), Some(b'0'..=b'9' | b'_')) {
            self.pos += 1;
        }
        if self.byte() == Some(b'n') {
            self.pos += 1;
            let mut token = Token::new(SyntaxKind::BigIntLiteral, 0, 0, false);
            token.value = self.source[start..self.pos - 1].replace('_', "");
            return token;
        }
        if self.byte() == Some(b'.') {
            self.pos += 1;
            while matches!(self.byte(), Some(b'0'..=b'9' | b'_')) {
                self.pos += 1;
            }
        }
        if matches!(self.byte(), Some(b'e' | b'E')) {
            let save = self.pos;
            self.pos += 1;
            if matches!(self.byte(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if matches!(self.byte(), Some(b'0'..=b'9')) {
                while matches!(self.byte(), Some(b'0'..=b'9' | b'_')) {
                    self.pos += 1;
                }
            } else {
                self.pos = save;
            }
        }
        let raw = &self.source[start..self.pos];
        let mut token = Token::new(SyntaxKind::NumericLiteral, 0, 0, false);
        token.number = raw.replace('_', "").parse().unwrap_or(f64::NAN);
        token.value = raw.to_string();
        token
    }

    // =========================================================================
    // Strings and templates
    // =========================================================================

    /// Consume one escape sequence after `\` and append its cooked value.
    fn scan_escape(&mut self, out: &mut String) {
        let Some(c) = self.char() else {
            return;
        };
        self.pos += c.len_utf8();
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0'..='7' => {
                let mut code = c as u32 - '0' as u32;
                let max_len = if c <= '3' { 3 } else { 2 };
                let mut len = 1;
                while len < max_len
                    && let Some(d @ b'0'..=b'7') = self.byte()
                {
                    code = code * 8 + (d - b'0') as u32;
                    self.pos += 1;
                    len += 1;
                }
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            'x' => {
                let code = self
                    .source
                    .get(self.pos..self.pos + 2)
                    .and_then(|d| u32::from_str_radix(d, 16).ok());
                match code.and_then(char::from_u32) {
                    Some(ch) => {
                        self.pos += 2;
                        out.push(ch);
                    }
                    None => out.push('x'),
                }
            }
            'u' => match self.scan_unicode_escape() {
                Some(ch) => out.push(ch),
                None => out.push('u'),
            },
            '\r' => {
                if self.byte() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    fn scan_string(&mut self, start: usize, quote: u8) -> Token {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.byte() {
                None | Some(b'\n') | Some(b'\r') => {
                    self.error(
                        start,
                        diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                        diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                    );
                    break;
                }
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.scan_escape(&mut value);
                }
                Some(_) => {
                    if let Some(c) = self.char() {
                        value.push(c);
                        self.pos += c.len_utf8();
                    }
                }
            }
        }
        let mut token = Token::new(SyntaxKind::StringLiteral, 0, 0, false);
        token.value = value;
        token
    }

    /// Scan template characters up to the closing backtick or `${`. `start` is
    /// the position of the opening backtick or closing brace.
    fn scan_template(&mut self, start: usize, is_head: bool) -> Token {
        let mut value = String::new();
        let kind = loop {
            match self.byte() {
                None => {
                    self.error(
                        start,
                        diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
                        diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
                    );
                    break if is_head {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                Some(b'`') => {
                    self.pos += 1;
                    break if is_head {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                Some(b'$') if self.byte_at(1) == Some(b'{') => {
                    self.pos += 2;
                    break if is_head {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.scan_escape(&mut value);
                }
                Some(b'\r') => {
                    self.pos += 1;
                    if self.byte() == Some(b'\n') {
                        self.pos += 1;
                    }
                    value.push('\n');
                }
                Some(_) => {
                    if let Some(c) = self.char() {
                        value.push(c);
                        self.pos += c.len_utf8();
                    }
                }
            }
        };
        let mut token = Token::new(kind, 0, 0, false);
        token.value = value;
        token
    }

    // =========================================================================
    // Regular expressions
    // =========================================================================

    fn scan_regexp(&mut self, start: usize) -> Token {
        self.pos += 1;
        let mut in_class = false;
        loop {
            match self.char() {
                None => {
                    self.error(
                        start,
                        diagnostic_messages::UNTERMINATED_REGULAR_EXPRESSION,
                        diagnostic_codes::UNTERMINATED_REGULAR_EXPRESSION,
                    );
                    break;
                }
                Some(c) if crate::is_line_terminator(c) => {
                    self.error(
                        start,
                        diagnostic_messages::UNTERMINATED_REGULAR_EXPRESSION,
                        diagnostic_codes::UNTERMINATED_REGULAR_EXPRESSION,
                    );
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(c) = self.char()
                        && !crate::is_line_terminator(c)
                    {
                        self.pos += c.len_utf8();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some('/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        while let Some(c) = self.char() {
            if !is_identifier_part(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let mut token = Token::new(SyntaxKind::RegularExpressionLiteral, 0, 0, false);
        token.value = self.source[start..self.pos].to_string();
        token
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().fold(0.0, |acc, c| {
        acc * radix as f64 + c.to_digit(radix).map_or(f64::NAN, |d| d as f64)
    })
}
