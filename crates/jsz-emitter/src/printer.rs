//! Printer state and output helpers.

use jsz_parser::{NodeArena, NodeData, NodeIndex};
use jsz_scanner::is_identifier_part;
use tracing::debug;

// =============================================================================
// Precedence
// =============================================================================

pub(crate) const PREC_SEQUENCE: u8 = 0;
pub(crate) const PREC_ASSIGN: u8 = 1;
pub(crate) const PREC_CONDITIONAL: u8 = 2;
/// Binary operators sit above this base, ordered by their own binding power.
pub(crate) const PREC_BINARY_BASE: u8 = 2;
pub(crate) const PREC_UNARY: u8 = 15;
pub(crate) const PREC_UPDATE: u8 = 16;
pub(crate) const PREC_LHS: u8 = 17;
pub(crate) const PREC_PRIMARY: u8 = 18;

/// Compact JavaScript printer.
pub struct Printer<'a> {
    pub(crate) arena: &'a NodeArena,
    out: String,
    /// A statement ended and still owes its `;`.
    pending_semicolon: bool,
    /// Inside a `for` initializer, where a bare `in` would end the head.
    pub(crate) no_in: bool,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        Printer {
            arena,
            out: String::new(),
            pending_semicolon: false,
            no_in: false,
        }
    }

    /// Print the program rooted at `root`.
    pub fn print(arena: &NodeArena, root: NodeIndex) -> String {
        let mut printer = Printer::new(arena);
        printer.emit_statement(root);
        debug!(bytes = printer.out.len(), "printed");
        printer.finish()
    }

    /// Print a single expression.
    pub fn print_expression(arena: &NodeArena, expression: NodeIndex) -> String {
        let mut printer = Printer::new(arena);
        printer.emit_expression(expression, PREC_SEQUENCE);
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.out
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    /// Write a token, separating it from the previous one when the two
    /// would otherwise run together.
    pub(crate) fn write(&mut self, text: &str) {
        let Some(first) = text.chars().next() else {
            return;
        };
        if self.pending_semicolon {
            self.out.push(';');
            self.pending_semicolon = false;
        }
        if let Some(last) = self.out.chars().next_back()
            && needs_space(last, first)
        {
            self.out.push(' ');
        }
        self.out.push_str(text);
    }

    /// End the current statement; the `;` is written only if more follows.
    pub(crate) fn end_statement(&mut self) {
        self.pending_semicolon = true;
    }

    /// Write a `;` that is part of the syntax, like an empty statement or a
    /// `for` head separator.
    pub(crate) fn write_semicolon(&mut self) {
        self.pending_semicolon = false;
        self.write(";");
    }

    /// `}` closing a statement list: the last statement needs no separator.
    pub(crate) fn close_brace(&mut self) {
        self.pending_semicolon = false;
        self.write("}");
    }

    pub(crate) fn write_name(&mut self, idx: NodeIndex) {
        if let Some(name) = self.arena.name_text(idx) {
            let name = name.to_string();
            self.write(&name);
        }
    }

    /// Print `items` separated by commas.
    pub(crate) fn comma_list(&mut self, items: &[NodeIndex], mut emit: impl FnMut(&mut Self, NodeIndex)) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.write(",");
            }
            emit(self, item);
        }
    }

    // =========================================================================
    // Precedence
    // =========================================================================

    pub(crate) fn precedence(&self, idx: NodeIndex) -> u8 {
        let Some(data) = self.arena.data(idx) else {
            return PREC_PRIMARY;
        };
        match data {
            NodeData::Sequence { .. } => PREC_SEQUENCE,
            NodeData::Assign { .. }
            | NodeData::ArrowFunction(_)
            | NodeData::Yield { .. }
            | NodeData::Spread { .. } => PREC_ASSIGN,
            NodeData::Conditional { .. } => PREC_CONDITIONAL,
            NodeData::Binary { op, .. } => PREC_BINARY_BASE + op.precedence(),
            NodeData::Unary { .. } | NodeData::Await { .. } => PREC_UNARY,
            NodeData::NumericLiteral { value } if value.is_sign_negative() && *value != 0.0 => PREC_UNARY,
            // Spelled `1/0`.
            NodeData::NumericLiteral { value } if value.is_infinite() => PREC_BINARY_BASE + 11,
            NodeData::Update { .. } => PREC_UPDATE,
            NodeData::Call { .. }
            | NodeData::New { .. }
            | NodeData::Member { .. }
            | NodeData::Index { .. }
            | NodeData::TaggedTemplate { .. }
            | NodeData::ImportCall { .. } => PREC_LHS,
            _ => PREC_PRIMARY,
        }
    }

    /// Leftmost token of an expression statement or arrow body that would be
    /// misread as a declaration or block.
    pub(crate) fn starts_ambiguously(&self, idx: NodeIndex, object_too: bool) -> bool {
        let mut current = idx;
        loop {
            let Some(data) = self.arena.data(current) else {
                return false;
            };
            current = match data {
                NodeData::FunctionExpression(_) | NodeData::ClassExpression(_) => return true,
                NodeData::ObjectLiteral { .. } | NodeData::ObjectPattern { .. } => return object_too,
                NodeData::Identifier { name } => return name == "let",
                NodeData::Binary { left, .. } => *left,
                NodeData::Assign { target, .. } => *target,
                NodeData::Conditional { test, .. } => *test,
                NodeData::Sequence { expressions } => match expressions.first() {
                    Some(&first) => first,
                    None => return false,
                },
                NodeData::Call { callee, .. } => *callee,
                NodeData::Member { object, .. } | NodeData::Index { object, .. } => *object,
                NodeData::TaggedTemplate { tag, .. } => *tag,
                NodeData::Update {
                    prefix: false,
                    operand,
                    ..
                } => *operand,
                _ => return false,
            };
        }
    }
}

fn needs_space(last: char, next: char) -> bool {
    let word = |c: char| is_identifier_part(c) || c == '\\';
    (word(last) && word(next))
        || (last == '+' && next == '+')
        || (last == '-' && next == '-')
        || (last == '/' && next == '/')
}
