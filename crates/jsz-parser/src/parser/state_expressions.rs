//! Parser state - expression parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParserState};
use jsz_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use jsz_scanner::{SyntaxKind, token_is_identifier_or_keyword};

fn binary_op_for(kind: SyntaxKind) -> Option<BinaryOp> {
    let op = match kind {
        SyntaxKind::PlusToken => BinaryOp::Add,
        SyntaxKind::MinusToken => BinaryOp::Sub,
        SyntaxKind::AsteriskToken => BinaryOp::Mul,
        SyntaxKind::SlashToken => BinaryOp::Div,
        SyntaxKind::PercentToken => BinaryOp::Mod,
        SyntaxKind::AsteriskAsteriskToken => BinaryOp::Exp,
        SyntaxKind::LessThanLessThanToken => BinaryOp::Shl,
        SyntaxKind::GreaterThanGreaterThanToken => BinaryOp::Shr,
        SyntaxKind::GreaterThanGreaterThanGreaterThanToken => BinaryOp::UShr,
        SyntaxKind::AmpersandToken => BinaryOp::BitAnd,
        SyntaxKind::BarToken => BinaryOp::BitOr,
        SyntaxKind::CaretToken => BinaryOp::BitXor,
        SyntaxKind::EqualsEqualsToken => BinaryOp::Eq,
        SyntaxKind::ExclamationEqualsToken => BinaryOp::NotEq,
        SyntaxKind::EqualsEqualsEqualsToken => BinaryOp::StrictEq,
        SyntaxKind::ExclamationEqualsEqualsToken => BinaryOp::StrictNotEq,
        SyntaxKind::LessThanToken => BinaryOp::Lt,
        SyntaxKind::GreaterThanToken => BinaryOp::Gt,
        SyntaxKind::LessThanEqualsToken => BinaryOp::LtEq,
        SyntaxKind::GreaterThanEqualsToken => BinaryOp::GtEq,
        SyntaxKind::InKeyword => BinaryOp::In,
        SyntaxKind::InstanceOfKeyword => BinaryOp::InstanceOf,
        SyntaxKind::AmpersandAmpersandToken => BinaryOp::And,
        SyntaxKind::BarBarToken => BinaryOp::Or,
        SyntaxKind::QuestionQuestionToken => BinaryOp::Nullish,
        _ => return None,
    };
    Some(op)
}

fn assign_op_for(kind: SyntaxKind) -> Option<AssignOp> {
    let op = match kind {
        SyntaxKind::EqualsToken => AssignOp::Assign,
        SyntaxKind::PlusEqualsToken => AssignOp::Add,
        SyntaxKind::MinusEqualsToken => AssignOp::Sub,
        SyntaxKind::AsteriskEqualsToken => AssignOp::Mul,
        SyntaxKind::SlashEqualsToken => AssignOp::Div,
        SyntaxKind::PercentEqualsToken => AssignOp::Mod,
        SyntaxKind::AsteriskAsteriskEqualsToken => AssignOp::Exp,
        SyntaxKind::LessThanLessThanEqualsToken => AssignOp::Shl,
        SyntaxKind::GreaterThanGreaterThanEqualsToken => AssignOp::Shr,
        SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => AssignOp::UShr,
        SyntaxKind::AmpersandEqualsToken => AssignOp::BitAnd,
        SyntaxKind::BarEqualsToken => AssignOp::BitOr,
        SyntaxKind::CaretEqualsToken => AssignOp::BitXor,
        SyntaxKind::AmpersandAmpersandEqualsToken => AssignOp::And,
        SyntaxKind::BarBarEqualsToken => AssignOp::Or,
        SyntaxKind::QuestionQuestionEqualsToken => AssignOp::Nullish,
        _ => return None,
    };
    Some(op)
}

impl ParserState {
    // =========================================================================
    // Parse Methods - Core Expressions
    // =========================================================================

    /// Comma expression.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let first = self.parse_assignment_expression();
        if !self.is_token(SyntaxKind::CommaToken) {
            return first;
        }
        let mut expressions = vec![first];
        while self.parse_optional(SyntaxKind::CommaToken) {
            expressions.push(self.parse_assignment_expression());
        }
        self.finish(start, NodeData::Sequence { expressions })
    }

    fn with_in_allowed<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.with_context(self.context_flags & !CONTEXT_FLAG_DISALLOW_IN, f)
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            self.next_token();
            return self.missing_node();
        }
        let result = self.parse_assignment_expression_worker();
        self.exit_recursion();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if let Some(is_async) = self.look_ahead_is_arrow_function() {
            return self.parse_arrow_function(is_async);
        }
        if self.in_context(CONTEXT_FLAG_GENERATOR) && self.is_contextual("yield") {
            return self.parse_yield_expression();
        }

        let start = self.token_pos();
        let left = self.parse_conditional_expression();
        let Some(op) = assign_op_for(self.token_kind()) else {
            return left;
        };
        let target = if op == AssignOp::Assign {
            self.to_assignment_target(left)
        } else {
            self.check_simple_assignment_target(left);
            left
        };
        self.next_token();
        let value = self.parse_assignment_expression();
        self.finish(start, NodeData::Assign { op, target, value })
    }

    fn parse_yield_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        if self.has_preceding_line_break() {
            return self.finish(
                start,
                NodeData::Yield {
                    argument: NodeIndex::NONE,
                    delegate: false,
                },
            );
        }
        let delegate = self.parse_optional(SyntaxKind::AsteriskToken);
        let argument = if !delegate
            && matches!(
                self.token_kind(),
                SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::EndOfFileToken
            ) {
            NodeIndex::NONE
        } else {
            self.parse_assignment_expression()
        };
        self.finish(start, NodeData::Yield { argument, delegate })
    }

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let test = self.parse_binary_expression(1);
        if !self.parse_optional(SyntaxKind::QuestionToken) {
            return test;
        }
        let consequent = self.with_in_allowed(|p| p.parse_assignment_expression());
        self.parse_expected(SyntaxKind::ColonToken);
        let alternate = self.parse_assignment_expression();
        self.finish(
            start,
            NodeData::Conditional {
                test,
                consequent,
                alternate,
            },
        )
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let start = self.token_pos();
        let mut left = self.parse_unary_expression();
        loop {
            let Some(op) = binary_op_for(self.token_kind()) else {
                break;
            };
            if op == BinaryOp::In && self.in_context(CONTEXT_FLAG_DISALLOW_IN) {
                break;
            }
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.next_token();
            let next_min = if op.is_right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary_expression(next_min);
            left = self.finish(start, NodeData::Binary { op, left, right });
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let op = match self.token_kind() {
            SyntaxKind::ExclamationToken => Some(UnaryOp::Not),
            SyntaxKind::MinusToken => Some(UnaryOp::Minus),
            SyntaxKind::PlusToken => Some(UnaryOp::Plus),
            SyntaxKind::TildeToken => Some(UnaryOp::BitNot),
            SyntaxKind::TypeOfKeyword => Some(UnaryOp::TypeOf),
            SyntaxKind::VoidKeyword => Some(UnaryOp::Void),
            SyntaxKind::DeleteKeyword => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            if !self.enter_recursion() {
                return self.missing_node();
            }
            self.next_token();
            let operand = self.parse_unary_expression();
            self.exit_recursion();
            return self.finish(start, NodeData::Unary { op, operand });
        }

        if matches!(
            self.token_kind(),
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) {
            let op = if self.is_token(SyntaxKind::PlusPlusToken) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.next_token();
            let operand = self.parse_unary_expression();
            self.check_simple_assignment_target(operand);
            return self.finish(
                start,
                NodeData::Update {
                    op,
                    prefix: true,
                    operand,
                },
            );
        }

        if self.in_await_context() && self.is_contextual("await") {
            self.next_token();
            let argument = self.parse_unary_expression();
            return self.finish(start, NodeData::Await { argument });
        }

        let operand = self.parse_left_hand_side_expression();
        if matches!(
            self.token_kind(),
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) && !self.has_preceding_line_break()
        {
            let op = if self.is_token(SyntaxKind::PlusPlusToken) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.check_simple_assignment_target(operand);
            self.next_token();
            return self.finish(
                start,
                NodeData::Update {
                    op,
                    prefix: false,
                    operand,
                },
            );
        }
        operand
    }

    // =========================================================================
    // Left-hand side expressions
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_member_and_call_tail(start, expression, true)
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        if self.parse_optional(SyntaxKind::DotToken) {
            if !self.is_contextual("target") {
                self.error_unexpected_token();
            }
            self.next_token();
            return self.finish(
                start,
                NodeData::MetaProperty {
                    meta: "new",
                    property: "target",
                },
            );
        }
        let callee_start = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let callee = self.parse_member_and_call_tail(callee_start, callee, false);
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_arguments()
        } else {
            Vec::new()
        };
        self.finish(start, NodeData::New { callee, arguments })
    }

    fn parse_member_and_call_tail(
        &mut self,
        start: u32,
        mut expression: NodeIndex,
        allow_call: bool,
    ) -> NodeIndex {
        loop {
            match self.token_kind() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let property = self.parse_member_name();
                    expression = self.finish(
                        start,
                        NodeData::Member {
                            object: expression,
                            property,
                            optional: false,
                        },
                    );
                }
                SyntaxKind::QuestionDotToken if allow_call => {
                    self.next_token();
                    expression = match self.token_kind() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_arguments();
                            self.finish(
                                start,
                                NodeData::Call {
                                    callee: expression,
                                    arguments,
                                    optional: true,
                                },
                            )
                        }
                        SyntaxKind::OpenBracketToken => {
                            let index = self.parse_index_expression();
                            self.finish(
                                start,
                                NodeData::Index {
                                    object: expression,
                                    index,
                                    optional: true,
                                },
                            )
                        }
                        _ => {
                            let property = self.parse_member_name();
                            self.finish(
                                start,
                                NodeData::Member {
                                    object: expression,
                                    property,
                                    optional: true,
                                },
                            )
                        }
                    };
                }
                SyntaxKind::OpenBracketToken => {
                    let index = self.parse_index_expression();
                    expression = self.finish(
                        start,
                        NodeData::Index {
                            object: expression,
                            index,
                            optional: false,
                        },
                    );
                }
                SyntaxKind::OpenParenToken if allow_call => {
                    let arguments = self.parse_arguments();
                    expression = self.finish(
                        start,
                        NodeData::Call {
                            callee: expression,
                            arguments,
                            optional: false,
                        },
                    );
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    let quasi = self.parse_template_literal();
                    expression = self.finish(
                        start,
                        NodeData::TaggedTemplate {
                            tag: expression,
                            quasi,
                        },
                    );
                }
                _ => break,
            }
        }
        expression
    }

    fn parse_index_expression(&mut self) -> NodeIndex {
        self.next_token();
        let index = self.with_in_allowed(|p| p.parse_expression());
        self.parse_expected(SyntaxKind::CloseBracketToken);
        index
    }

    /// Name after `.` or `?.`.
    fn parse_member_name(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.is_token(SyntaxKind::PrivateIdentifier) {
            let name = self.take_value();
            return self.finish(start, NodeData::PrivateName { name });
        }
        if token_is_identifier_or_keyword(self.token_kind()) {
            let name = self.take_value();
            return self.finish(start, NodeData::PropertyIdentifier { name });
        }
        self.parse_error_at_current_token(
            diagnostic_messages::IDENTIFIER_EXPECTED,
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
        self.missing_node()
    }

    pub(crate) fn parse_arguments(&mut self) -> NodeList {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let mut arguments = Vec::new();
        self.with_in_allowed(|p| {
            while !p.is_token(SyntaxKind::CloseParenToken) && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                arguments.push(p.parse_spread_or_assignment());
                if !p.is_token(SyntaxKind::CloseParenToken)
                    && !p.parse_expected(SyntaxKind::CommaToken)
                {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseParenToken);
        arguments
    }

    fn parse_spread_or_assignment(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            let start = self.token_pos();
            self.next_token();
            let expression = self.parse_assignment_expression();
            return self.finish(start, NodeData::Spread { expression });
        }
        self.parse_assignment_expression()
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token_kind() {
            SyntaxKind::Identifier if self.look_ahead_is_async_function() => {
                self.next_token();
                self.parse_function_expression(start, true)
            }
            SyntaxKind::Identifier => {
                let name = self.take_value();
                self.finish(start, NodeData::Identifier { name })
            }
            SyntaxKind::FunctionKeyword => self.parse_function_expression(start, false),
            SyntaxKind::ClassKeyword => {
                let data = self.parse_class_rest(false);
                self.finish(start, NodeData::ClassExpression(data))
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                self.finish(start, NodeData::This)
            }
            SyntaxKind::SuperKeyword => {
                self.next_token();
                self.finish(start, NodeData::Super)
            }
            SyntaxKind::NullKeyword => {
                self.next_token();
                self.finish(start, NodeData::NullLiteral)
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let value = self.is_token(SyntaxKind::TrueKeyword);
                self.next_token();
                self.finish(start, NodeData::BooleanLiteral { value })
            }
            SyntaxKind::NumericLiteral => {
                let value = self.token().number;
                self.next_token();
                self.finish(start, NodeData::NumericLiteral { value })
            }
            SyntaxKind::BigIntLiteral => {
                let digits = self.take_value();
                self.finish(start, NodeData::BigIntLiteral { digits })
            }
            SyntaxKind::StringLiteral => {
                let value = self.take_value();
                self.finish(start, NodeData::StringLiteral { value })
            }
            SyntaxKind::RegularExpressionLiteral => {
                let raw = self.take_value();
                self.finish(start, NodeData::RegExpLiteral { raw })
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_literal()
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.with_in_allowed(|p| p.parse_expression());
                self.parse_expected(SyntaxKind::CloseParenToken);
                expression
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::ImportKeyword => {
                self.next_token();
                if self.parse_optional(SyntaxKind::DotToken) {
                    if !self.is_contextual("meta") {
                        self.error_unexpected_token();
                    }
                    self.next_token();
                    return self.finish(
                        start,
                        NodeData::MetaProperty {
                            meta: "import",
                            property: "meta",
                        },
                    );
                }
                self.parse_expected(SyntaxKind::OpenParenToken);
                let argument = self.with_in_allowed(|p| p.parse_assignment_expression());
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.finish(start, NodeData::ImportCall { argument })
            }
            _ => {
                self.parse_error_at_current_token(
                    diagnostic_messages::EXPRESSION_EXPECTED,
                    diagnostic_codes::EXPRESSION_EXPECTED,
                );
                self.missing_node()
            }
        }
    }

    fn parse_function_expression(&mut self, start: u32, is_async: bool) -> NodeIndex {
        let data = self.parse_function_rest(is_async, false);
        self.finish(start, NodeData::FunctionExpression(data))
    }

    fn parse_array_literal(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        self.with_in_allowed(|p| {
            while !p.is_token(SyntaxKind::CloseBracketToken)
                && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                if p.parse_optional(SyntaxKind::CommaToken) {
                    elements.push(NodeIndex::NONE);
                    continue;
                }
                elements.push(p.parse_spread_or_assignment());
                if !p.is_token(SyntaxKind::CloseBracketToken)
                    && !p.parse_expected(SyntaxKind::CommaToken)
                {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.finish(start, NodeData::ArrayLiteral { elements })
    }

    fn parse_object_literal(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let mut properties = Vec::new();
        self.with_in_allowed(|p| {
            while !p.is_token(SyntaxKind::CloseBraceToken) && !p.is_token(SyntaxKind::EndOfFileToken)
            {
                if p.is_token(SyntaxKind::DotDotDotToken) {
                    properties.push(p.parse_spread_or_assignment());
                } else {
                    properties.push(p.parse_object_property());
                }
                if !p.is_token(SyntaxKind::CloseBraceToken)
                    && !p.parse_expected(SyntaxKind::CommaToken)
                {
                    break;
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish(start, NodeData::ObjectLiteral { properties })
    }

    fn parse_object_property(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let (is_async, is_generator, accessor) = self.parse_method_modifiers();
        let (key, computed) = self.parse_property_name();

        if self.is_token(SyntaxKind::OpenParenToken) {
            let value = self.parse_method_function(is_async, is_generator);
            return self.finish(
                start,
                NodeData::Property {
                    key,
                    value,
                    kind: accessor.unwrap_or(PropertyKind::Method),
                    computed,
                },
            );
        }

        if self.parse_optional(SyntaxKind::ColonToken) {
            let value = self.parse_assignment_expression();
            return self.finish(
                start,
                NodeData::Property {
                    key,
                    value,
                    kind: PropertyKind::Init,
                    computed,
                },
            );
        }

        // Shorthand `{a}` or cover grammar `{a = 1}` for destructuring.
        let name = match self.arena.data(key) {
            Some(NodeData::PropertyIdentifier { name }) if !computed => name.clone(),
            _ => {
                self.parse_expected(SyntaxKind::ColonToken);
                String::new()
            }
        };
        let mut value = self.arena.add_like(key, NodeData::Identifier { name });
        if self.parse_optional(SyntaxKind::EqualsToken) {
            let default = self.parse_assignment_expression();
            value = self.finish(
                start,
                NodeData::Assign {
                    op: AssignOp::Assign,
                    target: value,
                    value: default,
                },
            );
        }
        self.finish(
            start,
            NodeData::Property {
                key,
                value,
                kind: PropertyKind::Shorthand,
                computed: false,
            },
        )
    }

    fn is_property_name_terminator(&self, offset: usize) -> bool {
        matches!(
            self.peek_kind(offset),
            SyntaxKind::OpenParenToken
                | SyntaxKind::ColonToken
                | SyntaxKind::CommaToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::EndOfFileToken
        )
    }

    /// `async`, `*`, `get`, `set` prefixes of methods and accessors.
    pub(crate) fn parse_method_modifiers(&mut self) -> (bool, bool, Option<PropertyKind>) {
        let mut is_async = false;
        let mut is_generator = false;
        let mut accessor = None;
        if self.is_contextual("async")
            && !self.is_property_name_terminator(1)
            && !self.peek_token(1).is_some_and(|t| t.preceded_by_line_break)
        {
            self.next_token();
            is_async = true;
        }
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            is_generator = true;
        }
        if !is_async && !is_generator && !self.is_property_name_terminator(1) {
            if self.is_contextual("get") {
                accessor = Some(PropertyKind::Get);
            } else if self.is_contextual("set") {
                accessor = Some(PropertyKind::Set);
            }
            if accessor.is_some() {
                self.next_token();
            }
        }
        (is_async, is_generator, accessor)
    }

    /// Object or class key. Returns the key node and whether it is computed.
    pub(crate) fn parse_property_name(&mut self) -> (NodeIndex, bool) {
        let start = self.token_pos();
        match self.token_kind() {
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let expression = self.with_in_allowed(|p| p.parse_assignment_expression());
                self.parse_expected(SyntaxKind::CloseBracketToken);
                (expression, true)
            }
            SyntaxKind::StringLiteral => {
                let value = self.take_value();
                (self.finish(start, NodeData::StringLiteral { value }), false)
            }
            SyntaxKind::NumericLiteral => {
                let value = self.token().number;
                self.next_token();
                (self.finish(start, NodeData::NumericLiteral { value }), false)
            }
            SyntaxKind::BigIntLiteral => {
                let digits = self.take_value();
                (self.finish(start, NodeData::BigIntLiteral { digits }), false)
            }
            SyntaxKind::PrivateIdentifier => {
                let name = self.take_value();
                (self.finish(start, NodeData::PrivateName { name }), false)
            }
            kind if token_is_identifier_or_keyword(kind) => {
                let name = self.take_value();
                (
                    self.finish(start, NodeData::PropertyIdentifier { name }),
                    false,
                )
            }
            _ => {
                self.parse_error_at_current_token(
                    diagnostic_messages::IDENTIFIER_EXPECTED,
                    diagnostic_codes::IDENTIFIER_EXPECTED,
                );
                (self.missing_node(), false)
            }
        }
    }

    /// Parameters and body of a method; the result is an anonymous
    /// `FunctionExpression`.
    pub(crate) fn parse_method_function(&mut self, is_async: bool, is_generator: bool) -> NodeIndex {
        let start = self.token_pos();
        let mut flags = 0;
        if is_async {
            flags |= CONTEXT_FLAG_ASYNC;
        }
        if is_generator {
            flags |= CONTEXT_FLAG_GENERATOR;
        }
        let (params, body) = self.with_context(flags, |p| {
            let params = p.parse_parameter_list();
            let body = p.parse_block();
            (params, body)
        });
        self.finish(
            start,
            NodeData::FunctionExpression(FunctionData {
                name: NodeIndex::NONE,
                params,
                body,
                is_async,
                is_generator,
                expression_body: false,
            }),
        )
    }

    fn parse_template_literal(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.is_token(SyntaxKind::NoSubstitutionTemplateLiteral) {
            let raw = self.template_raw(1);
            self.next_token();
            return self.finish(
                start,
                NodeData::TemplateLiteral {
                    quasis: vec![raw],
                    expressions: Vec::new(),
                },
            );
        }

        let mut quasis = vec![self.template_raw(2)];
        let mut expressions = Vec::new();
        self.next_token();
        loop {
            expressions.push(self.with_in_allowed(|p| p.parse_expression()));
            match self.token_kind() {
                SyntaxKind::TemplateMiddle => {
                    quasis.push(self.template_raw(2));
                    self.next_token();
                }
                SyntaxKind::TemplateTail => {
                    quasis.push(self.template_raw(1));
                    self.next_token();
                    break;
                }
                _ => {
                    self.parse_expected(SyntaxKind::CloseBraceToken);
                    quasis.push(String::new());
                    break;
                }
            }
        }
        self.finish(
            start,
            NodeData::TemplateLiteral {
                quasis,
                expressions,
            },
        )
    }

    /// Raw text of the current template token without its one-character
    /// opener and `close`-character terminator.
    fn template_raw(&self, close: u32) -> String {
        let token = self.token();
        let start = token.pos + 1;
        let mut end = token.end.saturating_sub(close).max(start);
        // An unterminated template has no closing delimiter to strip.
        if !self.source_slice(token.pos, token.end).ends_with('`')
            && matches!(
                token.kind,
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateTail
            )
        {
            end = token.end;
        }
        self.source_slice(start, end).to_string()
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// `Some(is_async)` when an arrow function starts at the current token.
    fn look_ahead_is_arrow_function(&self) -> Option<bool> {
        let arrow_at = |offset: usize| {
            self.peek_token(offset).is_some_and(|t| {
                t.kind == SyntaxKind::EqualsGreaterThanToken && !t.preceded_by_line_break
            })
        };
        match self.token_kind() {
            SyntaxKind::Identifier if self.is_contextual("async") => {
                let next = self.peek_token(1)?;
                if next.preceded_by_line_break {
                    return arrow_at(1).then_some(false);
                }
                match next.kind {
                    SyntaxKind::Identifier if arrow_at(2) => Some(true),
                    SyntaxKind::OpenParenToken => {
                        let close = self.matching_paren_offset(1)?;
                        arrow_at(close + 1).then_some(true)
                    }
                    _ => arrow_at(1).then_some(false),
                }
            }
            SyntaxKind::Identifier => arrow_at(1).then_some(false),
            SyntaxKind::OpenParenToken => {
                let close = self.matching_paren_offset(0)?;
                arrow_at(close + 1).then_some(false)
            }
            _ => None,
        }
    }

    /// Offset of the `)` matching the `(` at `open`.
    fn matching_paren_offset(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut offset = open;
        loop {
            match self.peek_kind(offset) {
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::TemplateHead => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::TemplateTail => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return (self.peek_kind(offset) == SyntaxKind::CloseParenToken)
                            .then_some(offset);
                    }
                }
                SyntaxKind::EndOfFileToken => return None,
                _ => {}
            }
            offset += 1;
        }
    }

    fn parse_arrow_function(&mut self, is_async: bool) -> NodeIndex {
        let start = self.token_pos();
        if is_async {
            self.next_token();
        }
        let outer_flags = self.context_flags;
        let mut flags = 0;
        if is_async {
            flags |= CONTEXT_FLAG_ASYNC;
        }
        let params = if self.is_token(SyntaxKind::Identifier) {
            vec![self.parse_binding_identifier()]
        } else {
            self.with_context(flags, |p| p.parse_parameter_list())
        };
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let (body, expression_body) = if self.is_token(SyntaxKind::OpenBraceToken) {
            (self.with_context(flags, |p| p.parse_block()), false)
        } else {
            let body_flags = flags | (outer_flags & CONTEXT_FLAG_DISALLOW_IN);
            (
                self.with_context(body_flags, |p| p.parse_assignment_expression()),
                true,
            )
        };
        self.finish(
            start,
            NodeData::ArrowFunction(FunctionData {
                name: NodeIndex::NONE,
                params,
                body,
                is_async,
                is_generator: false,
                expression_body,
            }),
        )
    }

    // =========================================================================
    // Assignment targets
    // =========================================================================

    fn check_simple_assignment_target(&mut self, target: NodeIndex) {
        if !matches!(
            self.arena.data(target),
            Some(NodeData::Identifier { .. } | NodeData::Member { .. } | NodeData::Index { .. })
        ) {
            let (pos, end) = self
                .arena
                .get(target)
                .map_or((0, 0), |n| (n.pos, n.end));
            self.parse_error_at(
                pos,
                end,
                diagnostic_messages::INVALID_ASSIGNMENT_TARGET,
                diagnostic_codes::INVALID_ASSIGNMENT_TARGET,
            );
        }
    }

    /// Reinterpret an expression parsed with the cover grammar as an
    /// assignment target, converting literals to patterns in place.
    pub(crate) fn to_assignment_target(&mut self, expression: NodeIndex) -> NodeIndex {
        let Some(data) = self.arena.data(expression).cloned() else {
            return expression;
        };
        let converted = match data {
            NodeData::Identifier { .. }
            | NodeData::Member { .. }
            | NodeData::Index { .. }
            | NodeData::VariableStatement { .. }
            | NodeData::ArrayPattern { .. }
            | NodeData::ObjectPattern { .. }
            | NodeData::AssignmentPattern { .. }
            | NodeData::Rest { .. } => return expression,
            NodeData::ArrayLiteral { elements } => {
                let elements = elements
                    .into_iter()
                    .map(|element| {
                        if element.is_none() {
                            element
                        } else {
                            self.to_binding_element(element)
                        }
                    })
                    .collect();
                NodeData::ArrayPattern { elements }
            }
            NodeData::ObjectLiteral { properties } => {
                for &property in &properties {
                    match self.arena.data(property).cloned() {
                        Some(NodeData::Property {
                            key,
                            value,
                            kind,
                            computed,
                        }) => {
                            let value = self.to_binding_element(value);
                            self.arena.replace(
                                property,
                                NodeData::Property {
                                    key,
                                    value,
                                    kind,
                                    computed,
                                },
                            );
                        }
                        Some(NodeData::Spread { .. }) => {
                            self.to_binding_element(property);
                        }
                        _ => {}
                    }
                }
                NodeData::ObjectPattern { properties }
            }
            _ => {
                self.check_simple_assignment_target(expression);
                return expression;
            }
        };
        self.arena.replace(expression, converted);
        expression
    }

    /// Pattern element: handles `x = default` and `...rest` on top of
    /// [`to_assignment_target`](Self::to_assignment_target).
    fn to_binding_element(&mut self, element: NodeIndex) -> NodeIndex {
        match self.arena.data(element).cloned() {
            Some(NodeData::Assign {
                op: AssignOp::Assign,
                target,
                value,
            }) => {
                let target = self.to_assignment_target(target);
                self.arena.replace(
                    element,
                    NodeData::AssignmentPattern {
                        target,
                        default: value,
                    },
                );
                element
            }
            Some(NodeData::Spread { expression }) => {
                let argument = self.to_assignment_target(expression);
                self.arena.replace(element, NodeData::Rest { argument });
                element
            }
            _ => self.to_assignment_target(element),
        }
    }
}
