//! Parser state - statement and declaration parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParserState};
use jsz_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use jsz_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Source file
    // =========================================================================

    /// Parse a source file
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.tokenize();
        if self.is_module {
            self.context_flags |= CONTEXT_FLAG_ASYNC;
        }

        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.cursor;
            if self.is_token(SyntaxKind::CloseBraceToken) {
                self.error_unexpected_token();
                self.next_token();
                continue;
            }
            let statement = self.parse_statement();
            statements.push(statement);
            if self.cursor == before {
                // No progress: skip the offending token.
                self.next_token();
            }
        }

        let end = self.source.len() as u32;
        self.arena.add(
            0,
            end,
            NodeData::SourceFile {
                statements,
                is_module: self.is_module,
            },
        )
    }

    /// Parse statements up to a closing brace.
    pub(crate) fn parse_statements(&mut self) -> NodeList {
        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.cursor;
            statements.push(self.parse_statement());
            if self.cursor == before {
                self.next_token();
            }
        }
        statements
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            self.next_token();
            return self.missing_node();
        }
        let statement = self.parse_statement_worker();
        self.exit_recursion();
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        match self.token_kind() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => self.parse_empty_statement(),
            SyntaxKind::VarKeyword => self.parse_variable_statement(VarKind::Var),
            SyntaxKind::ConstKeyword => self.parse_variable_statement(VarKind::Const),
            SyntaxKind::Identifier if self.look_ahead_is_let_declaration() => {
                self.parse_variable_statement(VarKind::Let)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(false),
            SyntaxKind::Identifier if self.look_ahead_is_async_function() => {
                self.next_token();
                self.parse_function_declaration(true)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ContinueKeyword | SyntaxKind::BreakKeyword => {
                self.parse_break_or_continue_statement()
            }
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::DebuggerKeyword => {
                let start = self.token_pos();
                self.next_token();
                self.parse_semicolon();
                self.finish(start, NodeData::Debugger)
            }
            SyntaxKind::ImportKeyword
                if !matches!(
                    self.peek_kind(1),
                    SyntaxKind::OpenParenToken | SyntaxKind::DotToken
                ) =>
            {
                self.parse_import_declaration()
            }
            SyntaxKind::ExportKeyword => self.parse_export_declaration(),
            SyntaxKind::Identifier if self.peek_kind(1) == SyntaxKind::ColonToken => {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    pub(crate) fn look_ahead_is_let_declaration(&self) -> bool {
        self.is_contextual("let")
            && matches!(
                self.peek_kind(1),
                SyntaxKind::Identifier | SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken
            )
    }

    pub(crate) fn look_ahead_is_async_function(&self) -> bool {
        self.is_contextual("async")
            && self.peek_kind(1) == SyntaxKind::FunctionKeyword
            && self
                .peek_token(1)
                .is_some_and(|t| !t.preceded_by_line_break)
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statements();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish(start, NodeData::Block { statements })
    }

    fn parse_empty_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        self.finish(start, NodeData::Empty)
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expression = self.parse_expression();
        self.parse_semicolon();
        self.finish(start, NodeData::ExpressionStatement { expression })
    }

    fn parse_labeled_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let name = self.take_value();
        let label = self.finish(start, NodeData::LabelIdentifier { name });
        self.parse_expected(SyntaxKind::ColonToken);
        let body = self.parse_statement();
        self.finish(start, NodeData::Labeled { label, body })
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn parse_variable_statement(&mut self, kind: VarKind) -> NodeIndex {
        let start = self.token_pos();
        let statement = self.parse_variable_declaration_list(kind);
        self.parse_semicolon();
        if let Some(node) = self.arena.get_mut(statement) {
            node.pos = start;
            node.end = self.prev_end;
        }
        statement
    }

    /// `var a = 1, b` without the trailing semicolon. Used for statements and
    /// `for` heads.
    pub(crate) fn parse_variable_declaration_list(&mut self, kind: VarKind) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.token_pos();
            let name = self.parse_binding_target();
            let init = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            declarations.push(self.finish(decl_start, NodeData::VariableDeclarator { name, init }));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.finish(start, NodeData::VariableStatement { kind, declarations })
    }

    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// Identifier, array pattern or object pattern.
    pub(crate) fn parse_binding_target(&mut self) -> NodeIndex {
        match self.token_kind() {
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            _ => self.parse_binding_identifier(),
        }
    }

    pub(crate) fn parse_binding_identifier(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.is_token(SyntaxKind::Identifier) {
            let name = self.take_value();
            return self.finish(start, NodeData::Identifier { name });
        }
        self.parse_error_at_current_token(
            diagnostic_messages::IDENTIFIER_EXPECTED,
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
        self.missing_node()
    }

    /// Binding target with an optional `= default`.
    pub(crate) fn parse_binding_element(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let target = self.parse_binding_target();
        if self.parse_optional(SyntaxKind::EqualsToken) {
            let default = self.with_context(
                self.context_flags & !CONTEXT_FLAG_DISALLOW_IN,
                |p| p.parse_assignment_expression(),
            );
            return self.finish(start, NodeData::AssignmentPattern { target, default });
        }
        target
    }

    fn parse_rest_element(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let argument = self.parse_binding_target();
        self.finish(start, NodeData::Rest { argument })
    }

    fn parse_array_binding_pattern(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::CommaToken) {
                elements.push(NodeIndex::NONE);
                continue;
            }
            if self.is_token(SyntaxKind::DotDotDotToken) {
                elements.push(self.parse_rest_element());
            } else {
                elements.push(self.parse_binding_element());
            }
            if !self.is_token(SyntaxKind::CloseBracketToken) {
                self.parse_expected(SyntaxKind::CommaToken);
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.finish(start, NodeData::ArrayPattern { elements })
    }

    fn parse_object_binding_pattern(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                properties.push(self.parse_rest_element());
            } else {
                let prop_start = self.token_pos();
                let shorthand = self.is_token(SyntaxKind::Identifier)
                    && self.peek_kind(1) != SyntaxKind::ColonToken;
                if shorthand {
                    let value = self.parse_binding_element();
                    let name = self.binding_element_name(value);
                    let key = self.arena.add_like(value, NodeData::PropertyIdentifier { name });
                    properties.push(self.finish(
                        prop_start,
                        NodeData::Property {
                            key,
                            value,
                            kind: PropertyKind::Shorthand,
                            computed: false,
                        },
                    ));
                } else {
                    let (key, computed) = self.parse_property_name();
                    self.parse_expected(SyntaxKind::ColonToken);
                    let value = self.parse_binding_element();
                    properties.push(self.finish(
                        prop_start,
                        NodeData::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            computed,
                        },
                    ));
                }
            }
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_expected(SyntaxKind::CommaToken);
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish(start, NodeData::ObjectPattern { properties })
    }

    /// Name of a shorthand binding element (`a` or `a = 1`).
    fn binding_element_name(&self, element: NodeIndex) -> String {
        let target = match self.arena.data(element) {
            Some(NodeData::AssignmentPattern { target, .. }) => *target,
            _ => element,
        };
        self.arena
            .identifier_name(target)
            .unwrap_or_default()
            .to_string()
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    pub(crate) fn parse_function_declaration(&mut self, is_async: bool) -> NodeIndex {
        let start = self.token_pos();
        let data = self.parse_function_rest(is_async, true);
        self.finish(start, NodeData::FunctionDeclaration(data))
    }

    /// Parse from the `function` keyword on.
    pub(crate) fn parse_function_rest(&mut self, is_async: bool, name_required: bool) -> FunctionData {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_binding_identifier()
        } else {
            if name_required {
                self.parse_error_at_current_token(
                    diagnostic_messages::IDENTIFIER_EXPECTED,
                    diagnostic_codes::IDENTIFIER_EXPECTED,
                );
            }
            NodeIndex::NONE
        };
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
        FunctionData {
            name,
            params,
            body,
            is_async,
            is_generator,
            expression_body: false,
        }
    }

    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        let mut params = Vec::new();
        self.parse_expected(SyntaxKind::OpenParenToken);
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_token(SyntaxKind::DotDotDotToken) {
                params.push(self.parse_rest_element());
            } else {
                params.push(self.parse_binding_element());
            }
            if !self.is_token(SyntaxKind::CloseParenToken) && !self.parse_expected(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        params
    }

    pub(crate) fn parse_class_declaration(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let data = self.parse_class_rest(true);
        self.finish(start, NodeData::ClassDeclaration(data))
    }

    pub(crate) fn parse_class_rest(&mut self, name_required: bool) -> ClassData {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_token(SyntaxKind::Identifier) {
            self.parse_binding_identifier()
        } else {
            if name_required {
                self.parse_error_at_current_token(
                    diagnostic_messages::IDENTIFIER_EXPECTED,
                    diagnostic_codes::IDENTIFIER_EXPECTED,
                );
            }
            NodeIndex::NONE
        };
        let extends = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_left_hand_side_expression()
        } else {
            NodeIndex::NONE
        };
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let before = self.cursor;
            members.push(self.parse_class_member());
            if self.cursor == before {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        ClassData {
            name,
            extends,
            members,
        }
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let is_static = self.is_contextual("static")
            && !matches!(
                self.peek_kind(1),
                SyntaxKind::OpenParenToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::CloseBraceToken
            );
        if is_static {
            self.next_token();
            if self.is_token(SyntaxKind::OpenBraceToken) {
                self.next_token();
                let body = self.with_context(0, |p| p.parse_statements());
                self.parse_expected(SyntaxKind::CloseBraceToken);
                return self.finish(start, NodeData::StaticBlock { body });
            }
        }

        let (is_async, is_generator, accessor) = self.parse_method_modifiers();
        let (key, computed) = self.parse_property_name();

        if self.is_token(SyntaxKind::OpenParenToken) {
            let is_constructor = !is_static
                && !computed
                && accessor.is_none()
                && self.arena.name_text(key) == Some("constructor");
            let kind = match accessor {
                Some(PropertyKind::Get) => MethodKind::Get,
                Some(PropertyKind::Set) => MethodKind::Set,
                _ if is_constructor => MethodKind::Constructor,
                _ => MethodKind::Method,
            };
            let value = self.parse_method_function(is_async, is_generator);
            return self.finish(
                start,
                NodeData::MethodDefinition {
                    key,
                    value,
                    kind,
                    is_static,
                    computed,
                },
            );
        }

        let value = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.with_context(0, |p| p.parse_assignment_expression())
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.finish(
            start,
            NodeData::PropertyDefinition {
                key,
                value,
                is_static,
                computed,
            },
        )
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_parenthesized_expression(&mut self) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.with_context(
            self.context_flags & !CONTEXT_FLAG_DISALLOW_IN,
            |p| p.parse_expression(),
        );
        self.parse_expected(SyntaxKind::CloseParenToken);
        expression
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let test = self.parse_parenthesized_expression();
        let consequent = self.parse_statement();
        let alternate = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.finish(
            start,
            NodeData::If {
                test,
                consequent,
                alternate,
            },
        )
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let test = self.parse_parenthesized_expression();
        let body = self.parse_statement();
        self.finish(start, NodeData::While { test, body })
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let body = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        let test = self.parse_parenthesized_expression();
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.finish(start, NodeData::DoWhile { body, test })
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let is_await = self.in_await_context() && self.is_contextual("await");
        if is_await {
            self.next_token();
        }
        self.parse_expected(SyntaxKind::OpenParenToken);

        let init = match self.token_kind() {
            SyntaxKind::SemicolonToken => NodeIndex::NONE,
            SyntaxKind::VarKeyword => self.parse_for_declaration(VarKind::Var),
            SyntaxKind::ConstKeyword => self.parse_for_declaration(VarKind::Const),
            SyntaxKind::Identifier if self.look_ahead_is_let_declaration() => {
                self.parse_for_declaration(VarKind::Let)
            }
            _ => self.with_context(self.context_flags | CONTEXT_FLAG_DISALLOW_IN, |p| {
                p.parse_expression()
            }),
        };

        if init.is_some() && (self.is_token(SyntaxKind::InKeyword) || self.is_contextual("of")) {
            let is_of = !self.is_token(SyntaxKind::InKeyword);
            self.next_token();
            let left = self.to_assignment_target(init);
            let right = if is_of {
                self.parse_assignment_expression()
            } else {
                self.parse_expression()
            };
            self.parse_expected(SyntaxKind::CloseParenToken);
            let body = self.parse_statement();
            let data = if is_of {
                NodeData::ForOf {
                    left,
                    right,
                    body,
                    is_await,
                }
            } else {
                NodeData::ForIn { left, right, body }
            };
            return self.finish(start, data);
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let test = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let update = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let body = self.parse_statement();
        self.finish(
            start,
            NodeData::For {
                init,
                test,
                update,
                body,
            },
        )
    }

    fn parse_for_declaration(&mut self, kind: VarKind) -> NodeIndex {
        self.with_context(self.context_flags | CONTEXT_FLAG_DISALLOW_IN, |p| {
            p.parse_variable_declaration_list(kind)
        })
    }

    fn parse_break_or_continue_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let is_break = self.is_token(SyntaxKind::BreakKeyword);
        self.next_token();
        let label = if self.is_token(SyntaxKind::Identifier) && !self.has_preceding_line_break() {
            let label_start = self.token_pos();
            let name = self.take_value();
            self.finish(label_start, NodeData::LabelIdentifier { name })
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        let data = if is_break {
            NodeData::Break { label }
        } else {
            NodeData::Continue { label }
        };
        self.finish(start, data)
    }

    fn parse_return_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let argument = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.finish(start, NodeData::Return { argument })
    }

    fn parse_throw_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let argument = self.parse_expression();
        self.parse_semicolon();
        self.finish(start, NodeData::Throw { argument })
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let block = self.parse_block();
        let handler = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_start = self.token_pos();
            self.next_token();
            let param = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let param = self.parse_binding_target();
                self.parse_expected(SyntaxKind::CloseParenToken);
                param
            } else {
                NodeIndex::NONE
            };
            let body = self.parse_block();
            self.finish(catch_start, NodeData::CatchClause { param, body })
        } else {
            NodeIndex::NONE
        };
        let finalizer = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };
        if handler.is_none() && finalizer.is_none() {
            self.parse_expected(SyntaxKind::CatchKeyword);
        }
        self.finish(
            start,
            NodeData::Try {
                block,
                handler,
                finalizer,
            },
        )
    }

    fn parse_switch_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let discriminant = self.parse_parenthesized_expression();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut cases = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let case_start = self.token_pos();
            let test = if self.parse_optional(SyntaxKind::CaseKeyword) {
                self.parse_expression()
            } else if self.parse_optional(SyntaxKind::DefaultKeyword) {
                NodeIndex::NONE
            } else {
                self.error_unexpected_token();
                self.next_token();
                continue;
            };
            self.parse_expected(SyntaxKind::ColonToken);
            let mut consequent = Vec::new();
            while !matches!(
                self.token_kind(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
            ) {
                let before = self.cursor;
                consequent.push(self.parse_statement());
                if self.cursor == before {
                    self.next_token();
                }
            }
            cases.push(self.finish(case_start, NodeData::SwitchCase { test, consequent }));
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.finish(
            start,
            NodeData::Switch {
                discriminant,
                cases,
            },
        )
    }

    fn parse_with_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let object = self.parse_parenthesized_expression();
        let body = self.parse_statement();
        self.finish(start, NodeData::With { object, body })
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_module_specifier(&mut self) -> String {
        if self.is_token(SyntaxKind::StringLiteral) {
            return self.take_value();
        }
        self.parse_expected(SyntaxKind::StringLiteral);
        String::new()
    }

    /// Export/import names may be any identifier name or a string.
    fn parse_module_export_name(&mut self) -> String {
        if self.is_token(SyntaxKind::StringLiteral)
            || jsz_scanner::token_is_identifier_or_keyword(self.token_kind())
        {
            return self.take_value();
        }
        self.parse_error_at_current_token(
            diagnostic_messages::IDENTIFIER_EXPECTED,
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
        String::new()
    }

    fn parse_import_declaration(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        let mut specifiers = Vec::new();

        if self.is_token(SyntaxKind::StringLiteral) {
            let source = self.take_value();
            self.parse_semicolon();
            return self.finish(start, NodeData::ImportDeclaration { specifiers, source });
        }

        if self.is_token(SyntaxKind::Identifier) {
            let spec_start = self.token_pos();
            let local = self.parse_binding_identifier();
            specifiers.push(self.finish(spec_start, NodeData::ImportDefaultSpecifier { local }));
            self.parse_optional(SyntaxKind::CommaToken);
        }

        if self.is_token(SyntaxKind::AsteriskToken) {
            let spec_start = self.token_pos();
            self.next_token();
            if self.is_contextual("as") {
                self.next_token();
            } else {
                self.error_unexpected_token();
            }
            let local = self.parse_binding_identifier();
            specifiers.push(self.finish(spec_start, NodeData::ImportNamespaceSpecifier { local }));
        } else if self.parse_optional(SyntaxKind::OpenBraceToken) {
            while !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                let spec_start = self.token_pos();
                let imported_is_identifier = self.is_token(SyntaxKind::Identifier);
                let imported = self.parse_module_export_name();
                let local = if self.is_contextual("as") {
                    self.next_token();
                    self.parse_binding_identifier()
                } else {
                    if !imported_is_identifier {
                        self.parse_error_at_current_token(
                            diagnostic_messages::IDENTIFIER_EXPECTED,
                            diagnostic_codes::IDENTIFIER_EXPECTED,
                        );
                    }
                    self.finish(
                        spec_start,
                        NodeData::Identifier {
                            name: imported.clone(),
                        },
                    )
                };
                specifiers.push(self.finish(spec_start, NodeData::ImportSpecifier { imported, local }));
                if !self.is_token(SyntaxKind::CloseBraceToken) && !self.parse_expected(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken);
        }

        if self.is_contextual("from") {
            self.next_token();
        } else {
            self.error_unexpected_token();
        }
        let source = self.parse_module_specifier();
        self.parse_semicolon();
        self.finish(start, NodeData::ImportDeclaration { specifiers, source })
    }

    fn parse_export_declaration(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();

        if self.parse_optional(SyntaxKind::DefaultKeyword) {
            let declaration = match self.token_kind() {
                SyntaxKind::FunctionKeyword => self.parse_default_function(false),
                SyntaxKind::Identifier if self.look_ahead_is_async_function() => {
                    self.next_token();
                    self.parse_default_function(true)
                }
                SyntaxKind::ClassKeyword => {
                    let class_start = self.token_pos();
                    let data = self.parse_class_rest(false);
                    self.finish(class_start, NodeData::ClassDeclaration(data))
                }
                _ => {
                    let expression = self.parse_assignment_expression();
                    self.parse_semicolon();
                    expression
                }
            };
            return self.finish(start, NodeData::ExportDefault { declaration });
        }

        if self.parse_optional(SyntaxKind::AsteriskToken) {
            let exported = if self.is_contextual("as") {
                self.next_token();
                Some(self.parse_module_export_name())
            } else {
                None
            };
            if self.is_contextual("from") {
                self.next_token();
            } else {
                self.error_unexpected_token();
            }
            let source = self.parse_module_specifier();
            self.parse_semicolon();
            return self.finish(start, NodeData::ExportAll { exported, source });
        }

        if self.parse_optional(SyntaxKind::OpenBraceToken) {
            let mut raw_specifiers = Vec::new();
            while !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                let spec_start = self.token_pos();
                let local_name = self.parse_module_export_name();
                let local_end = self.prev_end;
                let exported = if self.is_contextual("as") {
                    self.next_token();
                    self.parse_module_export_name()
                } else {
                    local_name.clone()
                };
                raw_specifiers.push((spec_start, local_end, local_name, exported));
                if !self.is_token(SyntaxKind::CloseBraceToken) && !self.parse_expected(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken);
            let source = if self.is_contextual("from") {
                self.next_token();
                Some(self.parse_module_specifier())
            } else {
                None
            };
            self.parse_semicolon();

            // Without `from`, local names are references to module bindings.
            let specifiers = raw_specifiers
                .into_iter()
                .map(|(spec_start, local_end, name, exported)| {
                    let local_data = if source.is_some() {
                        NodeData::PropertyIdentifier { name }
                    } else {
                        NodeData::Identifier { name }
                    };
                    let local = self.arena.add(spec_start, local_end, local_data);
                    self.finish(spec_start, NodeData::ExportSpecifier { local, exported })
                })
                .collect();
            return self.finish(
                start,
                NodeData::ExportNamed {
                    declaration: NodeIndex::NONE,
                    specifiers,
                    source,
                },
            );
        }

        let declaration = match self.token_kind() {
            SyntaxKind::VarKeyword => self.parse_variable_statement(VarKind::Var),
            SyntaxKind::ConstKeyword => self.parse_variable_statement(VarKind::Const),
            SyntaxKind::Identifier if self.look_ahead_is_let_declaration() => {
                self.parse_variable_statement(VarKind::Let)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(false),
            SyntaxKind::Identifier if self.look_ahead_is_async_function() => {
                self.next_token();
                self.parse_function_declaration(true)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(),
            _ => {
                self.error_unexpected_token();
                self.missing_node()
            }
        };
        self.finish(
            start,
            NodeData::ExportNamed {
                declaration,
                specifiers: Vec::new(),
                source: None,
            },
        )
    }

    fn parse_default_function(&mut self, is_async: bool) -> NodeIndex {
        let start = self.token_pos();
        let data = self.parse_function_rest(is_async, false);
        self.finish(start, NodeData::FunctionDeclaration(data))
    }
}
