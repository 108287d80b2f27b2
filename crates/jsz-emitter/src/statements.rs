use crate::literals::quote_string;
use crate::printer::{PREC_ASSIGN, PREC_LHS, PREC_SEQUENCE, Printer};
use jsz_parser::{NodeData, NodeIndex};

impl<'a> Printer<'a> {
    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn emit_statements(&mut self, statements: &[NodeIndex]) {
        for &statement in statements {
            self.emit_statement(statement);
        }
    }

    pub(crate) fn emit_statement(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(data) = arena.data(idx) else {
            return;
        };
        match data {
            NodeData::SourceFile { statements, .. } => self.emit_statements(statements),
            NodeData::Block { statements } => {
                self.write("{");
                self.emit_statements(statements);
                self.close_brace();
            }
            NodeData::Empty => self.write_semicolon(),
            NodeData::Debugger => {
                self.write("debugger");
                self.end_statement();
            }
            NodeData::VariableStatement { .. } => {
                self.emit_variable_list(idx);
                self.end_statement();
            }
            NodeData::FunctionDeclaration(f) => self.emit_function(f),
            NodeData::ClassDeclaration(c) => self.emit_class(c),
            NodeData::ExpressionStatement { expression } => {
                if self.starts_ambiguously(*expression, true) {
                    self.emit_parenthesized(*expression);
                } else {
                    self.emit_expression(*expression, PREC_SEQUENCE);
                }
                self.end_statement();
            }
            NodeData::If {
                test,
                consequent,
                alternate,
            } => self.emit_if(*test, *consequent, *alternate),
            NodeData::For {
                init,
                test,
                update,
                body,
            } => {
                self.write("for(");
                if init.is_some() {
                    self.no_in = true;
                    if matches!(arena.data(*init), Some(NodeData::VariableStatement { .. })) {
                        self.emit_variable_list(*init);
                    } else {
                        self.emit_expression(*init, PREC_SEQUENCE);
                    }
                    self.no_in = false;
                }
                self.write_semicolon();
                if test.is_some() {
                    self.emit_expression(*test, PREC_SEQUENCE);
                }
                self.write_semicolon();
                if update.is_some() {
                    self.emit_expression(*update, PREC_SEQUENCE);
                }
                self.write(")");
                self.emit_statement(*body);
            }
            NodeData::ForIn { left, right, body } => {
                self.write("for(");
                self.emit_for_head_left(*left);
                self.write("in");
                self.emit_expression(*right, PREC_SEQUENCE);
                self.write(")");
                self.emit_statement(*body);
            }
            NodeData::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                self.write(if *is_await { "for await(" } else { "for(" });
                self.emit_for_head_left(*left);
                self.write("of");
                self.emit_expression(*right, PREC_ASSIGN);
                self.write(")");
                self.emit_statement(*body);
            }
            NodeData::While { test, body } => {
                self.write("while(");
                self.emit_expression(*test, PREC_SEQUENCE);
                self.write(")");
                self.emit_statement(*body);
            }
            NodeData::DoWhile { body, test } => {
                self.write("do");
                self.emit_statement(*body);
                self.write("while(");
                self.emit_expression(*test, PREC_SEQUENCE);
                self.write(")");
                self.end_statement();
            }
            NodeData::Return { argument } => self.emit_keyword_argument("return", *argument),
            NodeData::Throw { argument } => self.emit_keyword_argument("throw", *argument),
            NodeData::Break { label } => self.emit_jump("break", *label),
            NodeData::Continue { label } => self.emit_jump("continue", *label),
            NodeData::Labeled { label, body } => {
                self.write_name(*label);
                self.write(":");
                self.emit_statement(*body);
            }
            NodeData::Switch {
                discriminant,
                cases,
            } => {
                self.write("switch(");
                self.emit_expression(*discriminant, PREC_SEQUENCE);
                self.write("){");
                for &case in cases {
                    let Some(NodeData::SwitchCase { test, consequent }) = arena.data(case) else {
                        continue;
                    };
                    if test.is_some() {
                        self.write("case");
                        self.emit_expression(*test, PREC_SEQUENCE);
                    } else {
                        self.write("default");
                    }
                    self.write(":");
                    self.emit_statements(consequent);
                }
                self.close_brace();
            }
            NodeData::Try {
                block,
                handler,
                finalizer,
            } => {
                self.write("try");
                self.emit_statement(*block);
                if let Some(NodeData::CatchClause { param, body }) = arena.data(*handler) {
                    self.write("catch");
                    if param.is_some() {
                        self.write("(");
                        self.emit_expression(*param, PREC_ASSIGN);
                        self.write(")");
                    }
                    self.emit_statement(*body);
                }
                if finalizer.is_some() {
                    self.write("finally");
                    self.emit_statement(*finalizer);
                }
            }
            NodeData::With { object, body } => {
                self.write("with(");
                self.emit_expression(*object, PREC_SEQUENCE);
                self.write(")");
                self.emit_statement(*body);
            }
            NodeData::ImportDeclaration { specifiers, source } => self.emit_import(specifiers, source),
            NodeData::ExportNamed {
                declaration,
                specifiers,
                source,
            } => {
                self.write("export");
                if declaration.is_some() {
                    self.emit_statement(*declaration);
                    return;
                }
                self.write("{");
                self.comma_list(specifiers, |p, specifier| p.emit_export_specifier(specifier));
                self.write("}");
                if let Some(source) = source {
                    self.write("from");
                    self.write(&quote_string(source));
                }
                self.end_statement();
            }
            NodeData::ExportDefault { declaration } => {
                self.write("export default");
                match arena.data(*declaration) {
                    Some(NodeData::FunctionDeclaration(_) | NodeData::ClassDeclaration(_)) => {
                        self.emit_statement(*declaration);
                    }
                    _ => {
                        if self.starts_ambiguously(*declaration, false) {
                            self.emit_parenthesized(*declaration);
                        } else {
                            self.emit_expression(*declaration, PREC_ASSIGN);
                        }
                        self.end_statement();
                    }
                }
            }
            NodeData::ExportAll { exported, source } => {
                self.write("export*");
                if let Some(exported) = exported {
                    self.write("as");
                    self.write(exported);
                }
                self.write("from");
                self.write(&quote_string(source));
                self.end_statement();
            }
            _ => {
                self.emit_expression(idx, PREC_SEQUENCE);
                self.end_statement();
            }
        }
    }

    /// `var a = 1, b` without the terminating `;`.
    fn emit_variable_list(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::VariableStatement { kind, declarations }) = arena.data(idx) else {
            return;
        };
        self.write(kind.as_str());
        self.comma_list(declarations, |p, declarator| {
            let Some(NodeData::VariableDeclarator { name, init }) = arena.data(declarator) else {
                return;
            };
            p.emit_expression(*name, PREC_ASSIGN);
            if init.is_some() {
                p.write("=");
                p.emit_expression(*init, PREC_ASSIGN);
            }
        });
    }

    fn emit_for_head_left(&mut self, left: NodeIndex) {
        if matches!(self.arena.data(left), Some(NodeData::VariableStatement { .. })) {
            self.emit_variable_list(left);
        } else if self.starts_ambiguously(left, false) {
            self.emit_parenthesized(left);
        } else {
            self.emit_expression(left, PREC_LHS);
        }
    }

    fn emit_if(&mut self, test: NodeIndex, consequent: NodeIndex, alternate: NodeIndex) {
        self.write("if(");
        self.emit_expression(test, PREC_SEQUENCE);
        self.write(")");
        if alternate.is_some() && self.ends_with_open_if(consequent) {
            // Keep the `else` from attaching to the inner `if`.
            self.write("{");
            self.emit_statement(consequent);
            self.close_brace();
        } else {
            self.emit_statement(consequent);
        }
        if alternate.is_some() {
            self.write("else");
            self.emit_statement(alternate);
        }
    }

    /// Whether `statement` ends in an `if` without `else` that a following
    /// `else` would bind to.
    fn ends_with_open_if(&self, statement: NodeIndex) -> bool {
        match self.arena.data(statement) {
            Some(NodeData::If { alternate, .. }) => alternate.is_none() || self.ends_with_open_if(*alternate),
            Some(
                NodeData::For { body, .. }
                | NodeData::ForIn { body, .. }
                | NodeData::ForOf { body, .. }
                | NodeData::While { body, .. }
                | NodeData::Labeled { body, .. }
                | NodeData::With { body, .. },
            ) => self.ends_with_open_if(*body),
            _ => false,
        }
    }

    fn emit_keyword_argument(&mut self, keyword: &str, argument: NodeIndex) {
        self.write(keyword);
        if argument.is_some() {
            self.emit_expression(argument, PREC_SEQUENCE);
        }
        self.end_statement();
    }

    fn emit_jump(&mut self, keyword: &str, label: NodeIndex) {
        self.write(keyword);
        if label.is_some() {
            self.write_name(label);
        }
        self.end_statement();
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn emit_import(&mut self, specifiers: &[NodeIndex], source: &str) {
        let arena = self.arena;
        self.write("import");
        let mut named = Vec::new();
        let mut first = true;
        for &specifier in specifiers {
            match arena.data(specifier) {
                Some(NodeData::ImportDefaultSpecifier { local }) => {
                    if !first {
                        self.write(",");
                    }
                    self.write_name(*local);
                    first = false;
                }
                Some(NodeData::ImportNamespaceSpecifier { local }) => {
                    if !first {
                        self.write(",");
                    }
                    self.write("*as");
                    self.write_name(*local);
                    first = false;
                }
                Some(NodeData::ImportSpecifier { .. }) => named.push(specifier),
                _ => {}
            }
        }
        if !named.is_empty() {
            if !first {
                self.write(",");
            }
            self.write("{");
            self.comma_list(&named, |p, specifier| {
                let Some(NodeData::ImportSpecifier { imported, local }) = arena.data(specifier) else {
                    return;
                };
                if arena.name_text(*local) != Some(imported.as_str()) {
                    p.write(imported);
                    p.write("as");
                }
                p.write_name(*local);
            });
            self.write("}");
            first = false;
        }
        if !first {
            self.write("from");
        }
        self.write(&quote_string(source));
        self.end_statement();
    }

    fn emit_export_specifier(&mut self, specifier: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::ExportSpecifier { local, exported }) = arena.data(specifier) else {
            return;
        };
        self.write_name(*local);
        if arena.name_text(*local) != Some(exported.as_str()) {
            self.write("as");
            self.write(exported);
        }
    }
}
