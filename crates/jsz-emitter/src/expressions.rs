use crate::literals::{format_number, is_bare_key, is_numeric_key, quote_string};
use crate::printer::{
    PREC_ASSIGN, PREC_CONDITIONAL, PREC_LHS, PREC_PRIMARY, PREC_SEQUENCE,
    PREC_UNARY, PREC_UPDATE, Printer,
};
use jsz_parser::{BinaryOp, ClassData, FunctionData, MethodKind, NodeData, NodeIndex, PropertyKind};

impl<'a> Printer<'a> {
    // =========================================================================
    // Expressions
    // =========================================================================

    /// Print `idx`, parenthesized when it binds looser than `min_precedence`.
    pub(crate) fn emit_expression(&mut self, idx: NodeIndex, min_precedence: u8) {
        if self.precedence(idx) < min_precedence {
            self.emit_parenthesized(idx);
        } else {
            self.emit_expression_inner(idx);
        }
    }

    pub(crate) fn emit_parenthesized(&mut self, idx: NodeIndex) {
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.write("(");
        self.emit_expression_inner(idx);
        self.write(")");
        self.no_in = no_in;
    }

    fn emit_expression_inner(&mut self, idx: NodeIndex) {
        let Some(data) = self.arena.data(idx) else {
            return;
        };
        match data {
            NodeData::Identifier { name }
            | NodeData::PropertyIdentifier { name }
            | NodeData::LabelIdentifier { name } => {
                let name = name.clone();
                self.write(&name);
            }
            NodeData::PrivateName { name } => {
                let text = format!("#{name}");
                self.write(&text);
            }
            NodeData::NumericLiteral { value } => self.emit_number(*value),
            NodeData::BigIntLiteral { digits } => {
                let text = format!("{digits}n");
                self.write(&text);
            }
            NodeData::StringLiteral { value } => {
                let text = quote_string(value);
                self.write(&text);
            }
            NodeData::RegExpLiteral { raw } => {
                let raw = raw.clone();
                self.write(&raw);
            }
            NodeData::BooleanLiteral { value } => self.write(if *value { "!0" } else { "!1" }),
            NodeData::NullLiteral => self.write("null"),
            NodeData::This => self.write("this"),
            NodeData::Super => self.write("super"),
            NodeData::MetaProperty { meta, property } => {
                let text = format!("{meta}.{property}");
                self.write(&text);
            }
            NodeData::TemplateLiteral { .. } => self.emit_template(idx),
            NodeData::TaggedTemplate { tag, quasi } => {
                let (tag, quasi) = (*tag, *quasi);
                self.emit_expression(tag, PREC_LHS);
                self.emit_template(quasi);
            }
            NodeData::ArrayLiteral { elements } | NodeData::ArrayPattern { elements } => {
                let elements = elements.clone();
                self.emit_array(&elements);
            }
            NodeData::ObjectLiteral { properties } | NodeData::ObjectPattern { properties } => {
                let properties = properties.clone();
                self.write("{");
                self.comma_list(&properties, |p, property| p.emit_property(property));
                self.write("}");
            }
            NodeData::Property { .. } => self.emit_property(idx),
            NodeData::Spread { expression } => {
                let expression = *expression;
                self.write("...");
                self.emit_expression(expression, PREC_ASSIGN);
            }
            NodeData::Rest { argument } => {
                let argument = *argument;
                self.write("...");
                self.emit_expression(argument, PREC_ASSIGN);
            }
            NodeData::AssignmentPattern { target, default } => {
                let (target, default) = (*target, *default);
                self.emit_expression(target, PREC_LHS);
                self.write("=");
                self.emit_expression(default, PREC_ASSIGN);
            }
            NodeData::FunctionExpression(f) => {
                let f = f.clone();
                self.emit_function(&f);
            }
            NodeData::ArrowFunction(f) => {
                let f = f.clone();
                self.emit_arrow(&f);
            }
            NodeData::ClassExpression(c) => {
                let c = c.clone();
                self.emit_class(&c);
            }
            NodeData::Unary { op, operand } => {
                let (op, operand) = (*op, *operand);
                self.write(op.as_str());
                self.emit_expression(operand, PREC_UNARY);
            }
            NodeData::Update {
                op,
                prefix,
                operand,
            } => {
                let (op, prefix, operand) = (*op, *prefix, *operand);
                if prefix {
                    self.write(op.as_str());
                    self.emit_expression(operand, PREC_UPDATE);
                } else {
                    self.emit_expression(operand, PREC_LHS);
                    self.write(op.as_str());
                }
            }
            NodeData::Binary { op, left, right } => {
                let (op, left, right) = (*op, *left, *right);
                self.emit_binary(idx, op, left, right);
            }
            NodeData::Assign { op, target, value } => {
                let (op, target, value) = (*op, *target, *value);
                self.emit_expression(target, PREC_LHS);
                self.write(op.as_str());
                self.emit_expression(value, PREC_ASSIGN);
            }
            NodeData::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let (test, consequent, alternate) = (*test, *consequent, *alternate);
                self.emit_expression(test, PREC_CONDITIONAL + 1);
                self.write("?");
                let no_in = std::mem::replace(&mut self.no_in, false);
                self.emit_expression(consequent, PREC_ASSIGN);
                self.no_in = no_in;
                self.write(":");
                self.emit_expression(alternate, PREC_ASSIGN);
            }
            NodeData::Call {
                callee,
                arguments,
                optional,
            } => {
                let (callee, arguments, optional) = (*callee, arguments.clone(), *optional);
                self.emit_expression(callee, PREC_LHS);
                if optional {
                    self.write("?.");
                }
                self.emit_arguments(&arguments);
            }
            NodeData::New { callee, arguments } => {
                let (callee, arguments) = (*callee, arguments.clone());
                self.write("new");
                if self.has_call_in_chain(callee) {
                    self.emit_parenthesized(callee);
                } else {
                    self.emit_expression(callee, PREC_LHS);
                }
                self.emit_arguments(&arguments);
            }
            NodeData::ImportCall { argument } => {
                let argument = *argument;
                self.write("import(");
                self.emit_expression(argument, PREC_ASSIGN);
                self.write(")");
            }
            NodeData::Member {
                object,
                property,
                optional,
            } => {
                let (object, property, optional) = (*object, *property, *optional);
                self.emit_member_object(object);
                self.write(if optional { "?." } else { "." });
                self.emit_expression(property, PREC_PRIMARY);
            }
            NodeData::Index {
                object,
                index,
                optional,
            } => {
                let (object, index, optional) = (*object, *index, *optional);
                self.emit_expression(object, PREC_LHS);
                if optional {
                    self.write("?.");
                }
                self.write("[");
                let no_in = std::mem::replace(&mut self.no_in, false);
                self.emit_expression(index, PREC_SEQUENCE);
                self.no_in = no_in;
                self.write("]");
            }
            NodeData::Sequence { expressions } => {
                let expressions = expressions.clone();
                self.comma_list(&expressions, |p, e| p.emit_expression(e, PREC_ASSIGN));
            }
            NodeData::Yield { argument, delegate } => {
                let (argument, delegate) = (*argument, *delegate);
                self.write(if delegate { "yield*" } else { "yield" });
                if argument.is_some() {
                    self.emit_expression(argument, PREC_ASSIGN);
                }
            }
            NodeData::Await { argument } => {
                let argument = *argument;
                self.write("await");
                self.emit_expression(argument, PREC_UNARY);
            }
            _ => {}
        }
    }

    fn emit_number(&mut self, value: f64) {
        if value.is_nan() {
            self.write("NaN");
        } else if value.is_infinite() {
            self.write(if value < 0.0 { "-1/0" } else { "1/0" });
        } else if value.is_sign_negative() && value != 0.0 {
            self.write("-");
            let text = format_number(-value);
            self.write(&text);
        } else {
            let text = format_number(value);
            self.write(&text);
        }
    }

    fn emit_binary(&mut self, idx: NodeIndex, op: BinaryOp, left: NodeIndex, right: NodeIndex) {
        let wrap = op == BinaryOp::In && self.no_in;
        if wrap {
            self.write("(");
            self.no_in = false;
        }
        let precedence = self.precedence(idx);
        let (left_min, right_min) = if op.is_right_associative() {
            // A unary operand on the left of `**` is a syntax error.
            (PREC_UPDATE, precedence)
        } else {
            (precedence, precedence + 1)
        };
        self.emit_operand(op, left, left_min);
        self.write(op.as_str());
        self.emit_operand(op, right, right_min);
        if wrap {
            self.write(")");
            self.no_in = true;
        }
    }

    /// `??` cannot mix with `&&`/`||` without parentheses.
    fn emit_operand(&mut self, op: BinaryOp, operand: NodeIndex, min_precedence: u8) {
        let mixes = match self.arena.data(operand) {
            Some(NodeData::Binary { op: inner, .. }) => {
                (op == BinaryOp::Nullish && matches!(inner, BinaryOp::And | BinaryOp::Or))
                    || (matches!(op, BinaryOp::And | BinaryOp::Or) && *inner == BinaryOp::Nullish)
            }
            _ => false,
        };
        if mixes {
            self.emit_parenthesized(operand);
        } else {
            self.emit_expression(operand, min_precedence);
        }
    }

    /// `1..toString()` rather than `1.toString()`.
    fn emit_member_object(&mut self, object: NodeIndex) {
        if let Some(NodeData::NumericLiteral { value }) = self.arena.data(object)
            && value.is_finite()
            && !value.is_sign_negative()
        {
            let text = format_number(*value);
            if text.bytes().all(|b| b.is_ascii_digit()) {
                let text = format!("{text}.");
                self.write(&text);
                return;
            }
        }
        self.emit_expression(object, PREC_LHS);
    }

    fn has_call_in_chain(&self, idx: NodeIndex) -> bool {
        let mut current = idx;
        loop {
            match self.arena.data(current) {
                Some(NodeData::Call { .. } | NodeData::ImportCall { .. }) => return true,
                Some(NodeData::Member { object, .. } | NodeData::Index { object, .. }) => current = *object,
                Some(NodeData::TaggedTemplate { tag, .. }) => current = *tag,
                _ => return false,
            }
        }
    }

    fn emit_arguments(&mut self, arguments: &[NodeIndex]) {
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.write("(");
        self.comma_list(arguments, |p, a| p.emit_expression(a, PREC_ASSIGN));
        self.write(")");
        self.no_in = no_in;
    }

    fn emit_array(&mut self, elements: &[NodeIndex]) {
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.write("[");
        for (i, &element) in elements.iter().enumerate() {
            if i > 0 {
                self.write(",");
            }
            if element.is_some() {
                self.emit_expression(element, PREC_ASSIGN);
            }
        }
        // A trailing hole needs its own comma.
        if elements.last().is_some_and(|e| e.is_none()) {
            self.write(",");
        }
        self.write("]");
        self.no_in = no_in;
    }

    fn emit_template(&mut self, idx: NodeIndex) {
        let Some(NodeData::TemplateLiteral {
            quasis,
            expressions,
        }) = self.arena.data(idx)
        else {
            return;
        };
        let (quasis, expressions) = (quasis.clone(), expressions.clone());
        let mut text = String::from("`");
        for (i, quasi) in quasis.iter().enumerate() {
            text.push_str(quasi);
            if let Some(&expression) = expressions.get(i) {
                text.push_str("${");
                self.write(&text);
                text.clear();
                let no_in = std::mem::replace(&mut self.no_in, false);
                self.emit_expression(expression, PREC_SEQUENCE);
                self.no_in = no_in;
                text.push('}');
            }
        }
        text.push('`');
        self.write(&text);
    }

    // =========================================================================
    // Properties and keys
    // =========================================================================

    pub(crate) fn emit_property_key(&mut self, key: NodeIndex, computed: bool) {
        if computed {
            self.write("[");
            self.emit_expression(key, PREC_ASSIGN);
            self.write("]");
            return;
        }
        match self.arena.data(key) {
            Some(NodeData::StringLiteral { value }) if is_bare_key(value) || is_numeric_key(value) => {
                let value = value.clone();
                self.write(&value);
            }
            _ => self.emit_expression(key, PREC_PRIMARY),
        }
    }

    fn emit_property(&mut self, idx: NodeIndex) {
        let Some(&NodeData::Property {
            key,
            value,
            kind,
            computed,
        }) = self.arena.data(idx)
        else {
            self.emit_expression(idx, PREC_ASSIGN);
            return;
        };
        match kind {
            PropertyKind::Method | PropertyKind::Get | PropertyKind::Set => {
                let Some(f) = self.arena.function_data(value).cloned() else {
                    return;
                };
                let accessor = match kind {
                    PropertyKind::Get => Some("get"),
                    PropertyKind::Set => Some("set"),
                    _ => None,
                };
                self.emit_method(key, computed, accessor, &f);
            }
            PropertyKind::Init | PropertyKind::Shorthand => {
                if !computed && self.is_shorthand(key, value) {
                    self.emit_expression(value, PREC_ASSIGN);
                    return;
                }
                self.emit_property_key(key, computed);
                self.write(":");
                self.emit_expression(value, PREC_ASSIGN);
            }
        }
    }

    /// `{a: a}` and `{a: a = 1}` print as `{a}` and `{a = 1}`.
    fn is_shorthand(&self, key: NodeIndex, value: NodeIndex) -> bool {
        let Some(NodeData::PropertyIdentifier { name: key_name }) = self.arena.data(key) else {
            return false;
        };
        let target = match self.arena.data(value) {
            Some(NodeData::AssignmentPattern { target, .. }) => *target,
            Some(NodeData::Assign { op, target, .. }) if op.binary_op().is_none() => *target,
            _ => value,
        };
        self.arena.identifier_name(target) == Some(key_name.as_str())
    }

    fn emit_method(&mut self, key: NodeIndex, computed: bool, accessor: Option<&str>, f: &FunctionData) {
        if let Some(accessor) = accessor {
            self.write(accessor);
        }
        if f.is_async {
            self.write("async");
        }
        if f.is_generator {
            self.write("*");
        }
        self.emit_property_key(key, computed);
        self.emit_parameters(&f.params);
        self.emit_function_body(f.body);
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    pub(crate) fn emit_function(&mut self, f: &FunctionData) {
        if f.is_async {
            self.write("async");
        }
        self.write(if f.is_generator { "function*" } else { "function" });
        if f.name.is_some() {
            self.write_name(f.name);
        }
        self.emit_parameters(&f.params);
        self.emit_function_body(f.body);
    }

    fn emit_arrow(&mut self, f: &FunctionData) {
        if f.is_async {
            self.write("async");
        }
        let single = matches!(f.params.as_slice(), [p] if matches!(self.arena.data(*p), Some(NodeData::Identifier { .. })));
        if single {
            self.write_name(f.params[0]);
        } else {
            self.emit_parameters(&f.params);
        }
        self.write("=>");
        if f.expression_body {
            let no_in = std::mem::replace(&mut self.no_in, false);
            if self.starts_ambiguously(f.body, true) {
                self.emit_parenthesized(f.body);
            } else {
                self.emit_expression(f.body, PREC_ASSIGN);
            }
            self.no_in = no_in;
        } else {
            self.emit_function_body(f.body);
        }
    }

    fn emit_parameters(&mut self, params: &[NodeIndex]) {
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.write("(");
        self.comma_list(params, |p, param| p.emit_expression(param, PREC_ASSIGN));
        self.write(")");
        self.no_in = no_in;
    }

    fn emit_function_body(&mut self, body: NodeIndex) {
        let no_in = std::mem::replace(&mut self.no_in, false);
        self.emit_statement(body);
        self.no_in = no_in;
    }

    pub(crate) fn emit_class(&mut self, c: &ClassData) {
        self.write("class");
        if c.name.is_some() {
            self.write_name(c.name);
        }
        if c.extends.is_some() {
            self.write("extends");
            self.emit_expression(c.extends, PREC_LHS);
        }
        self.write("{");
        let no_in = std::mem::replace(&mut self.no_in, false);
        for &member in &c.members {
            self.emit_class_member(member);
        }
        self.no_in = no_in;
        self.close_brace();
    }

    fn emit_class_member(&mut self, member: NodeIndex) {
        match self.arena.data(member) {
            Some(&NodeData::MethodDefinition {
                key,
                value,
                kind,
                is_static,
                computed,
            }) => {
                let Some(f) = self.arena.function_data(value).cloned() else {
                    return;
                };
                if is_static {
                    self.write("static");
                }
                let accessor = match kind {
                    MethodKind::Get => Some("get"),
                    MethodKind::Set => Some("set"),
                    MethodKind::Method | MethodKind::Constructor => None,
                };
                self.emit_method(key, computed, accessor, &f);
            }
            Some(&NodeData::PropertyDefinition {
                key,
                value,
                is_static,
                computed,
            }) => {
                if is_static {
                    self.write("static");
                }
                self.emit_property_key(key, computed);
                if value.is_some() {
                    self.write("=");
                    self.emit_expression(value, PREC_ASSIGN);
                }
                self.end_statement();
            }
            Some(NodeData::StaticBlock { body }) => {
                let body = body.clone();
                self.write("static");
                self.write("{");
                self.emit_statements(&body);
                self.close_brace();
            }
            _ => {}
        }
    }
}

