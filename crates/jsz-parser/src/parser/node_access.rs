//! NodeArena access methods and node kind predicates.

use super::base::NodeIndex;
use super::node::*;

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|n| &n.data)
    }

    #[inline]
    pub fn data_mut(&mut self, index: NodeIndex) -> Option<&mut NodeData> {
        self.get_mut(index).map(|n| &mut n.data)
    }

    /// Start offset of a node, 0 for `NONE`.
    #[inline]
    pub fn pos(&self, index: NodeIndex) -> u32 {
        self.get(index).map_or(0, |n| n.pos)
    }

    /// Name of an `Identifier` node.
    pub fn identifier_name(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Name of any name-like node: identifier, property name, private name,
    /// or label.
    pub fn name_text(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::Identifier { name }
            | NodeData::PropertyIdentifier { name }
            | NodeData::PrivateName { name }
            | NodeData::LabelIdentifier { name } => Some(name),
            _ => None,
        }
    }

    /// Static text of a property key (`a`, `"a"`, `1`), if not computed.
    pub fn property_key_text(&self, key: NodeIndex) -> Option<String> {
        match self.data(key)? {
            NodeData::PropertyIdentifier { name } => Some(name.clone()),
            NodeData::StringLiteral { value } => Some(value.clone()),
            NodeData::NumericLiteral { value } => Some(number_key(*value)),
            _ => None,
        }
    }

    pub fn function_data(&self, index: NodeIndex) -> Option<&FunctionData> {
        match self.data(index)? {
            NodeData::FunctionDeclaration(f)
            | NodeData::FunctionExpression(f)
            | NodeData::ArrowFunction(f) => Some(f),
            _ => None,
        }
    }

    pub fn class_data(&self, index: NodeIndex) -> Option<&ClassData> {
        match self.data(index)? {
            NodeData::ClassDeclaration(c) | NodeData::ClassExpression(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_function_like(&self, index: NodeIndex) -> bool {
        self.function_data(index).is_some()
    }

    pub fn is_empty_statement(&self, index: NodeIndex) -> bool {
        matches!(self.data(index), Some(NodeData::Empty))
    }

    /// Literal constants: numbers, strings, booleans, null, `void 0`.
    pub fn is_constant_literal(&self, index: NodeIndex) -> bool {
        match self.data(index) {
            Some(
                NodeData::NumericLiteral { .. }
                | NodeData::StringLiteral { .. }
                | NodeData::BooleanLiteral { .. }
                | NodeData::NullLiteral
                | NodeData::BigIntLiteral { .. },
            ) => true,
            Some(NodeData::Unary {
                op: UnaryOp::Void,
                operand,
            }) => self.is_constant_literal(*operand),
            Some(NodeData::Unary {
                op: UnaryOp::Minus,
                operand,
            }) => matches!(self.data(*operand), Some(NodeData::NumericLiteral { .. })),
            _ => false,
        }
    }

    /// Whether `index` is an `arguments` reference.
    pub fn is_arguments(&self, index: NodeIndex) -> bool {
        self.identifier_name(index) == Some("arguments")
    }
}

impl NodeData {
    /// Whether the node opens its own block scope when it appears as a
    /// statement or loop.
    pub fn is_block_scope(&self) -> bool {
        matches!(
            self,
            NodeData::Block { .. }
                | NodeData::For { .. }
                | NodeData::ForIn { .. }
                | NodeData::ForOf { .. }
                | NodeData::Switch { .. }
                | NodeData::CatchClause { .. }
                | NodeData::StaticBlock { .. }
        )
    }

    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            NodeData::For { .. }
                | NodeData::ForIn { .. }
                | NodeData::ForOf { .. }
                | NodeData::While { .. }
                | NodeData::DoWhile { .. }
        )
    }

    /// Statements after which control never falls through.
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            NodeData::Return { .. }
                | NodeData::Throw { .. }
                | NodeData::Break { .. }
                | NodeData::Continue { .. }
        )
    }

    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            NodeData::VariableStatement { .. }
                | NodeData::FunctionDeclaration(_)
                | NodeData::ClassDeclaration(_)
        )
    }
}

/// Canonical property key text of a numeric key.
pub fn number_key(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
