//! Node definitions.
//!
//! Every node is a `Node { pos, end, data }` stored in a [`NodeArena`]. The
//! node kind is the `NodeData` variant; rewrites replace `data` in place so a
//! node keeps its index (and every side table keyed by it) for its lifetime.

use super::base::{NodeIndex, NodeList};

// =============================================================================
// Operators
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }

    pub fn is_lexical(self) -> bool {
        !matches!(self, VarKind::Var)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }

    pub fn is_word(self) -> bool {
        matches!(self, UnaryOp::TypeOf | UnaryOp::Void | UnaryOp::Delete)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }

    pub fn delta(self) -> f64 {
        match self {
            UpdateOp::Increment => 1.0,
            UpdateOp::Decrement => -1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    In,
    InstanceOf,
    And,
    Or,
    Nullish,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Nullish => "??",
        }
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Nullish => 1,
            BinaryOp::Or => 2,
            BinaryOp::And => 3,
            BinaryOp::BitOr => 4,
            BinaryOp::BitXor => 5,
            BinaryOp::BitAnd => 6,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 7,
            BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::LtEq
            | BinaryOp::GtEq
            | BinaryOp::In
            | BinaryOp::InstanceOf => 8,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 9,
            BinaryOp::Add | BinaryOp::Sub => 10,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 11,
            BinaryOp::Exp => 12,
        }
    }

    /// Short-circuiting operators: the right operand may not be evaluated.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish)
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, BinaryOp::Exp)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Nullish,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Exp => "**=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::And => "&&=",
            AssignOp::Or => "||=",
            AssignOp::Nullish => "??=",
        }
    }

    /// The binary operator a compound assignment applies, `None` for `=`.
    pub fn binary_op(self) -> Option<BinaryOp> {
        let op = match self {
            AssignOp::Assign => return None,
            AssignOp::Add => BinaryOp::Add,
            AssignOp::Sub => BinaryOp::Sub,
            AssignOp::Mul => BinaryOp::Mul,
            AssignOp::Div => BinaryOp::Div,
            AssignOp::Mod => BinaryOp::Mod,
            AssignOp::Exp => BinaryOp::Exp,
            AssignOp::Shl => BinaryOp::Shl,
            AssignOp::Shr => BinaryOp::Shr,
            AssignOp::UShr => BinaryOp::UShr,
            AssignOp::BitAnd => BinaryOp::BitAnd,
            AssignOp::BitOr => BinaryOp::BitOr,
            AssignOp::BitXor => BinaryOp::BitXor,
            AssignOp::And => BinaryOp::And,
            AssignOp::Or => BinaryOp::Or,
            AssignOp::Nullish => BinaryOp::Nullish,
        };
        Some(op)
    }

    /// Logical assignments only write when the short circuit does not fire.
    pub fn is_logical(self) -> bool {
        matches!(self, AssignOp::And | AssignOp::Or | AssignOp::Nullish)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Init,
    Shorthand,
    Method,
    Get,
    Set,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

// =============================================================================
// Compound payloads
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionData {
    /// Name identifier, `NONE` for anonymous functions and arrows.
    pub name: NodeIndex,
    pub params: NodeList,
    /// A `Block`, or an expression when `expression_body` is set.
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
    pub expression_body: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassData {
    pub name: NodeIndex,
    pub extends: NodeIndex,
    pub members: NodeList,
}

// =============================================================================
// NodeData
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    SourceFile {
        statements: NodeList,
        is_module: bool,
    },

    // Names
    /// A binding declaration or reference; resolved by the binder.
    Identifier {
        name: String,
    },
    /// A property name after `.` or an object/class key; never a binding.
    PropertyIdentifier {
        name: String,
    },
    PrivateName {
        name: String,
    },
    LabelIdentifier {
        name: String,
    },

    // Literals
    NumericLiteral {
        value: f64,
    },
    BigIntLiteral {
        digits: String,
    },
    StringLiteral {
        value: String,
    },
    RegExpLiteral {
        raw: String,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    /// `quasis` hold raw template text; there is one more quasi than
    /// expressions.
    TemplateLiteral {
        quasis: Vec<String>,
        expressions: NodeList,
    },
    TaggedTemplate {
        tag: NodeIndex,
        quasi: NodeIndex,
    },
    This,
    Super,
    /// `new.target` and `import.meta`.
    MetaProperty {
        meta: &'static str,
        property: &'static str,
    },

    // Expressions
    /// Elements may be `NONE` for holes.
    ArrayLiteral {
        elements: NodeList,
    },
    ObjectLiteral {
        properties: NodeList,
    },
    Property {
        key: NodeIndex,
        value: NodeIndex,
        kind: PropertyKind,
        computed: bool,
    },
    Spread {
        expression: NodeIndex,
    },
    FunctionExpression(FunctionData),
    ArrowFunction(FunctionData),
    ClassExpression(ClassData),
    Unary {
        op: UnaryOp,
        operand: NodeIndex,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        operand: NodeIndex,
    },
    Binary {
        op: BinaryOp,
        left: NodeIndex,
        right: NodeIndex,
    },
    Assign {
        op: AssignOp,
        target: NodeIndex,
        value: NodeIndex,
    },
    Conditional {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    Call {
        callee: NodeIndex,
        arguments: NodeList,
        optional: bool,
    },
    New {
        callee: NodeIndex,
        arguments: NodeList,
    },
    ImportCall {
        argument: NodeIndex,
    },
    Member {
        object: NodeIndex,
        property: NodeIndex,
        optional: bool,
    },
    Index {
        object: NodeIndex,
        index: NodeIndex,
        optional: bool,
    },
    Sequence {
        expressions: NodeList,
    },
    Yield {
        argument: NodeIndex,
        delegate: bool,
    },
    Await {
        argument: NodeIndex,
    },

    // Patterns
    ArrayPattern {
        elements: NodeList,
    },
    ObjectPattern {
        properties: NodeList,
    },
    AssignmentPattern {
        target: NodeIndex,
        default: NodeIndex,
    },
    Rest {
        argument: NodeIndex,
    },

    // Class members
    MethodDefinition {
        key: NodeIndex,
        value: NodeIndex,
        kind: MethodKind,
        is_static: bool,
        computed: bool,
    },
    PropertyDefinition {
        key: NodeIndex,
        value: NodeIndex,
        is_static: bool,
        computed: bool,
    },
    StaticBlock {
        body: NodeList,
    },

    // Statements
    VariableStatement {
        kind: VarKind,
        declarations: NodeList,
    },
    VariableDeclarator {
        name: NodeIndex,
        init: NodeIndex,
    },
    FunctionDeclaration(FunctionData),
    ClassDeclaration(ClassData),
    ExpressionStatement {
        expression: NodeIndex,
    },
    Block {
        statements: NodeList,
    },
    Empty,
    If {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    For {
        init: NodeIndex,
        test: NodeIndex,
        update: NodeIndex,
        body: NodeIndex,
    },
    ForIn {
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
    },
    ForOf {
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
        is_await: bool,
    },
    While {
        test: NodeIndex,
        body: NodeIndex,
    },
    DoWhile {
        body: NodeIndex,
        test: NodeIndex,
    },
    Return {
        argument: NodeIndex,
    },
    Throw {
        argument: NodeIndex,
    },
    Break {
        label: NodeIndex,
    },
    Continue {
        label: NodeIndex,
    },
    Labeled {
        label: NodeIndex,
        body: NodeIndex,
    },
    Switch {
        discriminant: NodeIndex,
        cases: NodeList,
    },
    /// `test` is `NONE` for `default:`.
    SwitchCase {
        test: NodeIndex,
        consequent: NodeList,
    },
    Try {
        block: NodeIndex,
        handler: NodeIndex,
        finalizer: NodeIndex,
    },
    CatchClause {
        param: NodeIndex,
        body: NodeIndex,
    },
    With {
        object: NodeIndex,
        body: NodeIndex,
    },
    Debugger,

    // Modules
    ImportDeclaration {
        specifiers: NodeList,
        source: String,
    },
    ImportSpecifier {
        imported: String,
        local: NodeIndex,
    },
    ImportDefaultSpecifier {
        local: NodeIndex,
    },
    ImportNamespaceSpecifier {
        local: NodeIndex,
    },
    /// `export <declaration>` or `export { ... } [from "m"]`.
    ExportNamed {
        declaration: NodeIndex,
        specifiers: NodeList,
        source: Option<String>,
    },
    /// `local` is an `Identifier` reference, or a `PropertyIdentifier` when
    /// re-exporting from another module.
    ExportSpecifier {
        local: NodeIndex,
        exported: String,
    },
    ExportDefault {
        declaration: NodeIndex,
    },
    ExportAll {
        exported: Option<String>,
        source: String,
    },
}

/// A node in the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub pos: u32,
    pub end: u32,
    pub data: NodeData,
}

impl Node {
    pub fn new(pos: u32, end: u32, data: NodeData) -> Node {
        Node { pos, end, data }
    }
}

/// Arena owning every node of a program.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
}
