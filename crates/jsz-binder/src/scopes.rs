//! Scope and binding data model.
//!
//! Scopes and bindings live in flat arenas on [`BinderState`](crate::BinderState)
//! and are addressed by [`ScopeId`] / [`BindingId`]. Occurrences (identifier
//! nodes) map to bindings through the binder's side table; nothing here owns
//! tree nodes.

use bitflags::bitflags;
use indexmap::{IndexMap, IndexSet};
use jsz_parser::{BinaryOp, NodeIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl BindingId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    TopLevel,
    Function,
    Block,
}

/// A lexical scope.
#[derive(Clone, Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Nearest enclosing function or top-level scope (itself for those).
    pub defun: ScopeId,
    /// Node that opened this scope.
    pub node: NodeIndex,
    pub children: Vec<ScopeId>,
    /// Declared names in declaration order.
    pub names: IndexMap<String, BindingId>,
    /// Function declarations, by name.
    pub functions: IndexMap<String, BindingId>,
    pub uses_eval: bool,
    pub uses_with: bool,
    /// Set on non-arrow functions whose body reads `arguments`.
    pub uses_arguments: bool,
    pub is_arrow: bool,
    /// Bindings from this scope or outer scopes referenced here or below.
    pub enclosed: IndexSet<BindingId>,
    /// Counter driving name generation in the mangler.
    pub mangle_counter: usize,
}

impl Scope {
    pub(crate) fn new(
        id: ScopeId,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        defun: ScopeId,
        node: NodeIndex,
    ) -> Scope {
        Scope {
            id,
            kind,
            parent,
            defun,
            node,
            children: Vec::new(),
            names: IndexMap::new(),
            functions: IndexMap::new(),
            uses_eval: false,
            uses_with: false,
            uses_arguments: false,
            is_arrow: false,
            enclosed: IndexSet::new(),
            mangle_counter: 0,
        }
    }

    pub fn is_defun(&self) -> bool {
        matches!(self.kind, ScopeKind::TopLevel | ScopeKind::Function)
    }

    /// `eval` or `with` can observe or replace any binding visible here.
    pub fn is_pinned(&self) -> bool {
        self.uses_eval || self.uses_with
    }
}

/// How a binding was introduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    CatchParameter,
    Import,
    /// Implicit `arguments` of a non-arrow function.
    Arguments,
    /// Name of a function expression, visible only inside it.
    FunctionName,
    /// Name of a class expression, visible only inside it.
    ClassName,
    /// Undeclared global.
    Global,
}

impl DeclKind {
    pub fn is_lexical(self) -> bool {
        matches!(self, DeclKind::Let | DeclKind::Const | DeclKind::Class)
    }

    /// Kinds a `var` may coexist with in the same scope.
    pub fn is_var_like(self) -> bool {
        matches!(
            self,
            DeclKind::Var | DeclKind::Function | DeclKind::Parameter
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExportKind {
    #[default]
    None,
    /// `export var/let/const/function/class`: the exported name is the
    /// binding's own name.
    NoMangle,
    /// Exported through a specifier or as the default export.
    WantMangle,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BindingFlags: u16 {
        /// Visible as a property of the global object.
        const GLOBAL = 1 << 0;
        /// Referenced but never declared.
        const UNDECLARED = 1 << 1;
        /// Assigned by a compound assignment or update this round.
        const CHAINED = 1 << 2;
        /// Declared more than once (`var x; var x;`, `var f; function f(){}`).
        const REDECLARED = 1 << 3;
        /// A declaration has an initializer or the binding is a function.
        const INITIALIZED = 1 << 4;
    }
}

/// Statically known value of a binding.
#[derive(Clone, Debug, PartialEq)]
pub enum FixedValue {
    /// Declared without initializer, or an IIFE parameter with no argument.
    Undefined,
    /// The value of an expression node.
    Node(NodeIndex),
    /// A function declaration bound to its own node.
    Function(NodeIndex),
    /// `prev <op>= rhs`.
    Compound {
        op: BinaryOp,
        prev: Box<FixedValue>,
        rhs: NodeIndex,
    },
    /// `prev` after `++`/`--`.
    Update { prev: Box<FixedValue>, delta: f64 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Fixed {
    /// Nothing recorded yet this round.
    #[default]
    Unknown,
    /// Proven unknowable for the rest of the round.
    Cleared,
    Value(FixedValue),
}

impl Fixed {
    pub fn is_cleared(&self) -> bool {
        matches!(self, Fixed::Cleared)
    }

    pub fn value(&self) -> Option<&FixedValue> {
        match self {
            Fixed::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// A named binding.
#[derive(Clone, Debug)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub scope: ScopeId,
    pub kind: DeclKind,
    /// Declaring occurrences.
    pub orig: Vec<NodeIndex>,
    /// Referencing occurrences, in resolution order.
    pub references: Vec<NodeIndex>,
    /// Writes: initialized declarations, assignments, updates.
    pub assignments: u32,
    /// References removed along with dead code.
    pub eliminated: u32,
    /// References replaced by their constant value.
    pub replaced: u32,
    pub flags: BindingFlags,
    pub export: ExportKind,
    pub fixed: Fixed,
    pub mangled_name: Option<String>,
    /// Set on catch parameters redefined in the enclosing function.
    pub redefined: Option<BindingId>,
}

impl Binding {
    pub(crate) fn new(id: BindingId, name: String, scope: ScopeId, kind: DeclKind) -> Binding {
        Binding {
            id,
            name,
            scope,
            kind,
            orig: Vec::new(),
            references: Vec::new(),
            assignments: 0,
            eliminated: 0,
            replaced: 0,
            flags: BindingFlags::empty(),
            export: ExportKind::None,
            fixed: Fixed::Unknown,
            mangled_name: None,
            redefined: None,
        }
    }

    pub fn is_global(&self) -> bool {
        self.flags.contains(BindingFlags::GLOBAL)
    }

    pub fn is_undeclared(&self) -> bool {
        self.flags.contains(BindingFlags::UNDECLARED)
    }

    pub fn is_exported(&self) -> bool {
        self.export != ExportKind::None
    }

    /// References not yet removed by rewrites.
    pub fn live_references(&self) -> usize {
        self.references
            .len()
            .saturating_sub((self.eliminated + self.replaced) as usize)
    }

    /// The name the printer should emit.
    pub fn output_name(&self) -> &str {
        self.mangled_name.as_deref().unwrap_or(&self.name)
    }
}
