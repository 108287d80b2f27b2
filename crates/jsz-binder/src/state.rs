//! Binder state: scope and binding arenas, side tables and errors.

use crate::scopes::{Binding, BindingFlags, BindingId, DeclKind, ExportKind, Scope, ScopeId, ScopeKind};
use indexmap::IndexMap;
use jsz_common::diagnostics::{Diagnostic, diagnostic_codes, diagnostic_messages, format_message};
use jsz_common::limits::{MAX_SCOPE_WALK_ITERATIONS, NODES_PER_BINDING_ESTIMATE};
use jsz_common::{LineMap, Span};
use jsz_parser::{NodeArena, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use tracing::{debug, debug_span};

/// Options controlling scope construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BinderOptions {
    /// Redefine catch parameters in the enclosing function and widen loop
    /// header bindings, for engines with broken scoping.
    pub compatibility_mode: bool,
    /// Any reference to `eval`, not just a direct call, pins its scopes.
    pub treat_eval_as_unknown: bool,
    /// The source is an ES module.
    pub is_module: bool,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindErrorKind {
    Redeclaration,
    ModuleOnlyConstruct,
    UndefinedLabel,
    DuplicateLabel,
    UseBeforeDeclaration,
}

/// A structural error in the program. Binding stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindError {
    pub kind: BindErrorKind,
    pub name: String,
    pub file: String,
    /// One-based line.
    pub line: u32,
    /// One-based column.
    pub column: u32,
    pub span: Span,
}

impl BindError {
    pub fn code(&self) -> u32 {
        match self.kind {
            BindErrorKind::Redeclaration => diagnostic_codes::REDECLARATION,
            BindErrorKind::ModuleOnlyConstruct => diagnostic_codes::MODULE_ONLY_CONSTRUCT,
            BindErrorKind::UndefinedLabel => diagnostic_codes::UNDEFINED_LABEL,
            BindErrorKind::DuplicateLabel => diagnostic_codes::DUPLICATE_LABEL,
            BindErrorKind::UseBeforeDeclaration => diagnostic_codes::USE_BEFORE_DECLARATION,
        }
    }

    pub fn message(&self) -> String {
        let template = match self.kind {
            BindErrorKind::Redeclaration => diagnostic_messages::REDECLARATION,
            BindErrorKind::ModuleOnlyConstruct => diagnostic_messages::MODULE_ONLY_CONSTRUCT,
            BindErrorKind::UndefinedLabel => diagnostic_messages::UNDEFINED_LABEL,
            BindErrorKind::DuplicateLabel => diagnostic_messages::DUPLICATE_LABEL,
            BindErrorKind::UseBeforeDeclaration => diagnostic_messages::USE_BEFORE_DECLARATION,
        };
        format_message(template, &[&self.name])
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.file.clone(), self.span, self.message(), self.code())
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file,
            self.line,
            self.column,
            self.message()
        )
    }
}

impl std::error::Error for BindError {}

// =============================================================================
// BinderState
// =============================================================================

/// A reference occurrence waiting for resolution.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PendingReference {
    pub node: NodeIndex,
    pub scope: ScopeId,
    pub is_write: bool,
}

/// Scope graph of one program.
#[derive(Debug)]
pub struct BinderState {
    pub options: BinderOptions,
    pub file_name: String,
    pub scopes: Vec<Scope>,
    pub bindings: Vec<Binding>,
    /// Occurrence (declaring or referencing identifier) -> binding.
    pub node_bindings: FxHashMap<NodeIndex, BindingId>,
    /// Scope-opening node -> scope. Function bodies and catch bodies map to
    /// the scope of their function/clause.
    pub node_scopes: FxHashMap<NodeIndex, ScopeId>,
    /// Reference occurrence -> scope it occurs in.
    pub reference_scopes: FxHashMap<NodeIndex, ScopeId>,
    /// Undeclared names, one binding each.
    pub globals: IndexMap<String, BindingId>,

    // Construction state
    pub(crate) line_map: LineMap,
    pub(crate) current_scope: Option<ScopeId>,
    /// Active labels per function.
    pub(crate) label_stack: Vec<Vec<String>>,
    pub(crate) pending_export: ExportKind,
    pub(crate) pending_references: Vec<PendingReference>,
    /// Declaring occurrences of `var`s nested in blocks below their scope.
    pub(crate) nested_declarations: Vec<(NodeIndex, ScopeId)>,
    pub(crate) eval_calls: FxHashSet<NodeIndex>,
    pub(crate) with_scopes: Vec<ScopeId>,
    pub(crate) export_references: Vec<NodeIndex>,
    pub(crate) loop_nodes: Vec<NodeIndex>,
}

impl BinderState {
    pub fn new(file_name: impl Into<String>, options: BinderOptions) -> BinderState {
        BinderState {
            options,
            file_name: file_name.into(),
            scopes: Vec::new(),
            bindings: Vec::new(),
            node_bindings: FxHashMap::default(),
            node_scopes: FxHashMap::default(),
            reference_scopes: FxHashMap::default(),
            globals: IndexMap::new(),
            line_map: LineMap::default(),
            current_scope: None,
            label_stack: Vec::new(),
            pending_export: ExportKind::None,
            pending_references: Vec::new(),
            nested_declarations: Vec::new(),
            eval_calls: FxHashSet::default(),
            with_scopes: Vec::new(),
            export_references: Vec::new(),
            loop_nodes: Vec::new(),
        }
    }

    /// Build the scope graph for the tree rooted at `root`.
    pub fn bind_source_file(
        &mut self,
        arena: &NodeArena,
        root: NodeIndex,
        line_map: &LineMap,
    ) -> Result<(), BindError> {
        let _span = debug_span!("bind", file = %self.file_name).entered();
        self.line_map = line_map.clone();
        self.bindings
            .reserve(arena.len() / NODES_PER_BINDING_ESTIMATE);

        self.declare_source_file(arena, root)?;
        self.resolve_references(arena)?;
        if self.options.compatibility_mode {
            self.redefine_catch_parameters();
            self.widen_loop_headers();
        }

        debug!(
            scopes = self.scopes.len(),
            bindings = self.bindings.len(),
            globals = self.globals.len(),
            "scope graph built"
        );
        self.pending_references.clear();
        self.nested_declarations.clear();
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    #[inline]
    pub fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id.index()]
    }

    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    #[inline]
    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn root_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Binding of a declaring or referencing occurrence.
    pub fn binding_of(&self, node: NodeIndex) -> Option<BindingId> {
        self.node_bindings.get(&node).copied()
    }

    pub fn scope_of(&self, node: NodeIndex) -> Option<ScopeId> {
        self.node_scopes.get(&node).copied()
    }

    pub fn is_reference(&self, node: NodeIndex) -> bool {
        self.reference_scopes.contains_key(&node)
    }

    /// Whether `eval` or `with` can reach the binding.
    pub fn is_pinned(&self, id: BindingId) -> bool {
        self.scope(self.binding(id).scope).is_pinned()
    }

    /// `scope` and its ancestors, innermost first.
    pub fn scope_chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |s| self.scope(*s).parent)
            .take(MAX_SCOPE_WALK_ITERATIONS)
    }

    /// Look `name` up from `scope` outward.
    pub fn resolve_name(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        self.scope_chain(scope)
            .find_map(|s| self.scope(s).names.get(name).copied())
            .or_else(|| self.globals.get(name).copied())
    }

    /// All scopes in pre-order (parents before children, siblings in source
    /// order).
    pub fn scopes_preorder(&self) -> Vec<ScopeId> {
        let mut out = Vec::with_capacity(self.scopes.len());
        if self.scopes.is_empty() {
            return out;
        }
        let mut stack = vec![self.root_scope()];
        while let Some(scope) = stack.pop() {
            out.push(scope);
            stack.extend(self.scope(scope).children.iter().rev().copied());
        }
        out
    }

    /// Whether `inner` is `outer` or nested inside it.
    pub fn is_scope_within(&self, inner: ScopeId, outer: ScopeId) -> bool {
        self.scope_chain(inner).any(|s| s == outer)
    }

    // =========================================================================
    // Construction helpers
    // =========================================================================

    pub(crate) fn current(&self) -> ScopeId {
        self.current_scope.unwrap_or(ScopeId(0))
    }

    pub(crate) fn push_scope(&mut self, kind: ScopeKind, node: NodeIndex) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        let parent = self.current_scope;
        let defun = match (kind, parent) {
            (ScopeKind::Block, Some(p)) => self.scope(p).defun,
            _ => id,
        };
        self.scopes.push(Scope::new(id, kind, parent, defun, node));
        if let Some(p) = parent {
            self.scope_mut(p).children.push(id);
        }
        self.node_scopes.insert(node, id);
        self.current_scope = Some(id);
        id
    }

    pub(crate) fn pop_scope(&mut self) {
        let current = self.current();
        self.current_scope = self.scope(current).parent;
    }

    pub(crate) fn new_binding(&mut self, name: &str, scope: ScopeId, kind: DeclKind) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        let mut binding = Binding::new(id, name.to_string(), scope, kind);
        if self.scope(scope).kind == ScopeKind::TopLevel
            && !self.options.is_module
            && kind != DeclKind::Arguments
        {
            binding.flags |= BindingFlags::GLOBAL;
        }
        self.bindings.push(binding);
        id
    }

    /// Record `binding` in the enclosed set of every scope from `from` up to
    /// and including the binding's own scope.
    pub(crate) fn mark_enclosed(&mut self, from: ScopeId, binding: BindingId) {
        let target = self.binding(binding).scope;
        let mut scope = Some(from);
        let mut steps = 0;
        while let Some(s) = scope {
            self.scope_mut(s).enclosed.insert(binding);
            if s == target || steps >= MAX_SCOPE_WALK_ITERATIONS {
                break;
            }
            steps += 1;
            scope = self.scope(s).parent;
        }
    }

    pub(crate) fn error_at(
        &self,
        arena: &NodeArena,
        node: NodeIndex,
        kind: BindErrorKind,
        name: &str,
    ) -> BindError {
        let span = arena
            .get(node)
            .map_or(Span::default(), |n| Span::new(n.pos, n.end));
        let position = self.line_map.offset_to_position(span.start);
        BindError {
            kind,
            name: name.to_string(),
            file: self.file_name.clone(),
            line: position.line + 1,
            column: position.column + 1,
            span,
        }
    }
}
