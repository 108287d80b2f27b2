//! Reference resolution: binds every collected reference to its binding,
//! fills enclosed sets and propagates `eval`/`with` pinning.

use crate::scopes::{BindingFlags, BindingId, DeclKind, ExportKind, ScopeId, ScopeKind};
use crate::state::{BindError, BindErrorKind, BinderState, PendingReference};
use jsz_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use jsz_parser::NodeArena;
use tracing::debug;

impl BinderState {
    pub(crate) fn resolve_references(&mut self, arena: &NodeArena) -> Result<(), BindError> {
        let pending = std::mem::take(&mut self.pending_references);
        for reference in &pending {
            let Some(name) = arena.identifier_name(reference.node) else {
                continue;
            };
            let binding = self.lookup_or_declare_global(name, reference.scope);

            self.node_bindings.insert(reference.node, binding);
            self.reference_scopes.insert(reference.node, reference.scope);
            let entry = self.binding_mut(binding);
            entry.references.push(reference.node);
            if reference.is_write {
                entry.assignments += 1;
            }
            self.mark_enclosed(reference.scope, binding);

            if name == "eval"
                && (self.options.treat_eval_as_unknown || self.eval_calls.contains(&reference.node))
            {
                self.mark_pinned(reference.scope, true);
            }
            self.check_use_before_declaration(arena, reference, binding)?;
        }

        // A `var` declared inside a block occupies its name in every scope
        // between the block and the hoisting target.
        let nested = std::mem::take(&mut self.nested_declarations);
        for &(ident, scope) in &nested {
            if let Some(binding) = self.binding_of(ident) {
                self.mark_enclosed(scope, binding);
            }
        }
        self.nested_declarations = nested;

        let with_scopes = std::mem::take(&mut self.with_scopes);
        for scope in with_scopes {
            self.mark_pinned(scope, false);
        }

        let exported = std::mem::take(&mut self.export_references);
        for node in exported {
            if let Some(binding) = self.binding_of(node) {
                let binding = self.binding_mut(binding);
                if binding.export == ExportKind::None {
                    binding.export = ExportKind::WantMangle;
                }
            }
        }

        debug!(references = pending.len(), "references resolved");
        Ok(())
    }

    /// Innermost binding of `name` visible from `scope`. Non-arrow functions
    /// get an implicit `arguments` binding on first use; anything else
    /// unresolved becomes an undeclared global.
    fn lookup_or_declare_global(&mut self, name: &str, scope: ScopeId) -> BindingId {
        let mut current = Some(scope);
        let mut steps = 0;
        while let Some(s) = current
            && steps < MAX_SCOPE_WALK_ITERATIONS
        {
            if let Some(&binding) = self.scope(s).names.get(name) {
                return binding;
            }
            let candidate = self.scope(s);
            if name == "arguments"
                && candidate.kind == ScopeKind::Function
                && !candidate.is_arrow
            {
                let binding = self.new_binding(name, s, DeclKind::Arguments);
                let scope = self.scope_mut(s);
                scope.names.insert(name.to_string(), binding);
                scope.uses_arguments = true;
                return binding;
            }
            current = candidate.parent;
            steps += 1;
        }

        if let Some(&binding) = self.globals.get(name) {
            return binding;
        }
        let root = self.root_scope();
        let binding = self.new_binding(name, root, DeclKind::Global);
        self.binding_mut(binding).flags |= BindingFlags::GLOBAL | BindingFlags::UNDECLARED;
        self.globals.insert(name.to_string(), binding);
        binding
    }

    /// Pin `scope` and all its ancestors.
    fn mark_pinned(&mut self, scope: ScopeId, by_eval: bool) {
        let chain: Vec<ScopeId> = self.scope_chain(scope).collect();
        for s in chain {
            let scope = self.scope_mut(s);
            if by_eval {
                scope.uses_eval = true;
            } else {
                scope.uses_with = true;
            }
        }
    }

    /// A lexical binding read before its declaration within the same function
    /// is always a runtime error.
    fn check_use_before_declaration(
        &self,
        arena: &NodeArena,
        reference: &PendingReference,
        binding: BindingId,
    ) -> Result<(), BindError> {
        let entry = self.binding(binding);
        if !entry.kind.is_lexical() {
            return Ok(());
        }
        let Some(&declaration) = entry.orig.first() else {
            return Ok(());
        };
        if self.scope(reference.scope).defun != self.scope(entry.scope).defun {
            return Ok(());
        }
        if arena.pos(reference.node) < arena.pos(declaration) {
            return Err(self.error_at(
                arena,
                reference.node,
                BindErrorKind::UseBeforeDeclaration,
                &entry.name,
            ));
        }
        Ok(())
    }
}
