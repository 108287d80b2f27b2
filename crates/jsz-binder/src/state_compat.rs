//! Compatibility passes for engines that leak catch parameters into the
//! enclosing function and share loop header bindings across closures.

use crate::scopes::{BindingId, DeclKind, ScopeId};
use crate::state::BinderState;
use tracing::debug;

impl BinderState {
    /// Rebind every reference to a catch parameter to a binding of the same
    /// name in the enclosing function, creating a `var` there if needed.
    pub(crate) fn redefine_catch_parameters(&mut self) {
        let catch_params: Vec<BindingId> = self
            .bindings
            .iter()
            .filter(|b| b.kind == DeclKind::CatchParameter)
            .map(|b| b.id)
            .collect();

        for param in catch_params {
            let name = self.binding(param).name.clone();
            let catch_scope = self.binding(param).scope;
            let defun = self.scope(catch_scope).defun;

            let target = match self.resolve_name(defun, &name) {
                Some(existing) if existing != param => existing,
                _ => {
                    let created = self.new_binding(&name, defun, DeclKind::Var);
                    self.scope_mut(defun).names.insert(name.clone(), created);
                    created
                }
            };

            let references = std::mem::take(&mut self.binding_mut(param).references);
            for &reference in &references {
                self.node_bindings.insert(reference, target);
                let from = self.reference_scopes.get(&reference).copied().unwrap_or(catch_scope);
                self.mark_enclosed(from, target);
            }
            self.mark_enclosed(catch_scope, target);
            let entry = self.binding_mut(target);
            entry.references.extend(references);
            self.binding_mut(param).redefined = Some(target);
            debug!(name = %name, "catch parameter redefined");
        }
    }

    /// Make loop header bindings visible as enclosed in every scope of the
    /// loop so no nested name can reuse them.
    pub(crate) fn widen_loop_headers(&mut self) {
        let loops = std::mem::take(&mut self.loop_nodes);
        for node in loops {
            let Some(scope) = self.scope_of(node) else {
                continue;
            };
            let header: Vec<BindingId> = self.scope(scope).names.values().copied().collect();
            if header.is_empty() {
                continue;
            }
            let mut stack: Vec<ScopeId> = vec![scope];
            while let Some(s) = stack.pop() {
                let entry = self.scope_mut(s);
                entry.enclosed.extend(header.iter().copied());
                stack.extend(entry.children.iter().copied());
            }
        }
    }
}
