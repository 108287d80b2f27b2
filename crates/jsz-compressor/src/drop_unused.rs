//! Unused binding elimination.
//!
//! Each sweep recounts how every binding is used in the current tree, then
//! removes declarations, dead stores, trailing parameters and import
//! specifiers of bindings nothing reads. Side effects of removed
//! initializers survive as expression statements, in their original order.
//! Sweeps repeat until nothing changes, since one removal can make another
//! binding unused.

use crate::options::CompressOptions;
use crate::side_effects::{class_effects, has_side_effects};
use crate::tree::{
    ParentMap, eliminate_references, is_attached, is_result_unused, is_within, is_write_target,
    make_expression_statement, make_sequence, move_node, parent_map, statement_list,
    statement_list_mut, warn,
};
use jsz_binder::{BinderState, BindingId, DeclKind};
use jsz_common::DiagnosticBag;
use jsz_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use jsz_parser::{
    MethodKind, NodeArena, NodeData, NodeIndex, PropertyKind, VarKind, descendants,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Bound on sweeps per round.
const MAX_SWEEPS: usize = 16;

/// Remove unused bindings until a fixpoint; returns the number of removals.
pub(crate) fn drop_unused(
    arena: &mut NodeArena,
    binder: &mut BinderState,
    options: &CompressOptions,
    diagnostics: &mut DiagnosticBag,
    root: NodeIndex,
) -> usize {
    let mut total = 0;
    for sweep in 0..MAX_SWEEPS {
        let changes = UnusedEliminator::new(arena, binder, options, diagnostics, root).run();
        debug!(sweep, changes, "unused binding sweep");
        total += changes;
        if changes == 0 {
            break;
        }
    }
    total
}

/// Pieces of a split declaration list.
enum Piece {
    Declarators(Vec<NodeIndex>),
    Effects(Vec<NodeIndex>),
}

struct UnusedEliminator<'a> {
    arena: &'a mut NodeArena,
    binder: &'a mut BinderState,
    options: &'a CompressOptions,
    diagnostics: &'a mut DiagnosticBag,
    root: NodeIndex,
    parents: ParentMap,
    /// Occurrences that read the binding's value.
    reads: FxHashMap<BindingId, u32>,
    /// All referencing occurrences, reads and writes.
    occurrences: FxHashMap<BindingId, u32>,
    changes: usize,
}

impl<'a> UnusedEliminator<'a> {
    fn new(
        arena: &'a mut NodeArena,
        binder: &'a mut BinderState,
        options: &'a CompressOptions,
        diagnostics: &'a mut DiagnosticBag,
        root: NodeIndex,
    ) -> Self {
        UnusedEliminator {
            arena,
            binder,
            options,
            diagnostics,
            root,
            parents: ParentMap::default(),
            reads: FxHashMap::default(),
            occurrences: FxHashMap::default(),
            changes: 0,
        }
    }

    fn run(mut self) -> usize {
        self.parents = parent_map(self.arena, self.root);
        self.count_usage();
        self.sweep_expressions();
        self.sweep_statements();
        self.changes
    }

    // =========================================================================
    // Usage
    // =========================================================================

    fn count_usage(&mut self) {
        let declarations = self.declaration_nodes();
        for idx in descendants(self.arena, self.root) {
            if !self.binder.is_reference(idx)
                || !matches!(self.arena.data(idx), Some(NodeData::Identifier { .. }))
            {
                continue;
            }
            let Some(id) = self.binder.binding_of(idx) else {
                continue;
            };
            // A function or class mentioning itself does not keep itself alive.
            if declarations
                .get(&id)
                .is_some_and(|nodes| nodes.iter().any(|&d| is_within(&self.parents, idx, d)))
            {
                continue;
            }
            *self.occurrences.entry(id).or_default() += 1;
            if !is_write_target(self.arena, &self.parents, idx) && !self.is_discarded_update(idx) {
                *self.reads.entry(id).or_default() += 1;
            }
        }
    }

    /// Function and class declarations by the binding they declare.
    fn declaration_nodes(&self) -> FxHashMap<BindingId, Vec<NodeIndex>> {
        let mut out: FxHashMap<BindingId, Vec<NodeIndex>> = FxHashMap::default();
        for idx in descendants(self.arena, self.root) {
            let name = match self.arena.data(idx) {
                Some(NodeData::FunctionDeclaration(f)) => f.name,
                Some(NodeData::ClassDeclaration(c)) => c.name,
                _ => continue,
            };
            if let Some(id) = self.binder.binding_of(name) {
                out.entry(id).or_default().push(idx);
            }
        }
        out
    }

    /// `x++` or `x += 1` whose result nobody looks at.
    fn is_discarded_update(&self, idx: NodeIndex) -> bool {
        let Some(&parent) = self.parents.get(&idx) else {
            return false;
        };
        let updates = match self.arena.data(parent) {
            Some(NodeData::Update { .. }) => true,
            Some(NodeData::Assign { op, target, .. }) => {
                *target == idx && op.binary_op().is_some() && !op.is_logical()
            }
            _ => false,
        };
        updates && is_result_unused(self.arena, &self.parents, parent)
    }

    fn is_retained(&self, id: BindingId) -> bool {
        let binding = self.binder.binding(id);
        binding.is_exported()
            || binding.is_undeclared()
            || (binding.is_global() && !self.options.toplevel)
            || self.binder.is_pinned(id)
            || binding.redefined.is_some()
            || (binding.scope == self.binder.root_scope() && self.options.retains(&binding.name))
            || matches!(
                binding.kind,
                DeclKind::Arguments
                    | DeclKind::Global
                    | DeclKind::FunctionName
                    | DeclKind::ClassName
                    | DeclKind::CatchParameter
            )
    }

    fn is_unread(&self, id: BindingId) -> bool {
        !self.is_retained(id) && self.reads.get(&id).copied().unwrap_or(0) == 0
    }

    /// Sloppy-mode `arguments[i]` observes writes to parameter `i`.
    fn is_aliased_by_arguments(&self, id: BindingId) -> bool {
        let binding = self.binder.binding(id);
        binding.kind == DeclKind::Parameter && self.binder.scope(binding.scope).uses_arguments
    }

    /// No occurrence left at all: the declaration itself can go.
    fn is_unreferenced(&self, id: BindingId) -> bool {
        !self.is_retained(id) && self.occurrences.get(&id).copied().unwrap_or(0) == 0
    }

    fn warn_binding(&mut self, id: BindingId, fallback: NodeIndex, code: u32, message: &str) {
        let binding = self.binder.binding(id);
        let at = binding.orig.first().copied().unwrap_or(fallback);
        let name = binding.name.clone();
        trace!(name = %name, code, "dropping");
        warn(self.diagnostics, self.arena, at, code, message, &[&name]);
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn sweep_expressions(&mut self) {
        for idx in descendants(self.arena, self.root) {
            if !is_attached(self.arena, &self.parents, idx, self.root) {
                continue;
            }
            match self.arena.data(idx) {
                Some(NodeData::Assign { .. }) => self.drop_dead_store(idx),
                Some(NodeData::Update { .. }) => self.drop_dead_update(idx),
                Some(
                    NodeData::FunctionDeclaration(_)
                    | NodeData::FunctionExpression(_)
                    | NodeData::ArrowFunction(_),
                ) => self.trim_parameters(idx),
                Some(NodeData::ImportDeclaration { .. }) => self.trim_imports(idx),
                Some(NodeData::Sequence { .. }) => self.drop_pure_sequence_items(idx),
                _ => {}
            }
        }
    }

    fn drop_dead_store(&mut self, idx: NodeIndex) {
        let Some(&NodeData::Assign { op, target, value }) = self.arena.data(idx) else {
            return;
        };
        if op.is_logical() || (op.binary_op().is_some() && !is_result_unused(self.arena, &self.parents, idx)) {
            return;
        }
        let Some(NodeData::Identifier { .. }) = self.arena.data(target) else {
            return;
        };
        let Some(id) = self.binder.binding_of(target) else {
            return;
        };
        if !self.is_unread(id) || self.is_aliased_by_arguments(id) {
            return;
        }
        self.warn_binding(
            id,
            target,
            diagnostic_codes::DROPPING_DEAD_STORE,
            diagnostic_messages::DROPPING_DEAD_STORE,
        );
        self.binder.binding_mut(id).eliminated += 1;
        self.binder.node_bindings.remove(&target);
        self.binder.reference_scopes.remove(&target);
        move_node(self.arena, self.binder, value, idx);
        self.changes += 1;
    }

    fn drop_dead_update(&mut self, idx: NodeIndex) {
        let Some(&NodeData::Update { operand, .. }) = self.arena.data(idx) else {
            return;
        };
        let Some(NodeData::Identifier { .. }) = self.arena.data(operand) else {
            return;
        };
        let Some(id) = self.binder.binding_of(operand) else {
            return;
        };
        if !self.is_unread(id)
            || self.is_aliased_by_arguments(id)
            || !is_result_unused(self.arena, &self.parents, idx)
        {
            return;
        }
        self.warn_binding(
            id,
            operand,
            diagnostic_codes::DROPPING_DEAD_STORE,
            diagnostic_messages::DROPPING_DEAD_STORE,
        );
        self.binder.binding_mut(id).eliminated += 1;
        self.binder.node_bindings.remove(&operand);
        self.binder.reference_scopes.remove(&operand);
        // A pure placeholder; the statement or sequence around it drops it.
        self.arena.replace(idx, NodeData::NumericLiteral { value: 0.0 });
        self.changes += 1;
    }

    fn trim_parameters(&mut self, idx: NodeIndex) {
        let Some(scope) = self.binder.scope_of(idx) else {
            return;
        };
        let scope = self.binder.scope(scope);
        if scope.uses_arguments || scope.is_pinned() || self.is_setter(idx) {
            return;
        }
        let Some(f) = self.arena.function_data(idx) else {
            return;
        };
        let mut params = f.params.clone();
        let before = params.len();
        while let Some(&last) = params.last() {
            let Some(NodeData::Identifier { .. }) = self.arena.data(last) else {
                break;
            };
            let Some(id) = self.binder.binding_of(last) else {
                break;
            };
            if !self.is_unreferenced(id) {
                break;
            }
            self.warn_binding(
                id,
                last,
                diagnostic_codes::DROPPING_UNUSED_PARAMETER,
                diagnostic_messages::DROPPING_UNUSED_PARAMETER,
            );
            params.pop();
        }
        if params.len() == before {
            return;
        }
        if let Some(
            NodeData::FunctionDeclaration(f)
            | NodeData::FunctionExpression(f)
            | NodeData::ArrowFunction(f),
        ) = self.arena.data_mut(idx)
        {
            f.params = params;
        }
        self.changes += 1;
    }

    fn is_setter(&self, function: NodeIndex) -> bool {
        let Some(&parent) = self.parents.get(&function) else {
            return false;
        };
        matches!(
            self.arena.data(parent),
            Some(NodeData::MethodDefinition {
                kind: MethodKind::Set,
                ..
            }) | Some(NodeData::Property {
                kind: PropertyKind::Set,
                ..
            })
        )
    }

    fn trim_imports(&mut self, idx: NodeIndex) {
        let Some(NodeData::ImportDeclaration { specifiers, .. }) = self.arena.data(idx) else {
            return;
        };
        let mut kept = Vec::with_capacity(specifiers.len());
        let mut dropped = Vec::new();
        for &specifier in specifiers {
            let local = match self.arena.data(specifier) {
                Some(
                    NodeData::ImportSpecifier { local, .. }
                    | NodeData::ImportDefaultSpecifier { local }
                    | NodeData::ImportNamespaceSpecifier { local },
                ) => *local,
                _ => NodeIndex::NONE,
            };
            match self.binder.binding_of(local) {
                Some(id) if self.is_unreferenced(id) => dropped.push((id, local)),
                _ => kept.push(specifier),
            }
        }
        if dropped.is_empty() {
            return;
        }
        for (id, local) in dropped {
            self.warn_binding(
                id,
                local,
                diagnostic_codes::DROPPING_UNUSED_IMPORT,
                diagnostic_messages::DROPPING_UNUSED_IMPORT,
            );
        }
        if let Some(NodeData::ImportDeclaration { specifiers, .. }) = self.arena.data_mut(idx) {
            *specifiers = kept;
        }
        self.changes += 1;
    }

    /// `(a, 1, b)` -> `(a, b)`: only the last item's value is used.
    fn drop_pure_sequence_items(&mut self, idx: NodeIndex) {
        let Some(NodeData::Sequence { expressions }) = self.arena.data(idx) else {
            return;
        };
        let Some((&last, rest)) = expressions.split_last() else {
            return;
        };
        let kept: Vec<NodeIndex> = rest
            .iter()
            .copied()
            .filter(|&e| has_side_effects(self.arena, self.binder, e))
            .chain(std::iter::once(last))
            .collect();
        if kept.len() == expressions.len() {
            return;
        }
        let dropped: Vec<NodeIndex> = rest.iter().copied().filter(|e| !kept.contains(e)).collect();
        for expression in dropped {
            eliminate_references(self.arena, self.binder, expression);
        }
        if kept.len() == 1 {
            move_node(self.arena, self.binder, last, idx);
        } else if let Some(NodeData::Sequence { expressions }) = self.arena.data_mut(idx) {
            *expressions = kept;
        }
        self.changes += 1;
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn sweep_statements(&mut self) {
        let nodes = descendants(self.arena, self.root);
        for &owner in &nodes {
            let Some(list) = statement_list(self.arena, owner) else {
                continue;
            };
            let list = list.clone();
            let mut out = Vec::with_capacity(list.len());
            let mut changed = false;
            for statement in list {
                let replacement = self.rewrite_statement(statement, true);
                changed |= replacement.as_slice() != [statement];
                out.extend(replacement);
            }
            changed |= self.merge_expression_statements(&mut out);
            if changed && let Some(list) = statement_list_mut(self.arena, owner) {
                *list = out;
                self.changes += 1;
            }
        }
        for &idx in &nodes {
            for slot in self.statement_slots(idx) {
                self.rewrite_slot(slot);
            }
            if let Some(&NodeData::For { init, .. }) = self.arena.data(idx) {
                self.trim_for_init(idx, init);
            }
        }
    }

    /// Single-statement positions: bodies of `if`, loops, labels and `with`.
    fn statement_slots(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let slots = match self.arena.data(idx) {
            Some(NodeData::If {
                consequent,
                alternate,
                ..
            }) => vec![*consequent, *alternate],
            Some(
                NodeData::For { body, .. }
                | NodeData::ForIn { body, .. }
                | NodeData::ForOf { body, .. }
                | NodeData::While { body, .. }
                | NodeData::DoWhile { body, .. }
                | NodeData::Labeled { body, .. }
                | NodeData::With { body, .. },
            ) => vec![*body],
            _ => Vec::new(),
        };
        slots.into_iter().filter(|s| s.is_some()).collect()
    }

    fn rewrite_slot(&mut self, slot: NodeIndex) {
        let mut replacement = self.rewrite_statement(slot, false);
        if replacement.as_slice() == [slot] {
            return;
        }
        match replacement.len() {
            0 => self.arena.make_empty(slot),
            1 => {
                let single = replacement.remove(0);
                move_node(self.arena, self.binder, single, slot);
            }
            _ => {
                self.arena.replace(
                    slot,
                    NodeData::Block {
                        statements: replacement,
                    },
                );
            }
        }
        self.changes += 1;
    }

    /// Statements that take the place of `statement`; `[statement]` when it
    /// stays as is.
    fn rewrite_statement(&mut self, statement: NodeIndex, in_list: bool) -> Vec<NodeIndex> {
        let keep = vec![statement];
        let Some(data) = self.arena.data(statement) else {
            return keep;
        };
        match data {
            NodeData::VariableStatement { kind, declarations } => {
                let (kind, declarations) = (*kind, declarations.clone());
                self.rewrite_declarations(statement, kind, &declarations)
            }
            NodeData::FunctionDeclaration(f) => {
                let name = f.name;
                match self.binder.binding_of(name) {
                    Some(id) if self.is_unreferenced(id) => {
                        self.warn_binding(
                            id,
                            name,
                            diagnostic_codes::DROPPING_UNUSED_FUNCTION,
                            diagnostic_messages::DROPPING_UNUSED_FUNCTION,
                        );
                        eliminate_references(self.arena, self.binder, statement);
                        Vec::new()
                    }
                    _ => keep,
                }
            }
            NodeData::ClassDeclaration(c) => {
                let name = c.name;
                let Some(id) = self.binder.binding_of(name).filter(|&id| self.is_unreferenced(id))
                else {
                    return keep;
                };
                let Some(effects) = class_effects(self.arena, self.binder, statement) else {
                    return keep;
                };
                self.warn_binding(
                    id,
                    name,
                    diagnostic_codes::DROPPING_UNUSED_CLASS,
                    diagnostic_messages::DROPPING_UNUSED_CLASS,
                );
                if effects.is_empty() {
                    eliminate_references(self.arena, self.binder, statement);
                    return Vec::new();
                }
                let expression = make_sequence(self.arena, effects);
                vec![make_expression_statement(self.arena, expression)]
            }
            NodeData::ExpressionStatement { expression } => {
                let expression = *expression;
                let directive = matches!(self.arena.data(expression), Some(NodeData::StringLiteral { .. }));
                if directive || has_side_effects(self.arena, self.binder, expression) {
                    return keep;
                }
                eliminate_references(self.arena, self.binder, expression);
                Vec::new()
            }
            NodeData::Empty if in_list => Vec::new(),
            _ => keep,
        }
    }

    fn rewrite_declarations(
        &mut self,
        statement: NodeIndex,
        kind: VarKind,
        declarations: &[NodeIndex],
    ) -> Vec<NodeIndex> {
        let mut pieces: Vec<Piece> = Vec::new();
        let mut dropped_any = false;
        for &declarator in declarations {
            let Some(&NodeData::VariableDeclarator { name, init }) = self.arena.data(declarator) else {
                continue;
            };
            let unused = match self.arena.data(name) {
                Some(NodeData::Identifier { .. }) => self
                    .binder
                    .binding_of(name)
                    .filter(|&id| self.is_unreferenced(id)),
                _ => None,
            };
            let Some(id) = unused else {
                match pieces.last_mut() {
                    Some(Piece::Declarators(list)) => list.push(declarator),
                    _ => pieces.push(Piece::Declarators(vec![declarator])),
                }
                continue;
            };
            dropped_any = true;
            if init.is_some() && has_side_effects(self.arena, self.binder, init) {
                self.warn_binding(
                    id,
                    name,
                    diagnostic_codes::SIDE_EFFECTS_IN_UNUSED_INITIALIZER,
                    diagnostic_messages::SIDE_EFFECTS_IN_UNUSED_INITIALIZER,
                );
                match pieces.last_mut() {
                    Some(Piece::Effects(list)) => list.push(init),
                    _ => pieces.push(Piece::Effects(vec![init])),
                }
            } else {
                let (code, message) = if self.binder.binding(id).eliminated > 0 {
                    (
                        diagnostic_codes::DROPPING_VARIABLE_REFERENCED_BY_REMOVED_CODE,
                        diagnostic_messages::DROPPING_VARIABLE_REFERENCED_BY_REMOVED_CODE,
                    )
                } else {
                    (
                        diagnostic_codes::DROPPING_UNUSED_VARIABLE,
                        diagnostic_messages::DROPPING_UNUSED_VARIABLE,
                    )
                };
                self.warn_binding(id, name, code, message);
                eliminate_references(self.arena, self.binder, init);
            }
        }
        if !dropped_any {
            return vec![statement];
        }
        pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Declarators(declarations) => self
                    .arena
                    .add_like(statement, NodeData::VariableStatement { kind, declarations }),
                Piece::Effects(effects) => {
                    let expression = make_sequence(self.arena, effects);
                    make_expression_statement(self.arena, expression)
                }
            })
            .collect()
    }

    /// Only pure declarators can leave a `for` initializer.
    fn trim_for_init(&mut self, for_node: NodeIndex, init: NodeIndex) {
        let Some(NodeData::VariableStatement { declarations, .. }) = self.arena.data(init) else {
            return;
        };
        let mut kept = Vec::with_capacity(declarations.len());
        let mut dropped = Vec::new();
        for &declarator in declarations {
            let removable = match self.arena.data(declarator) {
                Some(&NodeData::VariableDeclarator { name, init }) => self
                    .binder
                    .binding_of(name)
                    .filter(|_| matches!(self.arena.data(name), Some(NodeData::Identifier { .. })))
                    .filter(|&id| self.is_unreferenced(id))
                    .filter(|_| !has_side_effects(self.arena, self.binder, init))
                    .map(|id| (id, name, init)),
                _ => None,
            };
            match removable {
                Some(entry) => dropped.push(entry),
                None => kept.push(declarator),
            }
        }
        if dropped.is_empty() {
            return;
        }
        for (id, name, value) in dropped {
            self.warn_binding(
                id,
                name,
                diagnostic_codes::DROPPING_UNUSED_VARIABLE,
                diagnostic_messages::DROPPING_UNUSED_VARIABLE,
            );
            eliminate_references(self.arena, self.binder, value);
        }
        if kept.is_empty() {
            if let Some(NodeData::For { init, .. }) = self.arena.data_mut(for_node) {
                *init = NodeIndex::NONE;
            }
        } else if let Some(NodeData::VariableStatement { declarations, .. }) = self.arena.data_mut(init) {
            *declarations = kept;
        }
        self.changes += 1;
    }

    /// Fold runs of expression statements into one comma expression.
    fn merge_expression_statements(&mut self, statements: &mut Vec<NodeIndex>) -> bool {
        let mut out: Vec<NodeIndex> = Vec::with_capacity(statements.len());
        let mut run: Vec<(NodeIndex, NodeIndex)> = Vec::new();
        let mut merged = false;
        for &statement in statements.iter() {
            match self.mergeable_expression(statement) {
                Some(expression) => run.push((statement, expression)),
                None => {
                    merged |= self.flush_run(&mut run, &mut out);
                    out.push(statement);
                }
            }
        }
        merged |= self.flush_run(&mut run, &mut out);
        if merged {
            *statements = out;
        }
        merged
    }

    fn mergeable_expression(&self, statement: NodeIndex) -> Option<NodeIndex> {
        match self.arena.data(statement) {
            Some(NodeData::ExpressionStatement { expression })
                if !matches!(self.arena.data(*expression), Some(NodeData::StringLiteral { .. })) =>
            {
                Some(*expression)
            }
            _ => None,
        }
    }

    /// Emit the pending run of `(statement, expression)` pairs; a run of one
    /// keeps its statement.
    fn flush_run(&mut self, run: &mut Vec<(NodeIndex, NodeIndex)>, out: &mut Vec<NodeIndex>) -> bool {
        match run.len() {
            0 => false,
            1 => {
                out.extend(run.drain(..).map(|(statement, _)| statement));
                false
            }
            _ => {
                let mut flat = Vec::with_capacity(run.len());
                for (_, expression) in run.drain(..) {
                    match self.arena.data(expression) {
                        Some(NodeData::Sequence { expressions }) => flat.extend(expressions.iter().copied()),
                        _ => flat.push(expression),
                    }
                }
                let sequence = make_sequence(self.arena, flat);
                out.push(make_expression_statement(self.arena, sequence));
                true
            }
        }
    }
}
