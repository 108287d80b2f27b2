//! Write, read, escape and mutation rules of the value analysis.

use crate::reduce_vars::{SafetyAnalyzer, SafetyFrame};
use jsz_binder::{BindingId, DeclKind, Fixed, FixedValue};
use jsz_parser::{AssignOp, NodeData, NodeIndex, UnaryOp};
use tracing::trace;

impl SafetyAnalyzer<'_> {
    // =========================================================================
    // Frames
    // =========================================================================

    pub(crate) fn mark(&mut self, id: BindingId, safe: bool) {
        if self.frames.is_empty() {
            self.frames.push(SafetyFrame::default());
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(id, safe);
        }
    }

    /// The nearest frame that mentions the binding decides.
    pub(crate) fn is_safe(&self, id: BindingId) -> bool {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&id).copied())
            .unwrap_or(false)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub(crate) fn set_fixed(&mut self, id: BindingId, value: FixedValue) {
        self.binder.binding_mut(id).fixed = Fixed::Value(value);
        self.mark(id, true);
        self.write_loops.insert(id, self.current_loop);
    }

    pub(crate) fn clear(&mut self, id: BindingId) {
        let binding = self.binder.binding_mut(id);
        if !binding.fixed.is_cleared() {
            trace!(name = %binding.name, "binding cleared");
            binding.fixed = Fixed::Cleared;
        }
    }

    /// Record a write. `None` stands for a value the analysis cannot know.
    pub(crate) fn assign(&mut self, id: BindingId, value: Option<FixedValue>) {
        match value {
            Some(value) if self.safe_to_assign(id) => self.set_fixed(id, value),
            _ => self.clear(id),
        }
    }

    pub(crate) fn safe_to_assign(&self, id: BindingId) -> bool {
        let binding = self.binder.binding(id);
        if self.binder.is_pinned(id)
            || self.is_deferred_from(id)
            || self.deferred_reads.contains(&id)
        {
            return false;
        }
        match &binding.fixed {
            Fixed::Unknown => true,
            Fixed::Cleared => false,
            Fixed::Value(_) => {
                binding.kind != DeclKind::Const
                    && self.frames.last().is_some_and(|frame| frame.contains_key(&id))
                    && self.is_safe(id)
                    && self.read_counts.get(&id).copied().unwrap_or(0) == 0
            }
        }
    }

    /// Current value of a binding about to be updated in place.
    pub(crate) fn chained_previous(&self, id: BindingId) -> Option<FixedValue> {
        let value = self.binder.binding(id).fixed.value()?;
        (self.safe_to_assign(id) && self.is_safe(id)).then(|| value.clone())
    }

    /// Whether code running now may run after the binding's scope moved on.
    pub(crate) fn is_deferred_from(&self, id: BindingId) -> bool {
        let defun = self.binder.scope(self.binder.binding(id).scope).defun;
        for context in self.functions.iter().rev() {
            if context.scope == Some(defun) {
                return false;
            }
            if context.deferred {
                return true;
            }
        }
        true
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub(crate) fn visit_reference(&mut self, idx: NodeIndex) {
        let Some(id) = self.binder.binding_of(idx) else {
            return;
        };
        if self.parent_is(idx, |data| matches!(data, NodeData::ExportSpecifier { .. })) {
            self.escape(id, 1);
            return;
        }
        self.walk_pending(id);

        *self.read_counts.entry(id).or_default() += 1;
        if self.is_deferred_from(id) {
            self.deferred_reads.insert(id);
        }
        match self.binder.binding(id).fixed.clone() {
            Fixed::Unknown => self.clear(id),
            Fixed::Cleared => {}
            Fixed::Value(value) => {
                if !self.is_safe(id) {
                    self.clear(id);
                } else if self.loop_agrees(id, &value) {
                    self.analysis.reads.insert(idx, (id, value));
                }
            }
        }
        self.mark_escaped(idx, id);
        self.check_modified(idx, id);
    }

    /// A value written in another loop iteration is only usable if it cannot
    /// differ between iterations.
    fn loop_agrees(&self, id: BindingId, value: &FixedValue) -> bool {
        self.write_loops.get(&id).copied().unwrap_or(0) == self.current_loop
            || self.is_immutable(value)
    }

    pub(crate) fn is_immutable(&self, value: &FixedValue) -> bool {
        match value {
            FixedValue::Undefined | FixedValue::Compound { .. } | FixedValue::Update { .. } => true,
            FixedValue::Node(node) => self.arena.is_constant_literal(*node),
            FixedValue::Function(_) => false,
        }
    }

    fn parent_is(&self, idx: NodeIndex, test: impl Fn(&NodeData) -> bool) -> bool {
        let n = self.parents.len();
        n >= 2
            && self.parents[n - 1] == idx
            && self.arena.data(self.parents[n - 2]).is_some_and(test)
    }

    // =========================================================================
    // Escapes
    // =========================================================================

    pub(crate) fn escape(&mut self, id: BindingId, depth: u32) {
        let entry = self.analysis.escaped.entry(id).or_insert(depth);
        *entry = (*entry).min(depth);
    }

    /// Follow the read up through its ancestors to see where the value (or a
    /// property of it, one level per member access) flows.
    fn mark_escaped(&mut self, idx: NodeIndex, id: BindingId) {
        let arena = self.arena;
        let returns_elsewhere = {
            let defun = self.binder.scope(self.binder.binding(id).scope).defun;
            self.functions.last().and_then(|context| context.scope) != Some(defun)
        };
        let mut depth = 1u32;
        let mut node = idx;
        let Some(top) = self.parents.len().checked_sub(1) else {
            return;
        };
        for position in (0..top).rev() {
            let parent = self.parents[position];
            let Some(data) = arena.data(parent) else {
                break;
            };
            match data {
                NodeData::Assign { op, value, .. } => {
                    if *value == node && (*op == AssignOp::Assign || op.is_logical()) {
                        self.escape(id, depth);
                    }
                    break;
                }
                NodeData::VariableDeclarator { init, .. } => {
                    if *init == node {
                        self.escape(id, depth);
                    }
                    break;
                }
                NodeData::Call {
                    callee, arguments, ..
                } => {
                    if *callee == node {
                        // `o.m()` hands `o` over as `this`.
                        if depth > 1 {
                            self.escape(id, depth - 1);
                        }
                    } else if arguments.contains(&node) {
                        self.escape(id, depth);
                    }
                    break;
                }
                NodeData::New { arguments, .. } => {
                    if arguments.contains(&node) {
                        self.escape(id, depth);
                    }
                    break;
                }
                NodeData::Return { .. } | NodeData::Throw { .. } | NodeData::Yield { .. } => {
                    if returns_elsewhere {
                        self.escape(id, depth);
                    }
                    break;
                }
                NodeData::ArrowFunction(f) => {
                    if f.expression_body && f.body == node && returns_elsewhere {
                        self.escape(id, depth);
                    }
                    break;
                }
                NodeData::Spread { .. }
                | NodeData::ExportSpecifier { .. }
                | NodeData::ExportDefault { .. } => {
                    self.escape(id, depth);
                    break;
                }
                NodeData::TemplateLiteral { .. } => {
                    let tagged = position > 0
                        && matches!(
                            arena.data(self.parents[position - 1]),
                            Some(NodeData::TaggedTemplate { .. })
                        );
                    if tagged {
                        self.escape(id, depth);
                    }
                    break;
                }
                NodeData::TaggedTemplate { tag, .. } => {
                    if *tag != node {
                        self.escape(id, depth);
                    }
                    break;
                }
                NodeData::ArrayLiteral { .. } | NodeData::ObjectLiteral { .. } => {}
                NodeData::Property { value, .. } => {
                    if *value != node {
                        break;
                    }
                }
                NodeData::Conditional { test, .. } => {
                    if *test == node {
                        break;
                    }
                }
                NodeData::Binary { op, .. } if op.is_logical() => {}
                NodeData::Sequence { expressions } => {
                    if expressions.last() != Some(&node) {
                        break;
                    }
                }
                NodeData::Member { object, .. } | NodeData::Index { object, .. } => {
                    if *object != node {
                        break;
                    }
                    depth += 1;
                }
                _ => break,
            }
            node = parent;
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// A read used as the object of a property write, `delete`, update or
    /// method call invalidates a mutable value.
    fn check_modified(&mut self, idx: NodeIndex, id: BindingId) {
        let arena = self.arena;
        let n = self.parents.len();
        if n < 3 || self.parents[n - 1] != idx {
            return;
        }
        let parent = self.parents[n - 2];
        let is_object = matches!(
            arena.data(parent),
            Some(NodeData::Member { object, .. } | NodeData::Index { object, .. }) if *object == idx
        );
        if !is_object {
            return;
        }
        let modified = match arena.data(self.parents[n - 3]) {
            Some(NodeData::Assign { target, .. }) => *target == parent,
            Some(NodeData::Update { .. }) => true,
            Some(NodeData::Unary {
                op: UnaryOp::Delete,
                ..
            }) => true,
            Some(NodeData::Call { callee, .. }) => *callee == parent,
            Some(NodeData::ForIn { left, .. } | NodeData::ForOf { left, .. }) => *left == parent,
            Some(NodeData::ArrayPattern { .. } | NodeData::Rest { .. }) => true,
            Some(NodeData::AssignmentPattern { target, .. }) => *target == parent,
            Some(NodeData::Property { value, .. }) => {
                *value == parent
                    && n >= 4
                    && matches!(
                        arena.data(self.parents[n - 4]),
                        Some(NodeData::ObjectPattern { .. })
                    )
            }
            _ => false,
        };
        if !modified {
            return;
        }
        let mutable = self
            .binder
            .binding(id)
            .fixed
            .value()
            .is_some_and(|value| !self.is_immutable(value));
        if mutable {
            self.clear(id);
            self.analysis.reads.remove(&idx);
        }
    }
}
