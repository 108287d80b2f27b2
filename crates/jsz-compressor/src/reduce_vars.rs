//! Flow-sensitive value analysis ("reduce_vars").
//!
//! One depth-first walk per round decides, for every read of a binding,
//! whether the value last written to it is still the value observed there.
//! Writes and reads are tracked against a stack of safety frames (one per
//! conditional region, loop, handler and function body): a binding is safe to
//! read only where the nearest frame that mentions it says so, and a write
//! keeps a value only when it happens in the frame that owns the binding's
//! current value. Anything the walk cannot prove clears the binding for the
//! rest of the round.
//!
//! Function declarations are hoisted: their bodies are walked lazily at the
//! first reference to the function, with the frame stack cut back to the
//! declaring scope, so that reads inside see exactly the writes that
//! dominate every possible call.
//!
//! The flow rules (frames, writes, reads, escapes, mutation) live in
//! `reduce_vars_flow.rs`.

use crate::analysis::Analysis;
use jsz_binder::{BinderState, BindingFlags, BindingId, DeclKind, Fixed, FixedValue, ScopeId};
use jsz_parser::{
    AssignOp, ClassData, FunctionData, NodeArena, NodeData, NodeIndex, UpdateOp, VarKind, children,
    descendants,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, debug_span};

/// Safety overlay: binding -> whether its current value may be read here.
pub(crate) type SafetyFrame = FxHashMap<BindingId, bool>;

#[derive(Clone, Copy, Debug)]
pub(crate) struct FunctionContext {
    /// `None` for class field initializers.
    pub(crate) scope: Option<ScopeId>,
    /// Runs at some unknown time relative to the surrounding code.
    pub(crate) deferred: bool,
}

/// A hoisted function declaration whose body has not been walked yet.
#[derive(Clone, Copy, Debug)]
struct PendingFunction {
    node: NodeIndex,
    frame_depth: usize,
    loop_id: u32,
}

pub(crate) struct SafetyAnalyzer<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) binder: &'a mut BinderState,
    toplevel: bool,
    pub(crate) frames: Vec<SafetyFrame>,
    pub(crate) functions: Vec<FunctionContext>,
    /// Ancestors of the node being walked, innermost last.
    pub(crate) parents: Vec<NodeIndex>,
    loop_counter: u32,
    pub(crate) current_loop: u32,
    /// Loop id current at each binding's last write.
    pub(crate) write_loops: FxHashMap<BindingId, u32>,
    /// Plain reads seen so far this round.
    pub(crate) read_counts: FxHashMap<BindingId, u32>,
    /// Bindings read from a function body that may run later.
    pub(crate) deferred_reads: FxHashSet<BindingId>,
    pending: FxHashMap<BindingId, Vec<PendingFunction>>,
    /// Function declaration name -> declaration.
    function_decls: FxHashMap<NodeIndex, NodeIndex>,
    pub(crate) analysis: Analysis,
}

/// Run the analysis over `root`, resetting every binding's fixed state.
pub fn analyze(
    arena: &NodeArena,
    binder: &mut BinderState,
    root: NodeIndex,
    toplevel: bool,
) -> Analysis {
    let _span = debug_span!("reduce_vars").entered();
    let mut analyzer = SafetyAnalyzer {
        arena,
        binder,
        toplevel,
        frames: Vec::new(),
        functions: Vec::new(),
        parents: Vec::new(),
        loop_counter: 0,
        current_loop: 0,
        write_loops: FxHashMap::default(),
        read_counts: FxHashMap::default(),
        deferred_reads: FxHashSet::default(),
        pending: FxHashMap::default(),
        function_decls: FxHashMap::default(),
        analysis: Analysis::default(),
    };
    analyzer.reset_bindings();
    analyzer.index_function_declarations(root);

    let root_scope = analyzer.binder.root_scope();
    analyzer.frames.push(SafetyFrame::default());
    analyzer.functions.push(FunctionContext {
        scope: Some(root_scope),
        deferred: false,
    });
    analyzer.parents.push(root);
    if let Some(NodeData::SourceFile { statements, .. }) = arena.data(root) {
        analyzer.enter_scope(root_scope);
        for &statement in statements {
            analyzer.walk(statement);
        }
        analyzer.leave_scope(root_scope);
    }
    analyzer.finish()
}

impl<'a> SafetyAnalyzer<'a> {
    // =========================================================================
    // Round setup
    // =========================================================================

    fn reset_bindings(&mut self) {
        for index in 0..self.binder.bindings.len() {
            let id = BindingId(index as u32);
            let cleared = self.starts_cleared(id);
            let binding = self.binder.binding_mut(id);
            binding.flags.remove(BindingFlags::CHAINED);
            binding.fixed = if cleared { Fixed::Cleared } else { Fixed::Unknown };
        }
    }

    /// Bindings whose value can change behind the analysis' back.
    fn starts_cleared(&self, id: BindingId) -> bool {
        let binding = self.binder.binding(id);
        let exposed = (binding.is_global() && !self.toplevel) || binding.is_undeclared();
        let redeclared_function = binding.flags.contains(BindingFlags::REDECLARED)
            && self.binder.scope(binding.scope).functions.get(&binding.name) == Some(&id);
        exposed
            || redeclared_function
            || binding.redefined.is_some()
            || matches!(
                binding.kind,
                DeclKind::Arguments
                    | DeclKind::Import
                    | DeclKind::CatchParameter
                    | DeclKind::Global
                    | DeclKind::FunctionName
                    | DeclKind::ClassName
            )
            || self.binder.is_pinned(id)
    }

    fn index_function_declarations(&mut self, root: NodeIndex) {
        for idx in descendants(self.arena, root) {
            if let Some(NodeData::FunctionDeclaration(f)) = self.arena.data(idx)
                && f.name.is_some()
            {
                self.function_decls.insert(f.name, idx);
            }
        }
    }

    fn finish(mut self) -> Analysis {
        let binder = &*self.binder;
        self.analysis
            .reads
            .retain(|_, (id, _)| !binder.binding(*id).fixed.is_cleared());
        let mut safe_reads: FxHashMap<BindingId, u32> = FxHashMap::default();
        for (id, _) in self.analysis.reads.values() {
            *safe_reads.entry(*id).or_default() += 1;
        }
        self.analysis.safe_reads = safe_reads;
        debug!(
            safe_reads = self.analysis.reads.len(),
            escaped = self.analysis.escaped.len(),
            "value analysis complete"
        );
        self.analysis
    }

    // =========================================================================
    // Scopes and hoisted functions
    // =========================================================================

    /// Fix the scope's function declarations to their own nodes and queue
    /// their bodies.
    fn enter_scope(&mut self, scope: ScopeId) {
        let depth = self.frames.len();
        let functions: Vec<BindingId> = self.binder.scope(scope).functions.values().copied().collect();
        for id in functions {
            let nodes: Vec<NodeIndex> = self
                .binder
                .binding(id)
                .orig
                .iter()
                .filter_map(|name| self.function_decls.get(name).copied())
                .collect();
            match nodes.as_slice() {
                [node] if self.binder.binding(id).fixed == Fixed::Unknown => {
                    self.set_fixed(id, FixedValue::Function(*node));
                }
                [_] => {}
                _ => self.clear(id),
            }
            let queue = self.pending.entry(id).or_default();
            for node in nodes {
                queue.push(PendingFunction {
                    node,
                    frame_depth: depth,
                    loop_id: self.current_loop,
                });
            }
        }
    }

    /// Walk whatever hoisted functions of `scope` were never referenced.
    fn leave_scope(&mut self, scope: ScopeId) {
        let functions: Vec<BindingId> = self.binder.scope(scope).functions.values().copied().collect();
        for id in functions {
            self.walk_pending(id);
        }
    }

    pub(crate) fn walk_pending(&mut self, id: BindingId) {
        let Some(queue) = self.pending.remove(&id) else {
            return;
        };
        for pending in queue {
            self.walk_hoisted(pending);
        }
    }

    fn walk_hoisted(&mut self, pending: PendingFunction) {
        let arena = self.arena;
        let Some(NodeData::FunctionDeclaration(f)) = arena.data(pending.node) else {
            return;
        };
        let depth = pending.frame_depth.min(self.frames.len());
        let saved_frames = self.frames.split_off(depth);
        let saved_parents = std::mem::take(&mut self.parents);
        let saved_loop = std::mem::replace(&mut self.current_loop, pending.loop_id);

        self.parents.push(pending.node);
        self.walk_function(pending.node, f, true, None);

        self.parents = saved_parents;
        self.frames.extend(saved_frames);
        self.current_loop = saved_loop;
    }

    // =========================================================================
    // Walk
    // =========================================================================

    pub(crate) fn walk(&mut self, idx: NodeIndex) {
        if idx.is_none() {
            return;
        }
        self.parents.push(idx);
        self.walk_node(idx);
        self.parents.pop();
    }

    /// Walk `idx` inside its own safety frame.
    fn walk_branch(&mut self, idx: NodeIndex) {
        if idx.is_none() {
            return;
        }
        self.frames.push(SafetyFrame::default());
        self.walk(idx);
        self.frames.pop();
    }

    /// Whether `idx` is skipped when a `?.` link of its chain short-circuits.
    fn short_circuits(&self, idx: NodeIndex) -> bool {
        let mut current = idx;
        loop {
            current = match self.arena.data(current) {
                Some(
                    NodeData::Call { optional: true, .. }
                    | NodeData::Member { optional: true, .. }
                    | NodeData::Index { optional: true, .. },
                ) => return true,
                Some(NodeData::Call { callee, .. }) => *callee,
                Some(NodeData::Member { object, .. } | NodeData::Index { object, .. }) => *object,
                _ => return false,
            };
        }
    }

    fn walk_node(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(data) = arena.data(idx) else {
            return;
        };
        match data {
            NodeData::Identifier { .. } => self.visit_reference(idx),

            NodeData::VariableStatement { kind, declarations } => {
                for &declarator in declarations {
                    self.parents.push(declarator);
                    self.walk_declarator(declarator, *kind, false);
                    self.parents.pop();
                }
            }
            NodeData::FunctionDeclaration(f) => {
                // Named declarations are walked through their binding.
                if f.name.is_none() {
                    self.walk_function(idx, f, true, None);
                }
            }
            NodeData::FunctionExpression(f) | NodeData::ArrowFunction(f) => {
                self.walk_function(idx, f, true, None)
            }
            NodeData::ClassDeclaration(c) => {
                self.walk_class(idx, c);
                if let Some(id) = self.binder.binding_of(c.name) {
                    self.assign(id, Some(FixedValue::Node(idx)));
                }
            }
            NodeData::ClassExpression(c) => self.walk_class(idx, c),
            NodeData::MethodDefinition {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.walk(*key);
                }
                self.walk(*value);
            }
            NodeData::PropertyDefinition {
                key,
                value,
                is_static,
                computed,
            } => {
                if *computed {
                    self.walk(*key);
                }
                if *is_static {
                    self.walk(*value);
                } else {
                    self.functions.push(FunctionContext {
                        scope: None,
                        deferred: true,
                    });
                    self.walk_branch(*value);
                    self.functions.pop();
                }
            }
            NodeData::StaticBlock { body } => {
                let scope = self.binder.scope_of(idx);
                self.functions.push(FunctionContext {
                    scope,
                    deferred: false,
                });
                self.frames.push(SafetyFrame::default());
                self.walk_statements_in(scope, body);
                self.frames.pop();
                self.functions.pop();
            }

            NodeData::Block { statements } => {
                let scope = self.binder.scope_of(idx);
                self.walk_statements_in(scope, statements);
            }
            NodeData::If {
                test,
                consequent,
                alternate,
            }
            | NodeData::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.walk(*test);
                self.walk_branch(*consequent);
                self.walk_branch(*alternate);
            }
            NodeData::Binary { op, left, right } if op.is_logical() => {
                self.walk(*left);
                self.walk_branch(*right);
            }
            NodeData::Assign { op, target, value } => self.walk_assignment(*op, *target, *value),
            NodeData::Update { op, operand, .. } => self.walk_update(*op, *operand),
            NodeData::Call {
                callee, arguments, ..
            } => match arena.data(*callee) {
                Some(NodeData::FunctionExpression(f) | NodeData::ArrowFunction(f))
                    if !f.is_async && !f.is_generator =>
                {
                    for &argument in arguments {
                        self.walk(argument);
                    }
                    self.parents.push(*callee);
                    self.walk_function(*callee, f, false, Some(arguments.as_slice()));
                    self.parents.pop();
                }
                _ => {
                    self.walk(*callee);
                    let skippable = self.short_circuits(idx);
                    if skippable {
                        self.frames.push(SafetyFrame::default());
                    }
                    for &argument in arguments {
                        self.walk(argument);
                    }
                    if skippable {
                        self.frames.pop();
                    }
                }
            },
            NodeData::Index { object, index, .. } => {
                self.walk(*object);
                if self.short_circuits(idx) {
                    self.walk_branch(*index);
                } else {
                    self.walk(*index);
                }
            }
            NodeData::Labeled { body, .. } => self.walk_branch(*body),

            NodeData::For {
                init,
                test,
                update,
                body,
            } => {
                let scope = self.binder.scope_of(idx);
                if let Some(scope) = scope {
                    self.enter_scope(scope);
                }
                self.walk(*init);
                let saved = self.push_loop();
                self.walk(*test);
                self.walk(*body);
                self.walk(*update);
                self.pop_loop(saved);
                if let Some(scope) = scope {
                    self.leave_scope(scope);
                }
            }
            NodeData::ForIn { left, right, body } | NodeData::ForOf { left, right, body, .. } => {
                let scope = self.binder.scope_of(idx);
                if let Some(scope) = scope {
                    self.enter_scope(scope);
                }
                self.walk(*right);
                let saved = self.push_loop();
                self.walk_loop_head(*left);
                self.walk(*body);
                self.pop_loop(saved);
                if let Some(scope) = scope {
                    self.leave_scope(scope);
                }
            }
            NodeData::While { test, body } => {
                let saved = self.push_loop();
                self.walk(*test);
                self.walk(*body);
                self.pop_loop(saved);
            }
            NodeData::DoWhile { body, test } => {
                let saved = self.push_loop();
                self.walk(*body);
                self.walk(*test);
                self.pop_loop(saved);
            }
            NodeData::Try {
                block,
                handler,
                finalizer,
            } => {
                self.walk_branch(*block);
                self.walk_branch(*handler);
                self.walk_branch(*finalizer);
            }
            NodeData::CatchClause { param, body } => {
                let scope = self.binder.scope_of(idx);
                if let Some(scope) = scope {
                    self.enter_scope(scope);
                }
                self.walk_pattern(*param);
                // The catch body shares the clause's scope.
                if let Some(NodeData::Block { statements }) = arena.data(*body) {
                    self.parents.push(*body);
                    for &statement in statements {
                        self.walk(statement);
                    }
                    self.parents.pop();
                }
                if let Some(scope) = scope {
                    self.leave_scope(scope);
                }
            }
            NodeData::Switch {
                discriminant,
                cases,
            } => {
                self.walk(*discriminant);
                let scope = self.binder.scope_of(idx);
                if let Some(scope) = scope {
                    self.enter_scope(scope);
                }
                for &case in cases {
                    self.walk_branch(case);
                }
                if let Some(scope) = scope {
                    self.leave_scope(scope);
                }
            }

            NodeData::ImportDeclaration { .. } => {}

            _ => {
                for child in children(arena, idx) {
                    self.walk(child);
                }
            }
        }
    }

    fn walk_statements_in(&mut self, scope: Option<ScopeId>, statements: &[NodeIndex]) {
        if let Some(scope) = scope {
            self.enter_scope(scope);
        }
        for &statement in statements {
            self.walk(statement);
        }
        if let Some(scope) = scope {
            self.leave_scope(scope);
        }
    }

    fn push_loop(&mut self) -> u32 {
        self.frames.push(SafetyFrame::default());
        self.loop_counter += 1;
        std::mem::replace(&mut self.current_loop, self.loop_counter)
    }

    fn pop_loop(&mut self, saved: u32) {
        self.current_loop = saved;
        self.frames.pop();
    }

    /// Walk a function body. `arguments` is set for immediately invoked
    /// functions, whose parameters take the argument values.
    fn walk_function(
        &mut self,
        idx: NodeIndex,
        f: &'a FunctionData,
        deferred: bool,
        arguments: Option<&'a [NodeIndex]>,
    ) {
        let arena = self.arena;
        let Some(scope) = self.binder.scope_of(idx) else {
            return;
        };
        self.functions.push(FunctionContext {
            scope: Some(scope),
            deferred,
        });
        self.frames.push(SafetyFrame::default());

        let self_referenced = self
            .binder
            .binding_of(f.name)
            .is_some_and(|id| !self.binder.binding(id).references.is_empty());
        let mut fixable =
            arguments.is_some() && !self.binder.scope(scope).uses_arguments && !self_referenced;
        for (position, &param) in f.params.iter().enumerate() {
            let argument = arguments.and_then(|args| args.get(position).copied());
            if argument.is_some_and(|a| matches!(arena.data(a), Some(NodeData::Spread { .. }))) {
                fixable = false;
            }
            match arena.data(param) {
                Some(NodeData::Identifier { .. }) if fixable => {
                    if let Some(id) = self.binder.binding_of(param) {
                        let value = argument.map_or(FixedValue::Undefined, FixedValue::Node);
                        self.assign(id, Some(value));
                    }
                }
                _ => self.walk_pattern(param),
            }
        }

        if f.expression_body {
            self.walk(f.body);
        } else if let Some(NodeData::Block { statements }) = arena.data(f.body) {
            self.enter_scope(scope);
            self.parents.push(f.body);
            for &statement in statements {
                self.walk(statement);
            }
            self.parents.pop();
            self.leave_scope(scope);
        }

        self.frames.pop();
        self.functions.pop();
    }

    fn walk_class(&mut self, idx: NodeIndex, c: &'a ClassData) {
        self.walk(c.extends);
        let scope = self.binder.scope_of(idx);
        if let Some(scope) = scope {
            self.enter_scope(scope);
        }
        for &member in &c.members {
            self.walk(member);
        }
        if let Some(scope) = scope {
            self.leave_scope(scope);
        }
    }

    fn walk_declarator(&mut self, declarator: NodeIndex, kind: VarKind, in_loop_head: bool) {
        let arena = self.arena;
        let Some(NodeData::VariableDeclarator { name, init }) = arena.data(declarator) else {
            return;
        };
        self.walk(*init);
        let Some(NodeData::Identifier { .. }) = arena.data(*name) else {
            self.walk_pattern(*name);
            return;
        };
        let Some(id) = self.binder.binding_of(*name) else {
            return;
        };
        if init.is_some() {
            self.assign(id, Some(FixedValue::Node(*init)));
        } else if in_loop_head {
            self.assign(id, None);
        } else if kind.is_lexical() {
            self.assign(id, Some(FixedValue::Undefined));
        } else {
            // `var x;` only has a value if nothing was written before.
            let binding = self.binder.binding(id);
            if binding.fixed == Fixed::Unknown
                && self.current_loop == 0
                && !binding.flags.contains(BindingFlags::REDECLARED)
            {
                self.assign(id, Some(FixedValue::Undefined));
            }
        }
    }

    fn walk_loop_head(&mut self, left: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::VariableStatement { kind, declarations }) = arena.data(left) else {
            self.walk_pattern(left);
            return;
        };
        self.parents.push(left);
        for &declarator in declarations {
            self.parents.push(declarator);
            self.walk_declarator(declarator, *kind, true);
            self.parents.pop();
        }
        self.parents.pop();
    }

    /// Walk a binding or assignment pattern; every bound name gets an
    /// unknown value.
    fn walk_pattern(&mut self, pattern: NodeIndex) {
        let arena = self.arena;
        let Some(data) = arena.data(pattern) else {
            return;
        };
        self.parents.push(pattern);
        match data {
            NodeData::Identifier { .. } => {
                if let Some(id) = self.binder.binding_of(pattern) {
                    self.assign(id, None);
                }
            }
            NodeData::ArrayPattern { elements } => {
                for &element in elements {
                    self.walk_pattern(element);
                }
            }
            NodeData::ObjectPattern { properties } => {
                for &property in properties {
                    self.walk_pattern(property);
                }
            }
            NodeData::Property {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.walk(*key);
                }
                self.walk_pattern(*value);
            }
            NodeData::AssignmentPattern { target, default } => {
                self.walk_branch(*default);
                self.walk_pattern(*target);
            }
            NodeData::Rest { argument } => self.walk_pattern(*argument),
            _ => self.walk_node(pattern),
        }
        self.parents.pop();
    }

    fn walk_assignment(&mut self, op: AssignOp, target: NodeIndex, value: NodeIndex) {
        let arena = self.arena;
        match arena.data(target) {
            Some(NodeData::Identifier { .. }) => {
                let id = self.binder.binding_of(target);
                if op == AssignOp::Assign {
                    self.walk(value);
                    if let Some(id) = id {
                        self.assign(id, Some(FixedValue::Node(value)));
                    }
                } else if op.is_logical() {
                    self.walk_branch(value);
                    if let Some(id) = id {
                        self.clear(id);
                    }
                } else {
                    self.walk(value);
                    if let Some(id) = id {
                        self.compound(id, op, value);
                    }
                }
            }
            Some(NodeData::Member { .. } | NodeData::Index { .. }) => {
                self.walk(target);
                self.walk(value);
            }
            _ => {
                self.walk(value);
                self.walk_pattern(target);
            }
        }
    }

    fn walk_update(&mut self, op: UpdateOp, operand: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::Identifier { .. }) = arena.data(operand) else {
            self.walk(operand);
            return;
        };
        let Some(id) = self.binder.binding_of(operand) else {
            return;
        };
        match self.chained_previous(id) {
            Some(prev) => {
                self.set_fixed(
                    id,
                    FixedValue::Update {
                        prev: Box::new(prev),
                        delta: op.delta(),
                    },
                );
                self.binder.binding_mut(id).flags.insert(BindingFlags::CHAINED);
            }
            None => self.clear(id),
        }
    }

    fn compound(&mut self, id: BindingId, op: AssignOp, rhs: NodeIndex) {
        let (Some(op), Some(prev)) = (op.binary_op(), self.chained_previous(id)) else {
            self.clear(id);
            return;
        };
        self.set_fixed(
            id,
            FixedValue::Compound {
                op,
                prev: Box::new(prev),
                rhs,
            },
        );
        self.binder.binding_mut(id).flags.insert(BindingFlags::CHAINED);
    }
}
