//! Tree utilities shared by the rewrite passes.

use jsz_binder::{BinderState, BindingId, DeclKind};
use jsz_common::diagnostics::format_message;
use jsz_common::{DiagnosticBag, Span};
use jsz_parser::{NodeArena, NodeData, NodeIndex, NodeList, VarKind, children, descendants};
use rustc_hash::{FxHashMap, FxHashSet};

/// Child -> parent for every node reachable from the root.
pub(crate) type ParentMap = FxHashMap<NodeIndex, NodeIndex>;

pub(crate) fn parent_map(arena: &NodeArena, root: NodeIndex) -> ParentMap {
    let mut parents = ParentMap::default();
    for idx in descendants(arena, root) {
        for child in children(arena, idx) {
            parents.insert(child, idx);
        }
    }
    parents
}

fn parent_of(parents: &ParentMap, idx: NodeIndex) -> NodeIndex {
    parents.get(&idx).copied().unwrap_or(NodeIndex::NONE)
}

/// Whether `idx` only receives a value: the target of `=`, a destructuring
/// leaf, or a `for-in`/`for-of` head.
pub(crate) fn is_write_target(arena: &NodeArena, parents: &ParentMap, idx: NodeIndex) -> bool {
    let parent = parent_of(parents, idx);
    match arena.data(parent) {
        Some(NodeData::Assign { op, target, .. }) => *target == idx && op.binary_op().is_none(),
        Some(NodeData::ArrayPattern { .. } | NodeData::Rest { .. }) => true,
        Some(NodeData::AssignmentPattern { target, .. }) => *target == idx,
        Some(NodeData::Property { value, .. }) => {
            *value == idx
                && matches!(
                    arena.data(parent_of(parents, parent)),
                    Some(NodeData::ObjectPattern { .. })
                )
        }
        Some(NodeData::ForIn { left, .. } | NodeData::ForOf { left, .. }) => *left == idx,
        _ => false,
    }
}

/// Whether the value of expression `idx` is discarded.
pub(crate) fn is_result_unused(arena: &NodeArena, parents: &ParentMap, idx: NodeIndex) -> bool {
    let parent = parent_of(parents, idx);
    match arena.data(parent) {
        Some(NodeData::ExpressionStatement { .. }) => true,
        Some(NodeData::For { update, .. }) => *update == idx,
        Some(NodeData::Sequence { expressions }) => {
            expressions.last() != Some(&idx) || is_result_unused(arena, parents, parent)
        }
        _ => false,
    }
}

/// Whether `idx` lies inside the subtree rooted at `ancestor`.
pub(crate) fn is_within(parents: &ParentMap, idx: NodeIndex, ancestor: NodeIndex) -> bool {
    let mut current = idx;
    while current.is_some() {
        if current == ancestor {
            return true;
        }
        current = parent_of(parents, current);
    }
    false
}

/// Whether `idx` is still reachable from `root` through the links recorded
/// in `parents`. Rewrites earlier in a sweep may have detached it.
pub(crate) fn is_attached(arena: &NodeArena, parents: &ParentMap, idx: NodeIndex, root: NodeIndex) -> bool {
    let mut current = idx;
    while current != root {
        let Some(&parent) = parents.get(&current) else {
            return false;
        };
        if !children(arena, parent).contains(&current) {
            return false;
        }
        current = parent;
    }
    true
}

/// Statement list owned by `idx`, if it has one.
pub(crate) fn statement_list(arena: &NodeArena, idx: NodeIndex) -> Option<&NodeList> {
    match arena.data(idx)? {
        NodeData::SourceFile { statements, .. } | NodeData::Block { statements } => Some(statements),
        NodeData::SwitchCase { consequent, .. } => Some(consequent),
        NodeData::StaticBlock { body } => Some(body),
        _ => None,
    }
}

pub(crate) fn statement_list_mut(arena: &mut NodeArena, idx: NodeIndex) -> Option<&mut NodeList> {
    match arena.data_mut(idx)? {
        NodeData::SourceFile { statements, .. } | NodeData::Block { statements } => Some(statements),
        NodeData::SwitchCase { consequent, .. } => Some(consequent),
        NodeData::StaticBlock { body } => Some(body),
        _ => None,
    }
}

/// Move the data of `from` into `to`, leaving `from` empty. Side tables
/// follow the data.
pub(crate) fn move_node(arena: &mut NodeArena, binder: &mut BinderState, from: NodeIndex, to: NodeIndex) {
    if from == to {
        return;
    }
    let data = arena.replace(from, NodeData::Empty).unwrap_or(NodeData::Empty);
    arena.replace(to, data);
    if let Some(id) = binder.node_bindings.remove(&from) {
        binder.node_bindings.insert(to, id);
    }
    if let Some(scope) = binder.node_scopes.remove(&from) {
        binder.node_scopes.insert(to, scope);
    }
    if let Some(scope) = binder.reference_scopes.remove(&from) {
        binder.reference_scopes.insert(to, scope);
    }
}

/// Count every reference inside `subtree` as eliminated.
pub(crate) fn eliminate_references(arena: &NodeArena, binder: &mut BinderState, subtree: NodeIndex) {
    if subtree.is_none() {
        return;
    }
    for idx in descendants(arena, subtree) {
        if binder.is_reference(idx)
            && let Some(id) = binder.binding_of(idx)
        {
            binder.binding_mut(id).eliminated += 1;
        }
    }
}

/// `a, b, c` from a list of expressions; the single expression itself when
/// there is only one.
pub(crate) fn make_sequence(arena: &mut NodeArena, mut expressions: Vec<NodeIndex>) -> NodeIndex {
    match expressions.len() {
        0 => NodeIndex::NONE,
        1 => expressions.remove(0),
        _ => {
            let first = expressions[0];
            arena.add_like(first, NodeData::Sequence { expressions })
        }
    }
}

pub(crate) fn make_expression_statement(arena: &mut NodeArena, expression: NodeIndex) -> NodeIndex {
    arena.add_like(expression, NodeData::ExpressionStatement { expression })
}

/// `var` and hoistable function declarations inside `subtree` that bind
/// outside it, as a `var a, b;` statement without initializers.
pub(crate) fn hoisted_declarations(
    arena: &mut NodeArena,
    binder: &mut BinderState,
    subtree: NodeIndex,
) -> Option<NodeIndex> {
    let inner: FxHashSet<NodeIndex> = descendants(arena, subtree).into_iter().collect();
    let mut names: Vec<(NodeIndex, BindingId)> = Vec::new();
    let mut seen = FxHashSet::default();
    let mut stack = vec![subtree];
    while let Some(idx) = stack.pop() {
        let Some(data) = arena.data(idx) else {
            continue;
        };
        match data {
            NodeData::FunctionDeclaration(f) => {
                record_hoisted(binder, &inner, f.name, &mut names, &mut seen);
                continue;
            }
            NodeData::FunctionExpression(_)
            | NodeData::ArrowFunction(_)
            | NodeData::ClassDeclaration(_)
            | NodeData::ClassExpression(_) => continue,
            NodeData::VariableDeclarator { name, .. } => {
                for leaf in descendants(arena, *name) {
                    if matches!(arena.data(leaf), Some(NodeData::Identifier { .. })) {
                        record_hoisted(binder, &inner, leaf, &mut names, &mut seen);
                    }
                }
            }
            _ => {}
        }
        let mut next = children(arena, idx);
        next.reverse();
        stack.extend(next);
    }
    if names.is_empty() {
        return None;
    }
    let mut declarations = Vec::with_capacity(names.len());
    for (like, id) in names {
        let name = binder.binding(id).name.clone();
        let ident = arena.add_like(like, NodeData::Identifier { name });
        binder.node_bindings.insert(ident, id);
        declarations.push(arena.add_like(
            like,
            NodeData::VariableDeclarator {
                name: ident,
                init: NodeIndex::NONE,
            },
        ));
    }
    Some(arena.add_like(
        subtree,
        NodeData::VariableStatement {
            kind: VarKind::Var,
            declarations,
        },
    ))
}

fn record_hoisted(
    binder: &BinderState,
    inner: &FxHashSet<NodeIndex>,
    name: NodeIndex,
    names: &mut Vec<(NodeIndex, BindingId)>,
    seen: &mut FxHashSet<BindingId>,
) {
    if binder.is_reference(name) {
        return;
    }
    let Some(id) = binder.binding_of(name) else {
        return;
    };
    let binding = binder.binding(id);
    if !matches!(binding.kind, DeclKind::Var | DeclKind::Function) {
        return;
    }
    if inner.contains(&binder.scope(binding.scope).node) {
        return;
    }
    if seen.insert(id) {
        names.push((name, id));
    }
}

/// Report a warning at `node`.
pub(crate) fn warn(
    diagnostics: &mut DiagnosticBag,
    arena: &NodeArena,
    node: NodeIndex,
    code: u32,
    message: &str,
    args: &[&str],
) {
    let span = arena.get(node).map_or(Span::default(), |n| Span::new(n.pos, n.end));
    diagnostics.warning(span, format_message(message, args), code);
}
