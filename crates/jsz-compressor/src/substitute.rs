//! Constant substitution and property folding driven by the value analysis.

use crate::analysis::Analysis;
use crate::evaluate::{ConstantValue, materialize};
use crate::options::CompressOptions;
use crate::tree::{ParentMap, is_write_target, parent_map};
use jsz_binder::{BinderState, BindingId};
use jsz_common::limits::MAX_INLINED_STRING_LENGTH;
use jsz_parser::{NodeArena, NodeData, NodeIndex, UnaryOp, descendants};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// Replace reads and property accesses whose value is a known constant.
/// Returns the number of replacements.
pub(crate) fn substitute(
    arena: &mut NodeArena,
    binder: &mut BinderState,
    analysis: &Analysis,
    options: &CompressOptions,
    root: NodeIndex,
) -> usize {
    let parents = parent_map(arena, root);
    let mut changes = fold_properties(arena, binder, analysis, &parents, root);
    changes += inline_constants(arena, binder, analysis, options, &parents);
    changes
}

fn fold_properties(
    arena: &mut NodeArena,
    binder: &mut BinderState,
    analysis: &Analysis,
    parents: &ParentMap,
    root: NodeIndex,
) -> usize {
    let mut folds = Vec::new();
    for idx in descendants(arena, root) {
        let (object, key) = match arena.data(idx) {
            Some(NodeData::Member {
                object,
                property,
                optional: false,
            }) => (*object, arena.name_text(*property).map(str::to_string)),
            Some(NodeData::Index {
                object,
                index,
                optional: false,
            }) => (*object, arena.property_key_text(*index)),
            _ => continue,
        };
        let Some(key) = key else {
            continue;
        };
        if analysis.fixed_value(object).is_none() || !is_plain_read(arena, parents, idx) {
            continue;
        }
        if let Some(value) = analysis.property_value(arena, binder, object, &key) {
            folds.push((idx, object, value));
        }
    }

    let mut changes = 0;
    for (idx, object, value) in folds {
        let Some(data) = materialize(arena, idx, &value) else {
            continue;
        };
        arena.replace(idx, data);
        if let Some(id) = binder.binding_of(object) {
            trace!(name = %binder.binding(id).name, "folded property read");
            binder.binding_mut(id).replaced += 1;
        }
        changes += 1;
    }
    changes
}

fn inline_constants(
    arena: &mut NodeArena,
    binder: &mut BinderState,
    analysis: &Analysis,
    options: &CompressOptions,
    parents: &ParentMap,
) -> usize {
    let mut reads: Vec<NodeIndex> = analysis.reads.keys().copied().collect();
    reads.sort_unstable();

    let mut constants: Vec<(NodeIndex, BindingId, ConstantValue)> = Vec::new();
    let mut constant_reads: FxHashMap<BindingId, usize> = FxHashMap::default();
    for reference in reads {
        if !matches!(arena.data(reference), Some(NodeData::Identifier { .. }))
            || !is_plain_read(arena, parents, reference)
        {
            continue;
        }
        let Some(id) = binder.binding_of(reference) else {
            continue;
        };
        let Some(value) = analysis.constant_value(arena, binder, reference) else {
            continue;
        };
        if !value.is_materializable() {
            continue;
        }
        *constant_reads.entry(id).or_default() += 1;
        constants.push((reference, id, value));
    }

    let inline_everywhere: FxHashSet<BindingId> = constant_reads
        .iter()
        .filter(|&(&id, &count)| {
            let binding = binder.binding(id);
            let exposed = (binding.is_global() && !options.toplevel)
                || binding.is_undeclared()
                || binding.is_exported();
            !exposed && count == plain_read_count(arena, binder, parents, id)
        })
        .map(|(&id, _)| id)
        .collect();

    let mut changes = 0;
    for (reference, id, value) in constants {
        let binding = binder.binding(id);
        let reads_everywhere = inline_everywhere.contains(&id);
        let short_enough = match &value {
            ConstantValue::String(s) => s.len() <= MAX_INLINED_STRING_LENGTH,
            _ => true,
        };
        let worth_it = value.printed_len() <= binding.name.len() || (reads_everywhere && short_enough);
        if !worth_it {
            continue;
        }
        let Some(data) = materialize(arena, reference, &value) else {
            continue;
        };
        trace!(name = %binding.name, "inlined constant");
        arena.replace(reference, data);
        binder.node_bindings.remove(&reference);
        binder.reference_scopes.remove(&reference);
        binder.binding_mut(id).replaced += 1;
        changes += 1;
    }
    changes
}

/// References to `id` that read its value.
fn plain_read_count(arena: &NodeArena, binder: &BinderState, parents: &ParentMap, id: BindingId) -> usize {
    binder
        .binding(id)
        .references
        .iter()
        .filter(|&&r| matches!(arena.data(r), Some(NodeData::Identifier { .. })))
        .filter(|&&r| binder.binding_of(r) == Some(id))
        .filter(|&&r| parents.contains_key(&r))
        .filter(|&&r| !is_write_target(arena, parents, r) && !is_updated(arena, parents, r))
        .count()
}

fn is_updated(arena: &NodeArena, parents: &ParentMap, idx: NodeIndex) -> bool {
    let parent = parents.get(&idx).copied().unwrap_or(NodeIndex::NONE);
    match arena.data(parent) {
        Some(NodeData::Update { .. }) => true,
        Some(NodeData::Assign { target, .. }) => *target == idx,
        _ => false,
    }
}

/// A read whose replacement by a value keeps the program's meaning.
fn is_plain_read(arena: &NodeArena, parents: &ParentMap, idx: NodeIndex) -> bool {
    if is_write_target(arena, parents, idx) || is_updated(arena, parents, idx) {
        return false;
    }
    let parent = parents.get(&idx).copied().unwrap_or(NodeIndex::NONE);
    match arena.data(parent) {
        Some(NodeData::Unary {
            op: UnaryOp::Delete,
            ..
        }) => false,
        Some(NodeData::Call { callee, .. }) | Some(NodeData::New { callee, .. }) => *callee != idx,
        Some(NodeData::TaggedTemplate { tag, .. }) => *tag != idx,
        Some(NodeData::ExportSpecifier { .. } | NodeData::ExportDefault { .. }) => false,
        _ => true,
    }
}
