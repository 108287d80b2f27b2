//! Binding name assignment.
//!
//! Scopes are visited parents first. Each eligible binding takes the next
//! name from its scope's counter that no binding visible at any of its
//! occurrences already answers to. Sibling scopes number independently, so
//! disjoint blocks reuse the shortest names.

use crate::base54::{Alphabet, CharFrequency};
use crate::name_cache::NameCache;
use crate::options::MangleOptions;
use jsz_binder::{BinderState, BindingId, DeclKind, ExportKind, ScopeId};
use jsz_parser::{NodeArena, NodeData};
use jsz_scanner::{is_identifier, is_reserved_word};
use rustc_hash::FxHashSet;
use tracing::{debug, debug_span, trace};

/// Whether the mangler may rename `id`.
pub fn is_mangleable(binder: &BinderState, id: BindingId, options: &MangleOptions) -> bool {
    let binding = binder.binding(id);
    if binding.orig.is_empty() && binding.references.is_empty() {
        return false;
    }
    if binding.is_undeclared()
        || binding.redefined.is_some()
        || (binding.is_global() && !options.mangle_top_level)
        || binding.export == ExportKind::NoMangle
        || binder.is_pinned(id)
        || options.is_reserved(&binding.name)
    {
        return false;
    }
    let keep = match binding.kind {
        DeclKind::Arguments | DeclKind::Global => return false,
        DeclKind::Function | DeclKind::FunctionName => options.keep_function_names.as_ref(),
        DeclKind::Class | DeclKind::ClassName => options.keep_class_names.as_ref(),
        _ => None,
    };
    !keep.is_some_and(|predicate| predicate.matches(&binding.name))
}

/// Character frequency of `printed`, not counting the names about to be
/// replaced.
pub fn char_frequency(printed: &str, binder: &BinderState, options: &MangleOptions) -> CharFrequency {
    let mut frequency = CharFrequency::analyze(printed);
    for binding in &binder.bindings {
        if is_mangleable(binder, binding.id, options) {
            let occurrences = (binding.orig.len() + binding.references.len()) as i64;
            frequency.consider(&binding.name, -occurrences);
        }
    }
    frequency
}

/// Assign a mangled name to every eligible binding and write the names into
/// the tree. Returns the number of bindings renamed.
pub fn mangle_names(
    arena: &mut NodeArena,
    binder: &mut BinderState,
    options: &MangleOptions,
    alphabet: &Alphabet,
    mut cache: Option<&mut NameCache>,
) -> usize {
    let _span = debug_span!("mangle_names").entered();
    let root = binder.root_scope();
    let cached_names: FxHashSet<String> = cache
        .as_deref()
        .map(|cache| cache.vars.values().cloned().collect())
        .unwrap_or_default();

    let mut renamed = 0;
    for scope in binder.scopes_preorder() {
        let bindings: Vec<BindingId> = binder.scope(scope).names.values().copied().collect();
        for id in bindings {
            if let Some(target) = binder.binding(id).redefined {
                let name = binder.binding(target).mangled_name.clone();
                binder.binding_mut(id).mangled_name = name;
                continue;
            }
            if !is_mangleable(binder, id, options) {
                continue;
            }
            let original = binder.binding(id).name.clone();
            let cached = (scope == root)
                .then(|| cache.as_deref().and_then(|cache| cache.vars.get(&original).cloned()))
                .flatten();
            let name = match cached {
                Some(name) => name,
                None => {
                    let reserved_here = if scope == root { Some(&cached_names) } else { None };
                    next_name(binder, id, scope, options, alphabet, reserved_here)
                }
            };
            trace!(from = %original, to = %name, "mangled");
            if scope == root
                && let Some(cache) = cache.as_deref_mut()
            {
                cache.vars.insert(original, name.clone());
            }
            binder.binding_mut(id).mangled_name = Some(name);
            renamed += 1;
        }
    }

    rename_occurrences(arena, binder);
    debug!(renamed, "names assigned");
    renamed
}

fn next_name(
    binder: &mut BinderState,
    id: BindingId,
    scope: ScopeId,
    options: &MangleOptions,
    alphabet: &Alphabet,
    also_reserved: Option<&FxHashSet<String>>,
) -> String {
    let taken = names_in_use(binder, id, scope, options);
    loop {
        let counter = &mut binder.scope_mut(scope).mangle_counter;
        let candidate = alphabet.name(*counter);
        *counter += 1;
        if is_reserved_word(&candidate)
            || !is_identifier(&candidate)
            || options.is_reserved(&candidate)
            || taken.contains(&candidate)
            || also_reserved.is_some_and(|names| names.contains(&candidate))
        {
            continue;
        }
        return candidate;
    }
}

/// Names `id` must not take: whatever any other binding answers to in the
/// scopes between its occurrences and its own scope.
fn names_in_use(
    binder: &BinderState,
    id: BindingId,
    scope: ScopeId,
    options: &MangleOptions,
) -> FxHashSet<String> {
    let mut scopes: FxHashSet<ScopeId> = FxHashSet::default();
    scopes.insert(scope);
    for reference in &binder.binding(id).references {
        let Some(&from) = binder.reference_scopes.get(reference) else {
            continue;
        };
        for s in binder.scope_chain(from) {
            if s == scope || !scopes.insert(s) {
                break;
            }
        }
    }

    let mut taken = FxHashSet::default();
    for s in scopes {
        let visible = binder.scope(s);
        for &other in visible.enclosed.iter().chain(visible.names.values()) {
            if other != id
                && let Some(name) = current_name(binder, other, options)
            {
                taken.insert(name);
            }
        }
    }
    taken
}

/// The name `id` will print as, if already settled.
fn current_name(binder: &BinderState, id: BindingId, options: &MangleOptions) -> Option<String> {
    let binding = binder.binding(id);
    if let Some(name) = &binding.mangled_name {
        return Some(name.clone());
    }
    if let Some(target) = binding.redefined {
        return current_name(binder, target, options);
    }
    (!is_mangleable(binder, id, options)).then(|| binding.name.clone())
}

fn rename_occurrences(arena: &mut NodeArena, binder: &BinderState) {
    for binding in &binder.bindings {
        let Some(mangled) = &binding.mangled_name else {
            continue;
        };
        for &node in binding.orig.iter().chain(&binding.references) {
            if let Some(NodeData::Identifier { name }) = arena.data_mut(node) {
                name.clone_from(mangled);
            }
        }
    }
}
