//! Property name mangling.
//!
//! Property names share one namespace across the whole program: every
//! occurrence of a renamed name gets the same replacement, whatever object
//! it is looked up on.

use crate::base54::Alphabet;
use crate::name_cache::NameCache;
use crate::options::PropertyMangleOptions;
use indexmap::IndexSet;
use jsz_parser::{NodeArena, NodeData, NodeIndex, descendants};
use jsz_scanner::{is_identifier, is_reserved_word};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, debug_span, trace};

/// Names of the standard library and common host objects.
static BUILTIN_PROPERTIES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "__proto__", "add", "addEventListener", "apply", "arguments", "assign", "bind", "call",
        "caller", "catch", "charAt", "charCodeAt", "clear", "codePointAt", "concat", "constructor",
        "create", "default", "defineProperty", "delete", "done", "endsWith", "entries", "error",
        "every", "exec", "exports", "fill", "filter", "finally", "find", "findIndex", "flat",
        "flatMap", "forEach", "freeze", "get", "getElementById", "getPrototypeOf", "has",
        "hasOwnProperty", "includes", "indexOf", "innerHTML", "isPrototypeOf", "iterator", "join",
        "keys", "lastIndex", "lastIndexOf", "length", "log", "map", "match", "message", "name",
        "next", "now", "padEnd", "padStart", "parse", "pop", "propertyIsEnumerable", "prototype",
        "push", "querySelector", "reduce", "reduceRight", "removeEventListener", "repeat",
        "replace", "require", "return", "reverse", "search", "set", "setPrototypeOf", "shift",
        "size", "slice", "some", "sort", "source", "splice", "split", "stack", "startsWith",
        "stringify", "style", "substr", "substring", "test", "textContent", "then", "throw",
        "toLocaleString", "toLowerCase", "toString", "toUpperCase", "trim", "unshift", "value",
        "valueOf", "values", "warn",
    ]
    .into_iter()
    .collect()
});

pub fn is_builtin_property(name: &str) -> bool {
    BUILTIN_PROPERTIES.contains(name)
}

/// A place a property name is spelled.
#[derive(Clone, Copy, Debug)]
struct Site {
    node: NodeIndex,
    quoted: bool,
}

/// Rename property names accepted by `options`. Returns the number of
/// distinct names renamed.
pub fn mangle_properties(
    arena: &mut NodeArena,
    root: NodeIndex,
    options: &PropertyMangleOptions,
    alphabet: &Alphabet,
    mut cache: Option<&mut NameCache>,
) -> usize {
    let _span = debug_span!("mangle_properties").entered();
    let sites = collect_sites(arena, root);

    let mut names: IndexSet<String> = IndexSet::new();
    let mut quoted: FxHashSet<String> = FxHashSet::default();
    for site in &sites {
        if let Some(name) = site_name(arena, site.node) {
            if site.quoted {
                quoted.insert(name.to_string());
            }
            names.insert(name.to_string());
        }
    }

    let wanted = |name: &str| {
        is_identifier(name)
            && !options.reserved.contains(name)
            && !is_builtin_property(name)
            && !(options.keep_quoted && quoted.contains(name))
            && options.only.as_ref().is_none_or(|only| only.matches(name))
    };
    let mut taken: FxHashSet<String> = names
        .iter()
        .filter(|name| !wanted(name.as_str()))
        .cloned()
        .collect();
    taken.extend(options.reserved.iter().cloned());
    if let Some(cache) = cache.as_deref() {
        taken.extend(cache.props.values().cloned());
    }

    let mut renames: FxHashMap<String, String> = FxHashMap::default();
    let mut counter = 0;
    for name in names.iter().filter(|name| wanted(name.as_str())) {
        let cached = cache.as_deref().and_then(|cache| cache.props.get(name).cloned());
        let replacement = match cached {
            Some(replacement) => replacement,
            None => loop {
                let candidate = alphabet.name(counter);
                counter += 1;
                if is_reserved_word(&candidate)
                    || !is_identifier(&candidate)
                    || is_builtin_property(&candidate)
                    || taken.contains(&candidate)
                {
                    continue;
                }
                break candidate;
            },
        };
        taken.insert(replacement.clone());
        if let Some(cache) = cache.as_deref_mut() {
            cache.props.insert(name.clone(), replacement.clone());
        }
        trace!(from = %name, to = %replacement, "mangled property");
        renames.insert(name.clone(), replacement);
    }

    for site in &sites {
        let Some(replacement) = site_name(arena, site.node).and_then(|name| renames.get(name)) else {
            continue;
        };
        let replacement = replacement.clone();
        match arena.data_mut(site.node) {
            Some(NodeData::PropertyIdentifier { name }) => *name = replacement,
            Some(NodeData::StringLiteral { value }) => *value = replacement,
            _ => {}
        }
    }
    debug!(renamed = renames.len(), "properties mangled");
    renames.len()
}

fn site_name(arena: &NodeArena, node: NodeIndex) -> Option<&str> {
    match arena.data(node)? {
        NodeData::PropertyIdentifier { name } => Some(name),
        NodeData::StringLiteral { value } => Some(value),
        _ => None,
    }
}

/// Dot accesses, string index accesses, and non-computed keys of object
/// literals, patterns and class members.
fn collect_sites(arena: &NodeArena, root: NodeIndex) -> Vec<Site> {
    let mut sites = Vec::new();
    let key = |node: NodeIndex, sites: &mut Vec<Site>| match arena.data(node) {
        Some(NodeData::PropertyIdentifier { .. }) => sites.push(Site { node, quoted: false }),
        Some(NodeData::StringLiteral { .. }) => sites.push(Site { node, quoted: true }),
        _ => {}
    };
    for idx in descendants(arena, root) {
        match arena.data(idx) {
            Some(NodeData::Member { property, .. }) => key(*property, &mut sites),
            Some(NodeData::Index { index, .. }) => key(*index, &mut sites),
            Some(
                NodeData::Property {
                    key: k,
                    computed: false,
                    ..
                }
                | NodeData::MethodDefinition {
                    key: k,
                    computed: false,
                    ..
                }
                | NodeData::PropertyDefinition {
                    key: k,
                    computed: false,
                    ..
                },
            ) => key(*k, &mut sites),
            _ => {}
        }
    }
    sites
}
