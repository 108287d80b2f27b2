//! Results of one round of value analysis.
//!
//! [`Analysis`] records, for every read the analyzer proved safe, the value
//! the binding held at that read. Queries fold those values into constants
//! on demand.

use crate::evaluate::{ConstantValue, evaluate_binary, evaluate_with};
use jsz_binder::{BinderState, BindingId, FixedValue};
use jsz_parser::{NodeArena, NodeData, NodeIndex, PropertyKind};
use rustc_hash::FxHashMap;

/// Bound on chasing one binding's value through another's.
const MAX_VALUE_CHAIN: u32 = 16;

#[derive(Debug, Default)]
pub struct Analysis {
    /// Safe reads: reference occurrence -> (binding, value at the read).
    pub(crate) reads: FxHashMap<NodeIndex, (BindingId, FixedValue)>,
    /// Shallowest depth at which a binding's value escaped.
    pub(crate) escaped: FxHashMap<BindingId, u32>,
    /// Safe reads per binding.
    pub(crate) safe_reads: FxHashMap<BindingId, u32>,
}

impl Analysis {
    /// Value of the binding at `reference`, if the read was proven safe.
    pub fn fixed_value(&self, reference: NodeIndex) -> Option<&FixedValue> {
        self.reads.get(&reference).map(|(_, value)| value)
    }

    /// Whether the binding's value itself flowed somewhere untracked.
    pub fn is_escaped(&self, binding: BindingId) -> bool {
        self.escaped.get(&binding).is_some_and(|&depth| depth <= 1)
    }

    pub fn escape_depth(&self, binding: BindingId) -> Option<u32> {
        self.escaped.get(&binding).copied()
    }

    pub fn safe_read_count(&self, binding: BindingId) -> u32 {
        self.safe_reads.get(&binding).copied().unwrap_or(0)
    }

    /// Primitive value of the read at `reference`.
    pub fn constant_value(
        &self,
        arena: &NodeArena,
        binder: &BinderState,
        reference: NodeIndex,
    ) -> Option<ConstantValue> {
        self.identifier_value(arena, binder, reference, 0)
    }

    /// Fold the expression at `idx`, using safe reads for identifiers.
    pub fn evaluate(
        &self,
        arena: &NodeArena,
        binder: &BinderState,
        idx: NodeIndex,
    ) -> Option<ConstantValue> {
        self.evaluate_at(arena, binder, idx, 0)
    }

    /// Constant value of property `key` of the object literal `reference`
    /// is bound to. The object must never have escaped whole.
    pub fn property_value(
        &self,
        arena: &NodeArena,
        binder: &BinderState,
        reference: NodeIndex,
        key: &str,
    ) -> Option<ConstantValue> {
        let (binding, FixedValue::Node(object)) = self.reads.get(&reference)? else {
            return None;
        };
        if self.is_escaped(*binding) {
            return None;
        }
        let NodeData::ObjectLiteral { properties } = arena.data(*object)? else {
            return None;
        };
        let mut found = None;
        for &property in properties {
            let NodeData::Property {
                key: prop_key,
                value,
                kind,
                computed,
            } = arena.data(property)?
            else {
                return None;
            };
            if *computed {
                return None;
            }
            let name = arena.property_key_text(*prop_key)?;
            if name == "__proto__" {
                return None;
            }
            if name == key {
                found = match kind {
                    PropertyKind::Init | PropertyKind::Shorthand => Some(*value),
                    _ => return None,
                };
            }
        }
        self.evaluate_at(arena, binder, found?, 1)
    }

    // =========================================================================
    // Folding
    // =========================================================================

    fn evaluate_at(
        &self,
        arena: &NodeArena,
        binder: &BinderState,
        idx: NodeIndex,
        depth: u32,
    ) -> Option<ConstantValue> {
        if depth > MAX_VALUE_CHAIN {
            return None;
        }
        evaluate_with(arena, idx, &mut |ident| {
            self.identifier_value(arena, binder, ident, depth + 1)
        })
    }

    fn identifier_value(
        &self,
        arena: &NodeArena,
        binder: &BinderState,
        ident: NodeIndex,
        depth: u32,
    ) -> Option<ConstantValue> {
        if let Some((_, value)) = self.reads.get(&ident) {
            return self.fixed_constant(arena, binder, value, depth);
        }
        let binding = binder.binding(binder.binding_of(ident)?);
        if !binding.is_undeclared() {
            return None;
        }
        match binding.name.as_str() {
            "undefined" => Some(ConstantValue::Undefined),
            "NaN" => Some(ConstantValue::Number(f64::NAN)),
            "Infinity" => Some(ConstantValue::Number(f64::INFINITY)),
            _ => None,
        }
    }

    fn fixed_constant(
        &self,
        arena: &NodeArena,
        binder: &BinderState,
        value: &FixedValue,
        depth: u32,
    ) -> Option<ConstantValue> {
        if depth > MAX_VALUE_CHAIN {
            return None;
        }
        match value {
            FixedValue::Undefined => Some(ConstantValue::Undefined),
            FixedValue::Node(node) => self.evaluate_at(arena, binder, *node, depth + 1),
            FixedValue::Function(_) => None,
            FixedValue::Compound { op, prev, rhs } => {
                let left = self.fixed_constant(arena, binder, prev, depth + 1)?;
                let right = self.evaluate_at(arena, binder, *rhs, depth + 1)?;
                evaluate_binary(*op, &left, &right)
            }
            FixedValue::Update { prev, delta } => {
                let previous = self.fixed_constant(arena, binder, prev, depth + 1)?;
                Some(ConstantValue::Number(previous.to_number() + delta))
            }
        }
    }
}
