//! Side-effect queries for expressions.

use jsz_binder::BinderState;
use jsz_parser::{BinaryOp, NodeArena, NodeData, NodeIndex, UnaryOp};

/// Globals that can be read without a `ReferenceError`.
const SAFE_GLOBALS: &[&str] = &["undefined", "NaN", "Infinity"];

/// Whether evaluating `idx` could have an observable effect (including
/// throwing).
pub fn has_side_effects(arena: &NodeArena, binder: &BinderState, idx: NodeIndex) -> bool {
    if idx.is_none() {
        return false;
    }
    let Some(data) = arena.data(idx) else {
        return false;
    };
    let any = |nodes: &[NodeIndex]| nodes.iter().any(|&n| has_side_effects(arena, binder, n));
    match data {
        NodeData::NumericLiteral { .. }
        | NodeData::BigIntLiteral { .. }
        | NodeData::StringLiteral { .. }
        | NodeData::RegExpLiteral { .. }
        | NodeData::BooleanLiteral { .. }
        | NodeData::NullLiteral
        | NodeData::This
        | NodeData::MetaProperty { .. }
        | NodeData::FunctionExpression(_)
        | NodeData::ArrowFunction(_)
        | NodeData::Empty => false,

        NodeData::Identifier { name } => match binder.binding_of(idx) {
            Some(binding) => {
                binder.binding(binding).is_undeclared() && !SAFE_GLOBALS.contains(&name.as_str())
            }
            None => !SAFE_GLOBALS.contains(&name.as_str()),
        },

        NodeData::ClassExpression(class) => {
            has_side_effects(arena, binder, class.extends)
                || class.members.iter().any(|&m| member_has_side_effects(arena, binder, m))
        }
        NodeData::ArrayLiteral { elements } => elements
            .iter()
            .any(|&e| matches!(arena.data(e), Some(NodeData::Spread { .. })) || has_side_effects(arena, binder, e)),
        NodeData::ObjectLiteral { properties } => properties.iter().any(|&p| match arena.data(p) {
            Some(NodeData::Property {
                key,
                value,
                computed,
                ..
            }) => (*computed && has_side_effects(arena, binder, *key)) || has_side_effects(arena, binder, *value),
            _ => true,
        }),
        NodeData::TemplateLiteral { expressions, .. } => any(expressions),

        NodeData::Unary {
            op: UnaryOp::Delete,
            ..
        } => true,
        NodeData::Unary {
            op: UnaryOp::TypeOf,
            operand,
        } if matches!(arena.data(*operand), Some(NodeData::Identifier { .. })) => false,
        NodeData::Unary { operand, .. } => has_side_effects(arena, binder, *operand),
        NodeData::Binary { op, left, right } => {
            matches!(op, BinaryOp::In | BinaryOp::InstanceOf)
                || has_side_effects(arena, binder, *left)
                || has_side_effects(arena, binder, *right)
        }
        NodeData::Conditional {
            test,
            consequent,
            alternate,
        } => any(&[*test, *consequent, *alternate]),
        NodeData::Sequence { expressions } => any(expressions),

        _ => true,
    }
}

fn member_has_side_effects(arena: &NodeArena, binder: &BinderState, member: NodeIndex) -> bool {
    match arena.data(member) {
        Some(NodeData::MethodDefinition { key, computed, .. }) => {
            *computed && has_side_effects(arena, binder, *key)
        }
        Some(NodeData::PropertyDefinition {
            key,
            value,
            is_static,
            computed,
        }) => {
            (*computed && has_side_effects(arena, binder, *key))
                || (*is_static && has_side_effects(arena, binder, *value))
        }
        Some(NodeData::StaticBlock { body }) => !body.is_empty(),
        _ => true,
    }
}

/// Whether a class declaration or expression can be dropped without losing
/// effects.
pub fn class_has_side_effects(arena: &NodeArena, binder: &BinderState, class: NodeIndex) -> bool {
    arena.class_data(class).is_none_or(|c| {
        has_side_effects(arena, binder, c.extends)
            || c.members.iter().any(|&m| member_has_side_effects(arena, binder, m))
    })
}

/// Side-effecting parts of a class that must survive when the class itself
/// is dropped: the heritage expression and computed keys, in order. `None`
/// when the class cannot be reduced to such expressions.
pub fn class_effects(arena: &NodeArena, binder: &BinderState, class: NodeIndex) -> Option<Vec<NodeIndex>> {
    let c = arena.class_data(class)?;
    let mut effects = Vec::new();
    if has_side_effects(arena, binder, c.extends) {
        effects.push(c.extends);
    }
    for &member in &c.members {
        match arena.data(member)? {
            NodeData::MethodDefinition { key, computed, .. } => {
                if *computed && has_side_effects(arena, binder, *key) {
                    effects.push(*key);
                }
            }
            NodeData::PropertyDefinition {
                key,
                value,
                is_static,
                computed,
            } => {
                if *is_static && has_side_effects(arena, binder, *value) {
                    return None;
                }
                if *computed && has_side_effects(arena, binder, *key) {
                    effects.push(*key);
                }
            }
            NodeData::StaticBlock { body } if body.is_empty() => {}
            _ => return None,
        }
    }
    Some(effects)
}
