//! Constant folding over JavaScript primitive values.

use jsz_parser::{BinaryOp, NodeArena, NodeData, NodeIndex, UnaryOp, number_key};

/// A primitive value known at compile time.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl ConstantValue {
    pub fn to_boolean(&self) -> bool {
        match self {
            ConstantValue::Undefined | ConstantValue::Null => false,
            ConstantValue::Bool(b) => *b,
            ConstantValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ConstantValue::String(s) => !s.is_empty(),
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            ConstantValue::Undefined => f64::NAN,
            ConstantValue::Null => 0.0,
            ConstantValue::Bool(b) => f64::from(u8::from(*b)),
            ConstantValue::Number(n) => *n,
            ConstantValue::String(s) => string_to_number(s),
        }
    }

    pub fn to_js_string(&self) -> String {
        match self {
            ConstantValue::Undefined => "undefined".to_string(),
            ConstantValue::Null => "null".to_string(),
            ConstantValue::Bool(b) => b.to_string(),
            ConstantValue::Number(n) => number_to_string(*n),
            ConstantValue::String(s) => s.clone(),
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            ConstantValue::Undefined => "undefined",
            ConstantValue::Null => "object",
            ConstantValue::Bool(_) => "boolean",
            ConstantValue::Number(_) => "number",
            ConstantValue::String(_) => "string",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, ConstantValue::Undefined | ConstantValue::Null)
    }

    /// Length of the shortest literal the printer emits for this value.
    pub fn printed_len(&self) -> usize {
        match self {
            ConstantValue::Undefined => "void 0".len(),
            ConstantValue::Null => 4,
            ConstantValue::Bool(_) => 2,
            ConstantValue::Number(n) => {
                let text = number_to_string(n.abs());
                text.strip_prefix("0.").map_or(text.len(), |rest| rest.len() + 1)
                    + usize::from(n.is_sign_negative())
            }
            ConstantValue::String(s) => s.chars().count() + 2,
        }
    }

    /// Whether the value can be written back as a literal.
    pub fn is_materializable(&self) -> bool {
        match self {
            ConstantValue::Number(n) => n.is_finite() && !(*n == 0.0 && n.is_sign_negative()),
            _ => true,
        }
    }
}

/// `Number::toString()` for finite and non-finite values.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        };
    }
    number_key(value)
}

fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let radix = |prefix: &[&str], radix: u32| {
        prefix
            .iter()
            .find_map(|p| trimmed.strip_prefix(p))
            .map(|digits| u64::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64))
    };
    if let Some(value) = radix(&["0x", "0X"], 16)
        .or_else(|| radix(&["0o", "0O"], 8))
        .or_else(|| radix(&["0b", "0B"], 2))
    {
        return value;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) =>
        {
            trimmed.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

fn to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let truncated = value.trunc() % 4_294_967_296.0;
    let wrapped = if truncated < 0.0 {
        truncated + 4_294_967_296.0
    } else {
        truncated
    };
    wrapped as u32 as i32
}

fn to_uint32(value: f64) -> u32 {
    to_int32(value) as u32
}

// =============================================================================
// Folding
// =============================================================================

pub fn evaluate_unary(op: UnaryOp, value: &ConstantValue) -> Option<ConstantValue> {
    Some(match op {
        UnaryOp::Not => ConstantValue::Bool(!value.to_boolean()),
        UnaryOp::Minus => ConstantValue::Number(-value.to_number()),
        UnaryOp::Plus => ConstantValue::Number(value.to_number()),
        UnaryOp::BitNot => ConstantValue::Number(f64::from(!to_int32(value.to_number()))),
        UnaryOp::TypeOf => ConstantValue::String(value.type_of().to_string()),
        UnaryOp::Void => ConstantValue::Undefined,
        UnaryOp::Delete => return None,
    })
}

pub fn evaluate_binary(
    op: BinaryOp,
    left: &ConstantValue,
    right: &ConstantValue,
) -> Option<ConstantValue> {
    use ConstantValue::{Bool, Number};
    let numbers = || (left.to_number(), right.to_number());
    let value = match op {
        BinaryOp::Add => match (left, right) {
            (ConstantValue::String(_), _) | (_, ConstantValue::String(_)) => {
                ConstantValue::String(left.to_js_string() + &right.to_js_string())
            }
            _ => Number(left.to_number() + right.to_number()),
        },
        BinaryOp::Sub => {
            let (l, r) = numbers();
            Number(l - r)
        }
        BinaryOp::Mul => {
            let (l, r) = numbers();
            Number(l * r)
        }
        BinaryOp::Div => {
            let (l, r) = numbers();
            Number(l / r)
        }
        BinaryOp::Mod => {
            let (l, r) = numbers();
            Number(l % r)
        }
        BinaryOp::Exp => {
            let (l, r) = numbers();
            if r.is_nan() || (l.abs() == 1.0 && r.is_infinite()) {
                Number(f64::NAN)
            } else {
                Number(l.powf(r))
            }
        }
        BinaryOp::Shl => {
            let (l, r) = numbers();
            Number(f64::from(to_int32(l).wrapping_shl(to_uint32(r) & 31)))
        }
        BinaryOp::Shr => {
            let (l, r) = numbers();
            Number(f64::from(to_int32(l).wrapping_shr(to_uint32(r) & 31)))
        }
        BinaryOp::UShr => {
            let (l, r) = numbers();
            Number(f64::from(to_uint32(l).wrapping_shr(to_uint32(r) & 31)))
        }
        BinaryOp::BitAnd => {
            let (l, r) = numbers();
            Number(f64::from(to_int32(l) & to_int32(r)))
        }
        BinaryOp::BitOr => {
            let (l, r) = numbers();
            Number(f64::from(to_int32(l) | to_int32(r)))
        }
        BinaryOp::BitXor => {
            let (l, r) = numbers();
            Number(f64::from(to_int32(l) ^ to_int32(r)))
        }
        BinaryOp::StrictEq => Bool(strict_equals(left, right)),
        BinaryOp::StrictNotEq => Bool(!strict_equals(left, right)),
        BinaryOp::Eq => Bool(loose_equals(left, right)?),
        BinaryOp::NotEq => Bool(!loose_equals(left, right)?),
        BinaryOp::Lt => Bool(compare(left, right, |o| o.is_lt())),
        BinaryOp::Gt => Bool(compare(left, right, |o| o.is_gt())),
        BinaryOp::LtEq => Bool(compare(left, right, |o| o.is_le())),
        BinaryOp::GtEq => Bool(compare(left, right, |o| o.is_ge())),
        BinaryOp::And => {
            if left.to_boolean() {
                right.clone()
            } else {
                left.clone()
            }
        }
        BinaryOp::Or => {
            if left.to_boolean() {
                left.clone()
            } else {
                right.clone()
            }
        }
        BinaryOp::Nullish => {
            if left.is_nullish() {
                right.clone()
            } else {
                left.clone()
            }
        }
        BinaryOp::In | BinaryOp::InstanceOf => return None,
    };
    Some(value)
}

fn strict_equals(left: &ConstantValue, right: &ConstantValue) -> bool {
    match (left, right) {
        (ConstantValue::Number(l), ConstantValue::Number(r)) => l == r,
        _ => left == right,
    }
}

fn loose_equals(left: &ConstantValue, right: &ConstantValue) -> Option<bool> {
    use ConstantValue::*;
    match (left, right) {
        (Undefined | Null, Undefined | Null) => Some(true),
        (Undefined | Null, _) | (_, Undefined | Null) => Some(false),
        (Number(_), String(_)) | (String(_), Number(_)) | (Bool(_), _) | (_, Bool(_)) => {
            Some(left.to_number() == right.to_number())
        }
        _ => Some(strict_equals(left, right)),
    }
}

fn compare(
    left: &ConstantValue,
    right: &ConstantValue,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    if let (ConstantValue::String(l), ConstantValue::String(r)) = (left, right) {
        return accept(l.encode_utf16().cmp(r.encode_utf16()));
    }
    left.to_number()
        .partial_cmp(&right.to_number())
        .is_some_and(accept)
}

// =============================================================================
// Literals
// =============================================================================

/// Value of a literal node, or of a pure composition of literal nodes.
pub fn literal_value(arena: &NodeArena, idx: NodeIndex) -> Option<ConstantValue> {
    evaluate_with(arena, idx, &mut |_| None)
}

/// Fold the expression at `idx`, asking `lookup` for identifier values.
pub fn evaluate_with(
    arena: &NodeArena,
    idx: NodeIndex,
    lookup: &mut dyn FnMut(NodeIndex) -> Option<ConstantValue>,
) -> Option<ConstantValue> {
    match arena.data(idx)? {
        NodeData::NumericLiteral { value } => Some(ConstantValue::Number(*value)),
        NodeData::StringLiteral { value } => Some(ConstantValue::String(value.clone())),
        NodeData::BooleanLiteral { value } => Some(ConstantValue::Bool(*value)),
        NodeData::NullLiteral => Some(ConstantValue::Null),
        NodeData::Identifier { .. } => lookup(idx),
        NodeData::Unary {
            op: UnaryOp::Void,
            operand,
        } => {
            // `void` discards its operand but still evaluates it.
            evaluate_with(arena, *operand, lookup).map(|_| ConstantValue::Undefined)
        }
        NodeData::Unary { op, operand } => {
            let value = evaluate_with(arena, *operand, lookup)?;
            evaluate_unary(*op, &value)
        }
        NodeData::Binary { op, left, right } => {
            let l = evaluate_with(arena, *left, lookup)?;
            if op.is_logical() {
                let short_circuits = match op {
                    BinaryOp::And => !l.to_boolean(),
                    BinaryOp::Or => l.to_boolean(),
                    _ => !l.is_nullish(),
                };
                if short_circuits {
                    return Some(l);
                }
            }
            let r = evaluate_with(arena, *right, lookup)?;
            evaluate_binary(*op, &l, &r)
        }
        NodeData::Conditional {
            test,
            consequent,
            alternate,
        } => {
            let branch = if evaluate_with(arena, *test, lookup)?.to_boolean() {
                *consequent
            } else {
                *alternate
            };
            evaluate_with(arena, branch, lookup)
        }
        NodeData::Sequence { expressions } => {
            let mut last = None;
            for &expression in expressions {
                last = Some(evaluate_with(arena, expression, lookup)?);
            }
            last
        }
        NodeData::TemplateLiteral {
            quasis,
            expressions,
        } => {
            // Only templates whose raw text is free of escapes fold.
            if quasis.iter().any(|q| q.contains('\\')) {
                return None;
            }
            let mut out = String::new();
            for (i, quasi) in quasis.iter().enumerate() {
                out.push_str(quasi);
                if let Some(&expression) = expressions.get(i) {
                    out.push_str(&evaluate_with(arena, expression, lookup)?.to_js_string());
                }
            }
            Some(ConstantValue::String(out))
        }
        _ => None,
    }
}

/// Node data for a literal spelling `value`. Negative numbers and `void 0`
/// need a child node, allocated next to `like`.
pub fn materialize(
    arena: &mut NodeArena,
    like: NodeIndex,
    value: &ConstantValue,
) -> Option<NodeData> {
    if !value.is_materializable() {
        return None;
    }
    Some(match value {
        ConstantValue::Undefined => {
            let zero = arena.add_like(like, NodeData::NumericLiteral { value: 0.0 });
            NodeData::Unary {
                op: UnaryOp::Void,
                operand: zero,
            }
        }
        ConstantValue::Null => NodeData::NullLiteral,
        ConstantValue::Bool(value) => NodeData::BooleanLiteral { value: *value },
        ConstantValue::Number(n) if n.is_sign_negative() => {
            let magnitude = arena.add_like(like, NodeData::NumericLiteral { value: -n });
            NodeData::Unary {
                op: UnaryOp::Minus,
                operand: magnitude,
            }
        }
        ConstantValue::Number(n) => NodeData::NumericLiteral { value: *n },
        ConstantValue::String(s) => NodeData::StringLiteral { value: s.clone() },
    })
}
