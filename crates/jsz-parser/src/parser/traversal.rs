//! Generic traversal over the arena.
//!
//! `children` lists a node's direct children in evaluation order, skipping
//! absent (`NONE`) slots. `visit` is a depth-first walk with pre and post
//! callbacks; both get mutable access to the arena and may replace the data
//! of the node they are called for. Children are computed after `pre` runs,
//! so a replacement made in `pre` is what gets descended into.

use super::base::NodeIndex;
use super::node::{NodeArena, NodeData};
use smallvec::SmallVec;

pub type Children = SmallVec<[NodeIndex; 4]>;

/// Returned by the `pre` callback of [`visit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitAction {
    Continue,
    SkipChildren,
}

/// Direct children of `index` in evaluation order.
pub fn children(arena: &NodeArena, index: NodeIndex) -> Children {
    let mut out = Children::new();
    let Some(data) = arena.data(index) else {
        return out;
    };
    let mut push = |idx: NodeIndex| {
        if idx.is_some() {
            out.push(idx);
        }
    };
    match data {
        NodeData::SourceFile { statements, .. } | NodeData::Block { statements } => {
            statements.iter().copied().for_each(&mut push)
        }
        NodeData::StaticBlock { body } => body.iter().copied().for_each(&mut push),

        NodeData::Identifier { .. }
        | NodeData::PropertyIdentifier { .. }
        | NodeData::PrivateName { .. }
        | NodeData::LabelIdentifier { .. }
        | NodeData::NumericLiteral { .. }
        | NodeData::BigIntLiteral { .. }
        | NodeData::StringLiteral { .. }
        | NodeData::RegExpLiteral { .. }
        | NodeData::BooleanLiteral { .. }
        | NodeData::NullLiteral
        | NodeData::This
        | NodeData::Super
        | NodeData::MetaProperty { .. }
        | NodeData::Empty
        | NodeData::Debugger
        | NodeData::ExportAll { .. } => {}

        NodeData::TemplateLiteral { expressions, .. } => {
            expressions.iter().copied().for_each(&mut push)
        }
        NodeData::TaggedTemplate { tag, quasi } => {
            push(*tag);
            push(*quasi);
        }
        NodeData::ArrayLiteral { elements } | NodeData::ArrayPattern { elements } => {
            elements.iter().copied().for_each(&mut push)
        }
        NodeData::ObjectLiteral { properties } | NodeData::ObjectPattern { properties } => {
            properties.iter().copied().for_each(&mut push)
        }
        NodeData::Property { key, value, .. } => {
            push(*key);
            push(*value);
        }
        NodeData::Spread { expression } => push(*expression),
        NodeData::FunctionExpression(f)
        | NodeData::ArrowFunction(f)
        | NodeData::FunctionDeclaration(f) => {
            push(f.name);
            f.params.iter().copied().for_each(&mut push);
            push(f.body);
        }
        NodeData::ClassExpression(c) | NodeData::ClassDeclaration(c) => {
            push(c.name);
            push(c.extends);
            c.members.iter().copied().for_each(&mut push);
        }
        NodeData::Unary { operand, .. } | NodeData::Update { operand, .. } => push(*operand),
        NodeData::Binary { left, right, .. } => {
            push(*left);
            push(*right);
        }
        NodeData::Assign { target, value, .. } => {
            push(*target);
            push(*value);
        }
        NodeData::Conditional {
            test,
            consequent,
            alternate,
        }
        | NodeData::If {
            test,
            consequent,
            alternate,
        } => {
            push(*test);
            push(*consequent);
            push(*alternate);
        }
        NodeData::Call {
            callee, arguments, ..
        }
        | NodeData::New { callee, arguments } => {
            push(*callee);
            arguments.iter().copied().for_each(&mut push);
        }
        NodeData::ImportCall { argument }
        | NodeData::Await { argument }
        | NodeData::Yield { argument, .. }
        | NodeData::Return { argument }
        | NodeData::Throw { argument } => push(*argument),
        NodeData::Member {
            object, property, ..
        } => {
            push(*object);
            push(*property);
        }
        NodeData::Index { object, index, .. } => {
            push(*object);
            push(*index);
        }
        NodeData::Sequence { expressions } => expressions.iter().copied().for_each(&mut push),
        NodeData::AssignmentPattern { target, default } => {
            push(*target);
            push(*default);
        }
        NodeData::Rest { argument } => push(*argument),
        NodeData::MethodDefinition { key, value, .. }
        | NodeData::PropertyDefinition { key, value, .. } => {
            push(*key);
            push(*value);
        }
        NodeData::VariableStatement { declarations, .. } => {
            declarations.iter().copied().for_each(&mut push)
        }
        NodeData::VariableDeclarator { name, init } => {
            push(*name);
            push(*init);
        }
        NodeData::ExpressionStatement { expression } => push(*expression),
        NodeData::For {
            init,
            test,
            update,
            body,
        } => {
            push(*init);
            push(*test);
            push(*body);
            push(*update);
        }
        NodeData::ForIn { left, right, body } | NodeData::ForOf { left, right, body, .. } => {
            push(*right);
            push(*left);
            push(*body);
        }
        NodeData::While { test, body } => {
            push(*test);
            push(*body);
        }
        NodeData::DoWhile { body, test } => {
            push(*body);
            push(*test);
        }
        NodeData::Break { label } | NodeData::Continue { label } => push(*label),
        NodeData::Labeled { label, body } => {
            push(*label);
            push(*body);
        }
        NodeData::Switch {
            discriminant,
            cases,
        } => {
            push(*discriminant);
            cases.iter().copied().for_each(&mut push);
        }
        NodeData::SwitchCase { test, consequent } => {
            push(*test);
            consequent.iter().copied().for_each(&mut push);
        }
        NodeData::Try {
            block,
            handler,
            finalizer,
        } => {
            push(*block);
            push(*handler);
            push(*finalizer);
        }
        NodeData::CatchClause { param, body } => {
            push(*param);
            push(*body);
        }
        NodeData::With { object, body } => {
            push(*object);
            push(*body);
        }
        NodeData::ImportDeclaration { specifiers, .. } => {
            specifiers.iter().copied().for_each(&mut push)
        }
        NodeData::ImportSpecifier { local, .. }
        | NodeData::ImportDefaultSpecifier { local }
        | NodeData::ImportNamespaceSpecifier { local }
        | NodeData::ExportSpecifier { local, .. } => push(*local),
        NodeData::ExportNamed {
            declaration,
            specifiers,
            ..
        } => {
            push(*declaration);
            specifiers.iter().copied().for_each(&mut push);
        }
        NodeData::ExportDefault { declaration } => push(*declaration),
    }
    out
}

/// Direct children of `index` in reverse evaluation order.
pub fn children_rev(arena: &NodeArena, index: NodeIndex) -> Children {
    let mut out = children(arena, index);
    out.reverse();
    out
}

/// Depth-first walk from `root`.
pub fn visit<F, G>(arena: &mut NodeArena, root: NodeIndex, pre: &mut F, post: &mut G)
where
    F: FnMut(&mut NodeArena, NodeIndex) -> VisitAction,
    G: FnMut(&mut NodeArena, NodeIndex),
{
    if root.is_none() {
        return;
    }
    if pre(arena, root) == VisitAction::Continue {
        for child in children(arena, root) {
            visit(arena, child, pre, post);
        }
    }
    post(arena, root);
}

/// Every node reachable from `root`, in pre-order.
pub fn descendants(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(index) = stack.pop() {
        if index.is_none() {
            continue;
        }
        out.push(index);
        stack.extend(children_rev(arena, index));
    }
    out
}
