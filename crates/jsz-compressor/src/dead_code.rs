//! Dead branch and unreachable code removal.
//!
//! Branches are decided with the constant evaluator, using the safe reads
//! of the value analysis when one ran this round. Whatever is removed keeps
//! its `var` and function declarations, hoisted out without initializers.

use crate::analysis::Analysis;
use crate::evaluate::{ConstantValue, literal_value};
use crate::side_effects::has_side_effects;
use crate::tree::{
    ParentMap, eliminate_references, hoisted_declarations, is_attached, move_node, parent_map,
    statement_list, statement_list_mut, warn,
};
use jsz_binder::BinderState;
use jsz_common::DiagnosticBag;
use jsz_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use jsz_parser::{NodeArena, NodeData, NodeIndex, VarKind, descendants};
use tracing::trace;

pub(crate) struct DeadCodeRemover<'a> {
    pub(crate) arena: &'a mut NodeArena,
    pub(crate) binder: &'a mut BinderState,
    pub(crate) analysis: Option<&'a Analysis>,
    pub(crate) diagnostics: &'a mut DiagnosticBag,
    changes: usize,
}

impl<'a> DeadCodeRemover<'a> {
    pub(crate) fn new(
        arena: &'a mut NodeArena,
        binder: &'a mut BinderState,
        analysis: Option<&'a Analysis>,
        diagnostics: &'a mut DiagnosticBag,
    ) -> Self {
        DeadCodeRemover {
            arena,
            binder,
            analysis,
            diagnostics,
            changes: 0,
        }
    }

    /// Run every dead code rewrite once; returns the number of rewrites.
    pub(crate) fn run(mut self, root: NodeIndex) -> usize {
        let parents = parent_map(self.arena, root);
        for idx in descendants(self.arena, root) {
            if !is_attached(self.arena, &parents, idx, root) {
                continue;
            }
            match self.arena.data(idx) {
                Some(NodeData::If { .. }) => self.fold_if(idx, &parents),
                Some(NodeData::Conditional { .. }) => self.fold_conditional(idx),
                Some(NodeData::While { .. }) => self.fold_while(idx, &parents),
                _ => {}
            }
        }
        let parents = parent_map(self.arena, root);
        for idx in descendants(self.arena, root) {
            if statement_list(self.arena, idx).is_some()
                && is_attached(self.arena, &parents, idx, root)
            {
                self.drop_unreachable(idx);
            }
        }
        self.changes
    }

    /// Value of a side-effect-free condition.
    fn condition(&self, test: NodeIndex) -> Option<ConstantValue> {
        if has_side_effects(self.arena, self.binder, test) {
            return None;
        }
        match self.analysis {
            Some(analysis) => analysis.evaluate(self.arena, self.binder, test),
            None => literal_value(self.arena, test),
        }
    }

    // =========================================================================
    // Constant conditions
    // =========================================================================

    fn fold_if(&mut self, idx: NodeIndex, parents: &ParentMap) {
        let Some(&NodeData::If {
            test,
            consequent,
            alternate,
        }) = self.arena.data(idx)
        else {
            return;
        };
        let Some(value) = self.condition(test) else {
            return;
        };
        let taken = value.to_boolean();
        warn(
            self.diagnostics,
            self.arena,
            test,
            diagnostic_codes::CONDITION_ALWAYS,
            diagnostic_messages::CONDITION_ALWAYS,
            &[if taken { "true" } else { "false" }],
        );
        let (kept, dropped) = if taken {
            (consequent, alternate)
        } else {
            (alternate, consequent)
        };
        eliminate_references(self.arena, self.binder, test);
        let hoisted = self.drop_subtree(dropped);
        let mut replacement: Vec<NodeIndex> = kept.is_some().then_some(kept).into_iter().collect();
        replacement.extend(hoisted);
        self.replace_statement(idx, replacement, parents);
        self.changes += 1;
    }

    fn fold_conditional(&mut self, idx: NodeIndex) {
        let Some(&NodeData::Conditional {
            test,
            consequent,
            alternate,
        }) = self.arena.data(idx)
        else {
            return;
        };
        let Some(value) = self.condition(test) else {
            return;
        };
        let (kept, dropped) = if value.to_boolean() {
            (consequent, alternate)
        } else {
            (alternate, consequent)
        };
        eliminate_references(self.arena, self.binder, test);
        eliminate_references(self.arena, self.binder, dropped);
        move_node(self.arena, self.binder, kept, idx);
        self.changes += 1;
    }

    fn fold_while(&mut self, idx: NodeIndex, parents: &ParentMap) {
        let Some(&NodeData::While { test, body }) = self.arena.data(idx) else {
            return;
        };
        if self.condition(test).is_none_or(|value| value.to_boolean()) {
            return;
        }
        eliminate_references(self.arena, self.binder, test);
        let hoisted = self.drop_subtree(body);
        self.replace_statement(idx, hoisted.into_iter().collect(), parents);
        self.changes += 1;
    }

    /// Remove a statement subtree, returning the hoisted `var` statement
    /// that must take its place.
    fn drop_subtree(&mut self, subtree: NodeIndex) -> Option<NodeIndex> {
        if subtree.is_none() {
            return None;
        }
        let hoisted = hoisted_declarations(self.arena, self.binder, subtree);
        eliminate_references(self.arena, self.binder, subtree);
        hoisted
    }

    /// Put `replacement` where statement `idx` is: spliced into the owning
    /// statement list, or as a block in a single-statement position.
    fn replace_statement(&mut self, idx: NodeIndex, replacement: Vec<NodeIndex>, parents: &ParentMap) {
        let parent = parents.get(&idx).copied().unwrap_or(NodeIndex::NONE);
        let position = statement_list(self.arena, parent)
            .and_then(|list| list.iter().position(|&s| s == idx));
        if let Some(position) = position {
            let spliced: Vec<NodeIndex> = replacement
                .into_iter()
                .flat_map(|s| self.splice_candidates(s))
                .collect();
            if let Some(list) = statement_list_mut(self.arena, parent) {
                list.splice(position..=position, spliced);
            }
            return;
        }
        match replacement.as_slice() {
            [] => self.arena.make_empty(idx),
            [single] => move_node(self.arena, self.binder, *single, idx),
            _ => {
                self.arena.replace(
                    idx,
                    NodeData::Block {
                        statements: replacement,
                    },
                );
            }
        }
    }

    /// Statements of a block that can be inlined into the enclosing list
    /// without changing scoping; the block itself otherwise.
    fn splice_candidates(&self, statement: NodeIndex) -> Vec<NodeIndex> {
        let Some(NodeData::Block { statements }) = self.arena.data(statement) else {
            return vec![statement];
        };
        let lexical = statements.iter().any(|&s| match self.arena.data(s) {
            Some(NodeData::VariableStatement { kind, .. }) => kind.is_lexical(),
            Some(NodeData::ClassDeclaration(_) | NodeData::FunctionDeclaration(_)) => true,
            _ => false,
        });
        if lexical {
            vec![statement]
        } else {
            statements.clone()
        }
    }

    // =========================================================================
    // Unreachable code
    // =========================================================================

    fn drop_unreachable(&mut self, owner: NodeIndex) {
        let Some(statements) = statement_list(self.arena, owner) else {
            return;
        };
        let Some(jump) = statements
            .iter()
            .position(|&s| self.arena.data(s).is_some_and(NodeData::is_jump))
        else {
            return;
        };
        let tail: Vec<NodeIndex> = statements[jump + 1..].to_vec();
        if tail.iter().all(|&s| self.arena.is_empty_statement(s)) {
            if !tail.is_empty()
                && let Some(list) = statement_list_mut(self.arena, owner)
            {
                list.truncate(jump + 1);
            }
            return;
        }

        let mut kept = Vec::new();
        let mut declarations = false;
        for statement in tail {
            match self.arena.data(statement) {
                Some(NodeData::FunctionDeclaration(_)) => kept.push(statement),
                Some(NodeData::VariableStatement {
                    kind: VarKind::Var, ..
                }) => {
                    declarations = true;
                    kept.extend(self.drop_subtree(statement));
                }
                Some(NodeData::VariableStatement { .. } | NodeData::ClassDeclaration(_))
                    if self.declares_referenced(statement) =>
                {
                    kept.push(statement)
                }
                Some(NodeData::Empty) => {}
                _ => kept.extend(self.drop_subtree(statement)),
            }
        }
        if declarations {
            warn(
                self.diagnostics,
                self.arena,
                statements_after(self.arena, owner, jump),
                diagnostic_codes::DECLARATIONS_IN_UNREACHABLE_CODE,
                diagnostic_messages::DECLARATIONS_IN_UNREACHABLE_CODE,
                &[],
            );
        }
        warn(
            self.diagnostics,
            self.arena,
            statements_after(self.arena, owner, jump),
            diagnostic_codes::DROPPING_UNREACHABLE_CODE,
            diagnostic_messages::DROPPING_UNREACHABLE_CODE,
            &[],
        );
        trace!(kept = kept.len(), "dropped unreachable statements");
        if let Some(list) = statement_list_mut(self.arena, owner) {
            list.truncate(jump + 1);
            list.extend(kept);
        }
        self.changes += 1;
    }

    /// Whether a lexical declaration statement declares a binding that is
    /// still referenced.
    fn declares_referenced(&self, statement: NodeIndex) -> bool {
        descendants(self.arena, statement).into_iter().any(|idx| {
            !self.binder.is_reference(idx)
                && self
                    .binder
                    .binding_of(idx)
                    .is_some_and(|id| self.binder.binding(id).live_references() > 0)
        })
    }
}

fn statements_after(arena: &NodeArena, owner: NodeIndex, jump: usize) -> NodeIndex {
    statement_list(arena, owner)
        .and_then(|list| list.get(jump + 1).copied())
        .unwrap_or(owner)
}
