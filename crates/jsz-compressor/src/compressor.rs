//! Round driver.
//!
//! A round rebuilds the scope graph from the current tree, runs the value
//! analysis, then the rewrites that consume it. Rounds repeat up to the
//! configured pass count and stop early once a round changes nothing.

use crate::dead_code::DeadCodeRemover;
use crate::drop_unused::drop_unused;
use crate::options::CompressOptions;
use crate::reduce_vars::analyze;
use crate::substitute::substitute;
use jsz_binder::{BindError, BinderOptions, BinderState};
use jsz_common::limits::MAX_COMPRESS_PASSES;
use jsz_common::{DiagnosticBag, LineMap};
use jsz_parser::{NodeArena, NodeIndex};
use tracing::{debug, debug_span};

/// Result of compressing one program.
#[derive(Debug, Default)]
pub struct CompressOutput {
    /// Warnings about removed code.
    pub diagnostics: DiagnosticBag,
    /// Rounds that ran.
    pub rounds: u32,
    /// Rewrites applied across all rounds.
    pub changes: usize,
}

/// Compressor for one source file.
pub struct Compressor<'a> {
    file_name: &'a str,
    line_map: &'a LineMap,
    binder_options: BinderOptions,
    options: &'a CompressOptions,
}

impl<'a> Compressor<'a> {
    pub fn new(
        file_name: &'a str,
        line_map: &'a LineMap,
        binder_options: BinderOptions,
        options: &'a CompressOptions,
    ) -> Self {
        Compressor {
            file_name,
            line_map,
            binder_options,
            options,
        }
    }

    /// Rewrite the tree rooted at `root` in place.
    pub fn compress(&self, arena: &mut NodeArena, root: NodeIndex) -> Result<CompressOutput, BindError> {
        let _span = debug_span!("compress", file = %self.file_name).entered();
        let mut output = CompressOutput {
            diagnostics: DiagnosticBag::with_file(self.file_name),
            ..CompressOutput::default()
        };
        let passes = self.options.passes.clamp(1, MAX_COMPRESS_PASSES);
        for index in 0..passes {
            let changes = self.round(arena, root, index, &mut output.diagnostics)?;
            output.rounds += 1;
            output.changes += changes;
            if changes == 0 {
                break;
            }
        }
        debug!(rounds = output.rounds, changes = output.changes, "compression finished");
        Ok(output)
    }

    fn round(
        &self,
        arena: &mut NodeArena,
        root: NodeIndex,
        index: u32,
        diagnostics: &mut DiagnosticBag,
    ) -> Result<usize, BindError> {
        let _span = debug_span!("round", index).entered();
        let mut binder = BinderState::new(self.file_name, self.binder_options.clone());
        binder.bind_source_file(arena, root, self.line_map)?;

        let analysis = self
            .options
            .reduce_vars
            .then(|| analyze(arena, &mut binder, root, self.options.toplevel));

        let mut changes = 0;
        if self.options.inline_constants
            && let Some(analysis) = &analysis
        {
            changes += substitute(arena, &mut binder, analysis, self.options, root);
        }
        if self.options.dead_code {
            changes += DeadCodeRemover::new(arena, &mut binder, analysis.as_ref(), diagnostics).run(root);
        }
        if self.options.drop_unused {
            changes += drop_unused(arena, &mut binder, self.options, diagnostics, root);
        }
        debug!(changes, "round finished");
        Ok(changes)
    }
}
