//! The minification pipeline: parse, compress, mangle, print.

use crate::options::{MinifyOptions, OptionsError};
use jsz_binder::{BindError, BinderState};
use jsz_common::diagnostics::DiagnosticBag;
use jsz_common::position::LineMap;
use jsz_compressor::Compressor;
use jsz_emitter::Printer;
use jsz_mangler::{NameCache, char_frequency, mangle_names, mangle_properties};
use jsz_parser::ParserState;
use std::fmt;
use tracing::{debug, debug_span};

#[derive(Debug)]
pub struct MinifyOutput {
    pub code: String,
    /// Warnings from the compressor.
    pub diagnostics: DiagnosticBag,
    /// The caller's cache extended with this file's names. `None` when
    /// mangling is off.
    pub name_cache: Option<NameCache>,
    /// Compressor rounds that ran.
    pub rounds: u32,
}

#[derive(Debug)]
pub enum MinifyError {
    /// The source does not parse. `diagnostics` holds every parse error.
    Parse {
        file: String,
        line: u32,
        column: u32,
        message: String,
        diagnostics: DiagnosticBag,
    },
    /// The program is structurally invalid.
    Bind(BindError),
    Options(OptionsError),
}

impl fmt::Display for MinifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinifyError::Parse {
                file,
                line,
                column,
                message,
                ..
            } => write!(f, "{file}:{line}:{column}: {message}"),
            MinifyError::Bind(error) => fmt::Display::fmt(error, f),
            MinifyError::Options(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl std::error::Error for MinifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MinifyError::Parse { .. } => None,
            MinifyError::Bind(error) => Some(error),
            MinifyError::Options(error) => Some(error),
        }
    }
}

impl From<BindError> for MinifyError {
    fn from(error: BindError) -> Self {
        MinifyError::Bind(error)
    }
}

impl From<OptionsError> for MinifyError {
    fn from(error: OptionsError) -> Self {
        MinifyError::Options(error)
    }
}

/// Minify one source file.
pub fn minify(file_name: &str, source: &str, options: &MinifyOptions) -> Result<MinifyOutput, MinifyError> {
    let _span = debug_span!("minify", file = %file_name).entered();
    options.validate()?;
    let line_map = LineMap::build(source);

    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    parser.set_module(options.module);
    let parsed = parser.parse();
    let first_error = parsed
        .diagnostics
        .diagnostics()
        .iter()
        .find(|d| d.is_error())
        .map(|d| (d.span.start, d.message.clone()));
    if let Some((start, message)) = first_error {
        let position = line_map.offset_to_position(start);
        return Err(MinifyError::Parse {
            file: file_name.to_string(),
            line: position.line + 1,
            column: position.column + 1,
            message,
            diagnostics: parsed.diagnostics,
        });
    }
    let mut arena = parsed.arena;
    let root = parsed.root;

    let mut diagnostics = DiagnosticBag::with_file(file_name);
    let mut rounds = 0;
    if options.compress.enabled {
        let compress_options = options.compress_options()?;
        let compressor = Compressor::new(file_name, &line_map, options.binder_options(), &compress_options);
        let output = compressor.compress(&mut arena, root)?;
        debug!(rounds = output.rounds, changes = output.changes, "compressed");
        rounds = output.rounds;
        diagnostics.extend(output.diagnostics);
    }

    let mut name_cache = None;
    if options.mangle.enabled {
        // Positions are stale after compression; rebind.
        let mut binder = BinderState::new(file_name, options.binder_options());
        binder.bind_source_file(&arena, root, &line_map)?;
        let mangle_options = options.mangle_options()?;
        let printed = Printer::print(&arena, root);
        let alphabet = char_frequency(&printed, &binder, &mangle_options).alphabet();
        let mut cache = options.cache.clone().unwrap_or_default();
        let renamed = mangle_names(&mut arena, &mut binder, &mangle_options, &alphabet, Some(&mut cache));
        debug!(renamed, alphabet = alphabet.as_str(), "mangled");
        if options.mangle.properties.enabled {
            let property_options = options.property_options()?;
            mangle_properties(&mut arena, root, &property_options, &alphabet, Some(&mut cache));
        }
        name_cache = Some(cache);
    } else if !options.compress.enabled {
        // Structural errors are reported even when nothing is rewritten.
        let mut binder = BinderState::new(file_name, options.binder_options());
        binder.bind_source_file(&arena, root, &line_map)?;
    }

    let code = Printer::print(&arena, root);
    debug!(input = source.len(), output = code.len(), "minified");
    Ok(MinifyOutput {
        code,
        diagnostics,
        name_cache,
        rounds,
    })
}
