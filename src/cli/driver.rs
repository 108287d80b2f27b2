use anyhow::{Context, Result};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

use crate::cli::args::CliArgs;
use crate::cli::reporter::Reporter;
use crate::minify::{MinifyError, minify};
use crate::options::{MinifyOptions, NameFilter};
use jsz_mangler::NameCache;

/// What a run produced. Diagnostics are already rendered.
#[derive(Debug, Default)]
pub struct DriverResult {
    pub output: String,
    pub messages: Vec<String>,
    pub has_errors: bool,
}

/// Merge the options file (if any) with command-line flags.
pub fn resolve_options(args: &CliArgs) -> Result<MinifyOptions> {
    let mut options = match &args.config {
        Some(path) => MinifyOptions::from_file(path)?,
        None => MinifyOptions::default(),
    };
    options.module |= args.module;
    options.compatibility_mode |= args.compat;
    if args.no_compress {
        options.compress.enabled = false;
    }
    if let Some(passes) = args.passes {
        options.compress.passes = passes;
    }
    if args.toplevel {
        options.compress.toplevel = true;
        options.mangle_top_level = true;
    }
    options.retain.extend(args.retain.iter().cloned());
    if args.no_mangle {
        options.mangle.enabled = false;
    }
    options.reserved_names.extend(args.reserved.iter().cloned());
    if args.keep_fnames {
        options.keep_function_names = NameFilter::All(true);
    }
    if args.keep_classnames {
        options.keep_class_names = NameFilter::All(true);
    }
    if args.mangle_props {
        options.mangle.properties.enabled = true;
    }
    if let Some(path) = &args.name_cache {
        options.cache = Some(read_name_cache(path)?);
    }
    options.validate()?;
    Ok(options)
}

/// A missing cache file starts an empty cache.
fn read_name_cache(path: &Path) -> Result<NameCache> {
    if !path.exists() {
        return Ok(NameCache::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read name cache {}", path.display()))?;
    NameCache::from_json(&text).with_context(|| format!("in {}", path.display()))
}

/// Minify every input in order, threading the name cache through them.
pub fn run(args: &CliArgs) -> Result<DriverResult> {
    let _span = info_span!("run", inputs = args.inputs.len()).entered();
    let mut options = resolve_options(args)?;
    let color = args
        .pretty
        .unwrap_or_else(|| std::io::stderr().is_terminal());
    let mut reporter = Reporter::new(color);
    let mut result = DriverResult::default();

    let inputs = if args.inputs.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.inputs.clone()
    };
    let mut outputs = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let (file_name, source) = read_input(input)?;
        reporter.add_source(&file_name, &source);
        match minify(&file_name, &source, &options) {
            Ok(minified) => {
                debug!(file = %file_name, bytes = minified.code.len(), "minified input");
                if args.warnings {
                    result
                        .messages
                        .extend(minified.diagnostics.iter().map(|d| reporter.format_diagnostic(d)));
                }
                if minified.name_cache.is_some() {
                    options.cache = minified.name_cache;
                }
                outputs.push(minified.code);
            }
            Err(error) => {
                result.has_errors = true;
                result.messages.push(match &error {
                    MinifyError::Parse { diagnostics, .. } => reporter.render(diagnostics.diagnostics()),
                    MinifyError::Bind(error) => reporter.format_diagnostic(&error.to_diagnostic()),
                    MinifyError::Options(_) => reporter.format_error(&error.to_string()),
                });
                return Ok(result);
            }
        }
    }
    result.output = outputs.join("\n");

    if let Some(path) = &args.output {
        std::fs::write(path, &result.output)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let (Some(path), Some(cache)) = (&args.name_cache, &options.cache) {
        std::fs::write(path, cache.to_json()?)
            .with_context(|| format!("failed to write name cache {}", path.display()))?;
    }
    Ok(result)
}

fn read_input(path: &Path) -> Result<(String, String)> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(("<stdin>".to_string(), source));
    }
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok((path.display().to_string(), source))
}
