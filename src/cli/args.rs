use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the jsz binary.
#[derive(Parser, Debug)]
#[command(
    name = "jsz",
    version,
    about = "JavaScript minifier: scope analysis, compression and name mangling"
)]
pub struct CliArgs {
    /// Input files. Reads stdin when empty or `-`.
    pub inputs: Vec<PathBuf>,

    /// Write the output here instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// JSON options file; command-line flags override it.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // ==================== Parsing ====================
    /// Parse inputs as ES modules.
    #[arg(long)]
    pub module: bool,

    /// Apply legacy catch-parameter scoping.
    #[arg(long = "compat", alias = "ie8")]
    pub compat: bool,

    // ==================== Compression ====================
    /// Skip the compressor.
    #[arg(long = "no-compress")]
    pub no_compress: bool,

    /// Compressor rounds.
    #[arg(long)]
    pub passes: Option<u32>,

    /// Drop and inline top-level bindings of scripts too.
    #[arg(long)]
    pub toplevel: bool,

    /// Top-level names (glob patterns) the compressor must keep.
    #[arg(long, value_delimiter = ',')]
    pub retain: Vec<String>,

    // ==================== Mangling ====================
    /// Skip name mangling.
    #[arg(long = "no-mangle")]
    pub no_mangle: bool,

    /// Names that are never generated nor renamed.
    #[arg(long, value_delimiter = ',')]
    pub reserved: Vec<String>,

    /// Keep the names of functions.
    #[arg(long = "keep-fnames")]
    pub keep_fnames: bool,

    /// Keep the names of classes.
    #[arg(long = "keep-classnames")]
    pub keep_classnames: bool,

    /// Rename property names too.
    #[arg(long = "mangle-props")]
    pub mangle_props: bool,

    /// Name cache file, read before and written after minifying.
    #[arg(long = "name-cache")]
    pub name_cache: Option<PathBuf>,

    // ==================== Output ====================
    /// Print compressor warnings to stderr.
    #[arg(long)]
    pub warnings: bool,

    /// Color diagnostics. Defaults to whether stderr is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,
}
