#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::Write;

use jsz::cli::args::CliArgs;
use jsz::cli::driver;

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERRORS: i32 = 1;

fn main() -> Result<()> {
    // JSZ_LOG / JSZ_LOG_FORMAT, see src/tracing_config.rs.
    jsz::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let result = driver::run(&args)?;

    for message in &result.messages {
        eprintln!("{message}");
    }
    if result.has_errors {
        std::process::exit(EXIT_ERRORS);
    }
    if args.output.is_none() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(result.output.as_bytes())?;
        stdout.write_all(b"\n")?;
    }
    std::process::exit(EXIT_SUCCESS);
}
