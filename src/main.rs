//! Uniconv: convert between data formats from the command line

use std::process::ExitCode;

use uniconv::cli::{self, GlobalArgs};
use uniconv::converters;
use uniconv::logging::{self, LogConfig};

fn main() -> ExitCode {
    let registry = converters::registry();
    let matches = cli::build_cli(registry).get_matches();

    let globals = match GlobalArgs::from_matches(&matches) {
        Ok(globals) => globals,
        Err(err) => err.exit(),
    };
    if let Err(err) = logging::init(&LogConfig::stderr(globals.verbose, globals.quiet)) {
        eprintln!("Warning: {:#}", err);
    }

    match cli::run(&matches, registry) {
        Ok(code) => code,
        Err(err) => cli::report_error(&err),
    }
}
