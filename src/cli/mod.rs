//! CLI front end - converter subcommands generated from their declarations

pub mod adapter;
pub mod args;

use std::process::ExitCode;

use tracing::error;

use crate::core::ConverterError;

pub use adapter::{collect_values, subcommand};
pub use args::{build_cli, run, GlobalArgs};

/// Log a failed run and pick the exit code for it.
pub fn report_error(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ConverterError>() {
        Some(converter_error) => error!("{}", converter_error),
        None => error!("An unexpected error occurred: {:?}", err),
    }
    ExitCode::FAILURE
}
