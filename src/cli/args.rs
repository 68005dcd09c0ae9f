//! Global options, the dynamic command tree and subcommand dispatch

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, ArgMatches, Args, Command, FromArgMatches};
use tracing::{error, info};

use super::adapter;
use crate::core::{execute, ConverterError, InterfaceBuilder, Output, Registry};
use crate::utils::{create_spinner, finish_with_success, finish_with_warning, print_converter_list};

/// Options that apply to every converter. They go before the converter name.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// The UNICONV_LOG environment variable takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the result as JSON instead of plain lines
    #[arg(long)]
    pub json: bool,

    /// List the available converters and exit
    #[arg(long)]
    pub list: bool,
}

impl GlobalArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        Self::from_arg_matches(matches)
    }
}

/// The `uniconv` command: global options plus one subcommand per converter,
/// in registration order.
pub fn build_cli(registry: &Registry) -> Command {
    let mut command = GlobalArgs::augment_args(
        Command::new("uniconv")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Convert between data formats: timestamps, numbers, base64, CSRs")
            .after_help("Text arguments given as '-' are read from stdin."),
    );

    for entry in registry.lookup_all() {
        let converter = entry.instantiate();
        match adapter::subcommand(converter.as_ref()) {
            Ok(subcommand) => command = command.subcommand(subcommand),
            Err(err) => error!(
                converter = entry.name(),
                "Skipping converter with invalid interface: {}", err
            ),
        }
    }

    command
}

/// Dispatch the selected converter and print its output.
///
/// Converter failures come back as a [`ConverterError`] inside the
/// `anyhow::Error` so the caller can tell them apart from anything unexpected.
pub fn run(matches: &ArgMatches, registry: &Registry) -> Result<ExitCode> {
    let globals = GlobalArgs::from_matches(matches)?;

    if globals.list {
        print_converter_list(registry);
        return Ok(ExitCode::SUCCESS);
    }

    let Some((name, sub_matches)) = matches.subcommand() else {
        eprintln!("{}", build_cli(registry).render_help());
        return Ok(ExitCode::FAILURE);
    };

    let converter = registry
        .get(name)
        .with_context(|| format!("No converter registered under '{}'", name))?;
    let interface = InterfaceBuilder::declare(converter.as_ref())
        .with_context(|| format!("Converter '{}' has an invalid interface", name))?;
    let values = adapter::collect_values(&interface, sub_matches).map_err(ConverterError::from)?;

    info!(converter = name, "Converting");
    let spinner = create_spinner(&format!("Running {}...", name));
    let result = execute(converter.as_ref(), &values);
    match &result {
        Ok(output) if !output.rows.is_empty() => finish_batch_spinner(&spinner, output),
        _ => spinner.finish_and_clear(),
    }
    let output = result?;

    print_output(&output, globals.json)?;
    Ok(ExitCode::SUCCESS)
}

fn finish_batch_spinner(spinner: &indicatif::ProgressBar, output: &Output) {
    let total = output.rows.len();
    let failed = output.failed_rows();
    if failed == 0 {
        finish_with_success(spinner, &format!("{} line(s) converted", total));
    } else {
        finish_with_warning(spinner, &format!("{} of {} line(s) failed", failed, total));
    }
}

fn print_output(output: &Output, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(output).context("Failed to serialize output as JSON")?;
        println!("{}", rendered);
    } else if !output.lines.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::builtin_registry;

    fn parse(args: &[&str]) -> ArgMatches {
        build_cli(&builtin_registry())
            .try_get_matches_from(args)
            .unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        build_cli(&builtin_registry()).debug_assert();
    }

    #[test]
    fn test_subcommands_follow_registration_order() {
        let command = build_cli(&builtin_registry());
        let names: Vec<&str> = command.get_subcommands().map(|sub| sub.get_name()).collect();
        assert_eq!(names, vec!["datetime", "number", "encoding", "csr"]);
    }

    #[test]
    fn test_global_args_before_subcommand() {
        let matches = parse(&["uniconv", "-vv", "--json", "number", "--hex2dec", "0xA"]);
        let globals = GlobalArgs::from_matches(&matches).unwrap();
        assert_eq!(globals.verbose, 2);
        assert!(globals.json);
        assert!(!globals.list);
        assert_eq!(matches.subcommand_name(), Some("number"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = build_cli(&builtin_registry()).try_get_matches_from(["uniconv", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_needs_no_subcommand() {
        let matches = parse(&["uniconv", "--list"]);
        assert!(GlobalArgs::from_matches(&matches).unwrap().list);
        assert!(matches.subcommand().is_none());
    }

    #[test]
    fn test_run_converter_error_is_downcastable() {
        let registry = builtin_registry();
        let matches = parse(&["uniconv", "number", "--hex2dec", "ZZZ"]);
        let err = run(&matches, &registry).unwrap_err();
        let converter_error = err.downcast_ref::<ConverterError>().unwrap();
        assert!(converter_error.is_validation());
    }
}
