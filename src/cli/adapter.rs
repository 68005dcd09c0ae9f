//! Turns converter declarations into clap subcommands and parsed matches
//! back into [`Values`]

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};

use crate::core::arguments::RESERVED_NAMES;
use crate::core::{
    Argument, ArgumentType, Converter, DeclarationError, InterfaceBuilder, ValidationError, Value,
    Values,
};

/// Value meaning "read this text argument from stdin".
pub const STDIN_MARKER: &str = "-";

/// Build the subcommand for `converter`, one `--dashed-name` flag per argument.
pub fn subcommand(converter: &dyn Converter) -> Result<Command, DeclarationError> {
    let interface = InterfaceBuilder::declare(converter)?;

    let mut command = Command::new(converter.name().to_string()).about(converter.help().to_string());
    for argument in interface.all_arguments() {
        command = command.arg(clap_arg(argument));
    }

    for (index, group) in interface.groups.iter().enumerate() {
        let members: Vec<String> = group.arguments.iter().map(|arg| arg.name.clone()).collect();
        command = command.group(
            ArgGroup::new(format!("group-{}", index))
                .args(members)
                .multiple(!group.exclusive)
                .required(group.required),
        );
    }

    Ok(command)
}

fn clap_arg(argument: &Argument) -> Arg {
    let arg = Arg::new(argument.name.clone())
        .long(argument.flag_name())
        .help(argument.help.clone())
        .required(argument.required);

    match argument.kind {
        ArgumentType::Flag => arg.action(ArgAction::SetTrue),
        ArgumentType::String | ArgumentType::Text | ArgumentType::FileSave => {
            let mut arg = arg
                .action(ArgAction::Set)
                .value_name(argument.display_label().to_string());
            if argument.kind == ArgumentType::FileSave {
                arg = arg.value_parser(value_parser!(PathBuf));
            } else {
                // Negative numbers and `-` for stdin
                arg = arg.allow_hyphen_values(true);
            }
            if let Some(default) = &argument.default {
                arg = arg.default_value(default.clone());
            }
            arg
        }
    }
}

/// Flatten parsed matches into values, reading `-` text arguments from stdin.
pub fn collect_values(
    interface: &InterfaceBuilder,
    matches: &ArgMatches,
) -> Result<Values, ValidationError> {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    collect_values_from(interface, matches, &mut lock)
}

/// [`collect_values`] with an explicit source for `-` text arguments.
pub fn collect_values_from(
    interface: &InterfaceBuilder,
    matches: &ArgMatches,
    stdin: &mut dyn Read,
) -> Result<Values, ValidationError> {
    let mut values = Values::new();

    for argument in interface.all_arguments() {
        let name = argument.name.as_str();
        if RESERVED_NAMES.contains(&name) {
            continue;
        }

        let value = match argument.kind {
            ArgumentType::Flag => matches
                .try_get_one::<bool>(name)
                .map_err(|err| unreadable(name, err))?
                .filter(|set| **set)
                .map(|_| Value::Flag(true)),
            ArgumentType::FileSave => matches
                .try_get_one::<PathBuf>(name)
                .map_err(|err| unreadable(name, err))?
                .map(|path| Value::Path(path.clone())),
            ArgumentType::String | ArgumentType::Text => {
                match matches
                    .try_get_one::<String>(name)
                    .map_err(|err| unreadable(name, err))?
                {
                    Some(text) if argument.kind == ArgumentType::Text && text == STDIN_MARKER => {
                        Some(Value::Text(read_stdin(name, stdin)?))
                    }
                    Some(text) => Some(Value::Text(text.clone())),
                    None => None,
                }
            }
        };

        if let Some(value) = value {
            values.insert(name, value);
        }
    }

    Ok(values)
}

fn unreadable(name: &str, err: clap::parser::MatchesError) -> ValidationError {
    ValidationError::new(format!("Could not read argument '{}': {}", name, err))
}

fn read_stdin(name: &str, stdin: &mut dyn Read) -> Result<String, ValidationError> {
    let mut text = String::new();
    stdin.read_to_string(&mut text).map_err(|err| {
        ValidationError::new(format!("Failed to read '{}' from stdin: {}", name, err))
    })?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{CsrConverter, NumberConverter};
    use clap::error::ErrorKind;
    use std::io::Cursor;

    fn parse(converter: &dyn Converter, args: &[&str]) -> Result<ArgMatches, clap::Error> {
        subcommand(converter)
            .unwrap()
            .try_get_matches_from(std::iter::once(converter.name()).chain(args.iter().copied()))
    }

    fn collect(converter: &dyn Converter, matches: &ArgMatches, stdin: &str) -> Values {
        let interface = InterfaceBuilder::declare(converter).unwrap();
        collect_values_from(&interface, matches, &mut Cursor::new(stdin.to_string())).unwrap()
    }

    #[test]
    fn test_subcommand_is_well_formed() {
        subcommand(&NumberConverter).unwrap().debug_assert();
        subcommand(&CsrConverter).unwrap().debug_assert();
    }

    #[test]
    fn test_flags_are_dashed() {
        let command = subcommand(&NumberConverter).unwrap();
        let longs: Vec<&str> = command.get_arguments().filter_map(|arg| arg.get_long()).collect();
        assert_eq!(
            longs,
            vec!["hex2dec", "dec2hex", "batch-hex2dec", "batch-dec2hex", "export"]
        );
    }

    #[test]
    fn test_collects_only_supplied_values() {
        let matches = parse(&NumberConverter, &["--hex2dec", "0xA"]).unwrap();
        let values = collect(&NumberConverter, &matches, "");
        assert_eq!(values, Values::new().with_text("hex2dec", "0xA"));
    }

    #[test]
    fn test_exclusive_group_conflict_is_usage_error() {
        let err = parse(&NumberConverter, &["--hex2dec", "0xA", "--dec2hex", "10"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_required_group_missing_is_usage_error() {
        let err = parse(&NumberConverter, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_flag_and_plain_group() {
        let matches = parse(&CsrConverter, &["--generate-csr", "--cn", "example.com"]).unwrap();
        let values = collect(&CsrConverter, &matches, "");
        assert!(values.flag("generate_csr"));
        assert_eq!(values.text("cn"), Some("example.com"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_file_save_becomes_path() {
        let matches = parse(
            &NumberConverter,
            &["--batch-dec2hex", "1\n2", "--export", "out.csv"],
        )
        .unwrap();
        let values = collect(&NumberConverter, &matches, "");
        assert_eq!(values.path("export"), Some(std::path::Path::new("out.csv")));
    }

    #[test]
    fn test_text_dash_reads_stdin() {
        let matches = parse(&NumberConverter, &["--batch-hex2dec", "-"]).unwrap();
        let values = collect(&NumberConverter, &matches, "0xA\nff\n");
        assert_eq!(values.text("batch_hex2dec"), Some("0xA\nff\n"));
    }

    #[test]
    fn test_negative_number_is_a_value() {
        let matches = parse(&NumberConverter, &["--dec2hex", "-255"]).unwrap();
        let values = collect(&NumberConverter, &matches, "");
        assert_eq!(values.text("dec2hex"), Some("-255"));
    }

    #[test]
    fn test_string_dash_is_kept_literally() {
        let matches = parse(&NumberConverter, &["--dec2hex", "-"]).unwrap();
        let values = collect(&NumberConverter, &matches, "ignored");
        assert_eq!(values.text("dec2hex"), Some("-"));
    }
}
