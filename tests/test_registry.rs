//! Tests for registering converters beyond the built-ins

use uniconv::cli::{build_cli, collect_values};
use uniconv::core::{
    execute, Argument, ArgumentType, Converter, ConverterError, InterfaceBuilder, Output,
    Registry, RegistryError, ValidationError, Values,
};
use uniconv::form::Form;

/// Reverses text, optionally uppercasing it.
#[derive(Default)]
struct ReverseConverter;

impl Converter for ReverseConverter {
    fn name(&self) -> &str {
        "reverse"
    }

    fn help(&self) -> &str {
        "Reverse a string"
    }

    fn configure_args(&self, builder: &mut InterfaceBuilder) {
        builder.add_argument(
            Argument::new("text", "Text to reverse")
                .label("TEXT")
                .required(true),
        );
        builder.add_argument(Argument::new("upper", "Uppercase the result").kind(ArgumentType::Flag));
    }

    fn convert(&self, values: &Values) -> Result<Output, ConverterError> {
        let text = values
            .text("text")
            .ok_or_else(|| ValidationError::new("--text is required"))?;
        let mut reversed: String = text.chars().rev().collect();
        if values.flag("upper") {
            reversed = reversed.to_uppercase();
        }
        Ok(Output::line(reversed))
    }
}

/// Claims the name `reverse` but is a different type.
#[derive(Default)]
struct Impostor;

impl Converter for Impostor {
    fn name(&self) -> &str {
        "reverse"
    }

    fn help(&self) -> &str {
        "Not the real one"
    }

    fn configure_args(&self, _builder: &mut InterfaceBuilder) {}

    fn convert(&self, _values: &Values) -> Result<Output, ConverterError> {
        Ok(Output::new())
    }
}

#[test]
fn test_reregistering_same_type_is_idempotent() {
    let mut registry = Registry::new();
    registry.register::<ReverseConverter>().unwrap();
    registry.register::<ReverseConverter>().unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["reverse"]);
}

#[test]
fn test_other_type_under_taken_name_is_rejected() {
    let mut registry = Registry::new();
    registry.register::<ReverseConverter>().unwrap();
    let err = registry.register::<Impostor>().unwrap_err();
    assert!(matches!(err, RegistryError::Duplicate { .. }));
    assert_eq!(registry.get("reverse").unwrap().help(), "Reverse a string");
}

#[test]
fn test_custom_converter_gets_a_cli() {
    let mut registry = Registry::new();
    registry.register::<ReverseConverter>().unwrap();

    let matches = build_cli(&registry)
        .try_get_matches_from(["uniconv", "reverse", "--text", "hello", "--upper"])
        .unwrap();
    let (name, sub_matches) = matches.subcommand().unwrap();
    let converter = registry.get(name).unwrap();
    let interface = InterfaceBuilder::declare(converter.as_ref()).unwrap();
    let values = collect_values(&interface, sub_matches).unwrap();

    let output = execute(converter.as_ref(), &values).unwrap();
    assert_eq!(output.to_string(), "OLLEH");
}

#[test]
fn test_custom_converter_gets_a_form() {
    let mut form = Form::new(&ReverseConverter).unwrap();
    form.set_text("text", "abc");
    let output = execute(&ReverseConverter, &form.collect()).unwrap();
    assert_eq!(output.to_string(), "cba");
}

#[test]
fn test_missing_required_argument_is_rejected_before_convert() {
    let err = execute(&ReverseConverter, &Values::new().with_flag("upper")).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Missing required argument --text");
}

#[test]
fn test_unknown_argument_is_rejected() {
    let values = Values::new().with_text("text", "a").with_text("bogus", "b");
    let err = execute(&ReverseConverter, &values).unwrap_err();
    assert_eq!(err.to_string(), "Unknown argument 'bogus'");
}
