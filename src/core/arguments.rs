//! Argument model and the front-end agnostic interface builder
//!
//! A converter describes its inputs once, by pushing [`Argument`]s and
//! [`ArgumentGroup`]s onto an [`InterfaceBuilder`]. The CLI adapter turns the
//! result into clap flags, the form adapter into terminal widgets. Order is
//! preserved everywhere and determines display order in both front ends.

use std::collections::HashSet;

use serde::Serialize;

use super::converter::Converter;
use super::error::{DeclarationError, ValidationError};
use super::values::Values;

/// Names the front ends reserve for their own bookkeeping.
pub const RESERVED_NAMES: [&str; 3] = ["command", "converter", "help"];

/// The shape of input an argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentType {
    /// Single-line string
    String,
    /// Multiline text, one item per line in batch converters
    Text,
    /// Boolean switch
    Flag,
    /// Path of a file the converter will write
    FileSave,
}

/// One declared input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub help: String,
    pub label: Option<String>,
    pub required: bool,
    pub kind: ArgumentType,
    pub default: Option<String>,
}

impl Argument {
    /// A new optional short-string argument.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            label: None,
            required: false,
            kind: ArgumentType::String,
            default: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn kind(mut self, kind: ArgumentType) -> Self {
        self.kind = kind;
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// `--dashed-form` of the name as used on the command line.
    pub fn flag_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// Label shown next to the input, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// An ordered set of arguments sharing exclusivity rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArgumentGroup {
    /// At most one member may be supplied (exactly one when `required`)
    pub exclusive: bool,
    pub required: bool,
    pub arguments: Vec<Argument>,
}

impl ArgumentGroup {
    pub fn new(exclusive: bool, required: bool) -> Self {
        Self {
            exclusive,
            required,
            arguments: Vec::new(),
        }
    }

    pub fn add_argument(&mut self, argument: Argument) -> &mut Self {
        self.arguments.push(argument);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arguments.iter().any(|arg| arg.name == name)
    }

    /// Names of the members present in `values`, in declaration order.
    pub fn supplied<'a>(&'a self, values: &Values) -> Vec<&'a str> {
        self.arguments
            .iter()
            .filter(|arg| values.contains(&arg.name))
            .map(|arg| arg.name.as_str())
            .collect()
    }

    fn dashed_names(&self) -> String {
        self.arguments
            .iter()
            .map(|arg| format!("--{}", arg.flag_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collects a converter's argument declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceBuilder {
    pub groups: Vec<ArgumentGroup>,
    pub arguments: Vec<Argument>,
}

impl InterfaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh declaration for `converter` and check its invariants.
    pub fn declare(converter: &dyn Converter) -> Result<Self, DeclarationError> {
        let mut builder = Self::new();
        converter.configure_args(&mut builder);
        builder.check()?;
        Ok(builder)
    }

    /// Add a top-level argument.
    pub fn add_argument(&mut self, argument: Argument) -> &mut Self {
        self.arguments.push(argument);
        self
    }

    /// Append a new group and hand back a handle for adding its members.
    pub fn add_group(&mut self, exclusive: bool, required: bool) -> &mut ArgumentGroup {
        self.groups.push(ArgumentGroup::new(exclusive, required));
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    /// Group members first (in group order), then top-level arguments.
    pub fn all_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.groups
            .iter()
            .flat_map(|group| group.arguments.iter())
            .chain(self.arguments.iter())
    }

    pub fn find(&self, name: &str) -> Option<&Argument> {
        self.all_arguments().find(|arg| arg.name == name)
    }

    /// Check the declaration invariants: identifier names, unique across the
    /// whole surface, no reserved names, no empty exclusive groups.
    pub fn check(&self) -> Result<(), DeclarationError> {
        let mut seen = HashSet::new();
        for argument in self.all_arguments() {
            if !is_identifier(&argument.name) {
                return Err(DeclarationError::InvalidName(argument.name.clone()));
            }
            if RESERVED_NAMES.contains(&argument.name.as_str()) {
                return Err(DeclarationError::ReservedName(argument.name.clone()));
            }
            if !seen.insert(argument.name.as_str()) {
                return Err(DeclarationError::DuplicateName(argument.name.clone()));
            }
            if argument.kind == ArgumentType::Flag && argument.default.is_some() {
                return Err(DeclarationError::FlagWithDefault(argument.name.clone()));
            }
        }

        for (index, group) in self.groups.iter().enumerate() {
            if group.exclusive && group.arguments.is_empty() {
                return Err(DeclarationError::EmptyExclusiveGroup(index));
            }
        }

        Ok(())
    }

    /// Validate collected values against this declaration before they reach
    /// converter logic.
    pub fn validate(&self, values: &Values) -> Result<(), ValidationError> {
        for (name, value) in values.iter() {
            let argument = self
                .find(name)
                .ok_or_else(|| ValidationError::new(format!("Unknown argument '{}'", name)))?;
            if !value.fits(argument.kind) {
                return Err(ValidationError::new(format!(
                    "Argument '{}' expects {:?} input, got a {} value",
                    name,
                    argument.kind,
                    value.kind_name()
                )));
            }
        }

        for group in &self.groups {
            let supplied = group.supplied(values);
            if group.exclusive {
                if supplied.len() > 1 {
                    return Err(ValidationError::new(format!(
                        "Only one of {} may be given (got {})",
                        group.dashed_names(),
                        supplied.join(", ")
                    )));
                }
                if group.required && supplied.is_empty() {
                    return Err(ValidationError::new(format!(
                        "One of {} is required",
                        group.dashed_names()
                    )));
                }
            } else if group.required && supplied.is_empty() {
                return Err(ValidationError::new(format!(
                    "At least one of {} is required",
                    group.dashed_names()
                )));
            }
        }

        for argument in self.all_arguments().filter(|arg| arg.required) {
            if !values.contains(&argument.name) {
                return Err(ValidationError::new(format!(
                    "Missing required argument --{}",
                    argument.flag_name()
                )));
            }
        }

        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
