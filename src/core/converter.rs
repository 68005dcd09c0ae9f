//! The converter contract and its structured result

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::arguments::InterfaceBuilder;
use super::error::{ConversionError, ConverterError};
use super::values::Values;

/// A self-describing converter.
///
/// Implementations must be cheap to construct: the registry instantiates
/// them transiently to read their name and the front ends build one per
/// invocation.
pub trait Converter: Send + Sync {
    /// Lowercase token used as CLI subcommand and registry key.
    fn name(&self) -> &str;

    /// One-line human summary.
    fn help(&self) -> &str;

    /// Push this converter's argument declarations onto `builder`.
    ///
    /// Must be idempotent and must not perform I/O.
    fn configure_args(&self, builder: &mut InterfaceBuilder);

    /// Run the conversion on already validated values.
    fn convert(&self, values: &Values) -> Result<Output, ConverterError>;
}

/// One line of a batch conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    pub input: String,
    /// Converted value, or the error message for this line
    pub output: Result<String, String>,
}

impl BatchRow {
    /// Text shown for this row: the value or an `Error:` marker.
    pub fn rendered(&self) -> String {
        match &self.output {
            Ok(value) => value.clone(),
            Err(message) => format!("Error: {}", message),
        }
    }
}

/// What a converter produced. Front ends decide where it goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Output {
    /// One entry per logical result, in order
    pub lines: Vec<String>,
    /// Per-line results of a batch conversion
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<BatchRow>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output made of a single line.
    pub fn line(line: impl Into<String>) -> Self {
        let mut output = Self::new();
        output.push(line);
        output
    }

    pub fn push(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Output for a batch: one line per row, error markers included.
    pub fn from_rows(rows: Vec<BatchRow>) -> Self {
        Self {
            lines: rows.iter().map(BatchRow::rendered).collect(),
            rows,
        }
    }

    pub fn failed_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.output.is_err()).count()
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// Validate `values` against the converter's declaration, then convert.
///
/// Both front ends go through here so converter logic only ever sees values
/// that match what was declared.
pub fn execute(converter: &dyn Converter, values: &Values) -> Result<Output, ConverterError> {
    let interface = InterfaceBuilder::declare(converter).map_err(|err| {
        ConversionError::with_source(
            format!("Converter '{}' has an invalid interface", converter.name()),
            err,
        )
    })?;
    interface.validate(values)?;

    debug!(converter = converter.name(), arguments = values.len(), "Running conversion");
    converter.convert(values)
}
