//! Converter framework: argument model, contract, registry

pub mod arguments;
pub mod converter;
pub mod error;
pub mod registry;
pub mod values;

pub use arguments::{Argument, ArgumentGroup, ArgumentType, InterfaceBuilder};
pub use converter::{execute, BatchRow, Converter, Output};
pub use error::{ConversionError, ConverterError, DeclarationError, RegistryError, ValidationError};
pub use registry::{ConverterEntry, Registry};
pub use values::{Value, Values};
