//! Error taxonomy shared by every converter

use std::error::Error as StdError;

use thiserror::Error;

/// Malformed or missing input. Always user-correctable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Well-formed input that could not be transformed.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a lower-level failure, keeping it reachable through `source()`.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The common kind front ends catch.
#[derive(Debug, Error)]
pub enum ConverterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl ConverterError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ConverterError::Validation(_))
    }
}

/// A converter declared an interface that breaks the argument model invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("'{0}' is not a valid argument name")]
    InvalidName(String),

    #[error("argument '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("argument name '{0}' is reserved")]
    ReservedName(String),

    #[error("exclusive group #{0} has no members")]
    EmptyExclusiveGroup(usize),

    #[error("flag argument '{0}' cannot carry a default value")]
    FlagWithDefault(String),
}

/// Registration failures. Logged and skipped when building the built-in catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("'{0}' is not a valid converter name")]
    InvalidName(String),

    #[error("converter name '{name}' is already taken by a different converter")]
    Duplicate { name: String },

    #[error("converter '{name}' declares an invalid interface: {source}")]
    Declaration {
        name: String,
        #[source]
        source: DeclarationError,
    },
}
