//! Built-in converters and the process-wide catalog

pub mod batch;
pub mod csr;
pub mod datetime;
pub mod encoding;
pub mod number;

use std::sync::OnceLock;

use tracing::error;

use crate::core::{Converter, Registry, RegistryError};

pub use csr::CsrConverter;
pub use datetime::DatetimeConverter;
pub use encoding::EncodingConverter;
pub use number::NumberConverter;

fn register_or_log<C: Converter + Default + 'static>(registry: &mut Registry) {
    if let Err(err) = registry.register::<C>() {
        log_registration_failure(std::any::type_name::<C>(), &err);
    }
}

fn log_registration_failure(type_name: &str, err: &RegistryError) {
    error!(converter = type_name, "Failed to register converter: {}", err);
}

/// A registry holding every built-in converter.
///
/// This is the single list both front ends see. Converters that fail to
/// register are logged and left out.
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    register_or_log::<DatetimeConverter>(&mut registry);
    register_or_log::<NumberConverter>(&mut registry);
    register_or_log::<EncodingConverter>(&mut registry);
    register_or_log::<CsrConverter>(&mut registry);
    registry
}

/// The process-wide registry, populated with the built-ins on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(builtin_registry)
}
