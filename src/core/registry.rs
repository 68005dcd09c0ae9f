//! Catalog of available converters

use std::any::TypeId;

use tracing::debug;

use super::arguments::InterfaceBuilder;
use super::converter::Converter;
use super::error::RegistryError;

/// Constructs a fresh converter instance.
pub type ConverterFactory = fn() -> Box<dyn Converter>;

/// A registered converter: its name and how to make one.
#[derive(Debug, Clone)]
pub struct ConverterEntry {
    name: String,
    type_id: TypeId,
    factory: ConverterFactory,
}

impl ConverterEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instantiate(&self) -> Box<dyn Converter> {
        (self.factory)()
    }
}

/// Name → converter type mapping, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<ConverterEntry>,
}

fn construct<C: Converter + Default + 'static>() -> Box<dyn Converter> {
    Box::new(C::default())
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register converter type `C` under the name it reports.
    ///
    /// The type is instantiated once to read its name and check its interface
    /// declaration; only the type is kept. Registering the same type twice
    /// replaces the entry. A different type claiming a taken name is an error.
    pub fn register<C: Converter + Default + 'static>(&mut self) -> Result<(), RegistryError> {
        let candidate = C::default();
        let name = candidate.name().to_string();
        if !is_converter_name(&name) {
            return Err(RegistryError::InvalidName(name));
        }
        InterfaceBuilder::declare(&candidate).map_err(|source| RegistryError::Declaration {
            name: name.clone(),
            source,
        })?;

        let entry = ConverterEntry {
            name,
            type_id: TypeId::of::<C>(),
            factory: construct::<C>,
        };

        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) if existing.type_id == entry.type_id => {
                debug!(converter = %entry.name, "Re-registered converter");
                *existing = entry;
            }
            Some(_) => return Err(RegistryError::Duplicate { name: entry.name }),
            None => {
                debug!(converter = %entry.name, "Registered converter");
                self.entries.push(entry);
            }
        }

        Ok(())
    }

    /// A fresh instance of the converter registered as `name`.
    pub fn get(&self, name: &str) -> Option<Box<dyn Converter>> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(ConverterEntry::instantiate)
    }

    /// The whole catalog, for enumeration by the front ends.
    pub fn lookup_all(&self) -> &[ConverterEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(ConverterEntry::name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `[a-z][a-z0-9_-]*`
fn is_converter_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => chars
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::arguments::Argument;
    use crate::core::converter::Output;
    use crate::core::error::ConverterError;
    use crate::core::values::Values;

    macro_rules! mock_converter {
        ($ty:ident, $name:expr) => {
            #[derive(Default)]
            struct $ty;

            impl Converter for $ty {
                fn name(&self) -> &str {
                    $name
                }

                fn help(&self) -> &str {
                    "mock help"
                }

                fn configure_args(&self, builder: &mut InterfaceBuilder) {
                    builder.add_argument(Argument::new("input", "Input"));
                }

                fn convert(&self, _values: &Values) -> Result<Output, ConverterError> {
                    Ok(Output::line(stringify!($ty)))
                }
            }
        };
    }

    mock_converter!(Mock, "mock");
    mock_converter!(OtherMock, "mock");
    mock_converter!(Second, "second");
    mock_converter!(Shouty, "Shouty");

    #[derive(Default)]
    struct Broken;

    impl Converter for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn help(&self) -> &str {
            "declares the same argument twice"
        }

        fn configure_args(&self, builder: &mut InterfaceBuilder) {
            builder.add_argument(Argument::new("input", "Input"));
            builder.add_argument(Argument::new("input", "Input again"));
        }

        fn convert(&self, _values: &Values) -> Result<Output, ConverterError> {
            Ok(Output::new())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        registry.register::<Mock>().unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["mock"]);

        let converter = registry.get("mock").expect("mock should be registered");
        assert_eq!(converter.help(), "mock help");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_reregistering_same_type_is_idempotent() {
        let mut registry = Registry::new();
        registry.register::<Mock>().unwrap();
        registry.register::<Mock>().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_type_with_same_name_is_rejected() {
        let mut registry = Registry::new();
        registry.register::<Mock>().unwrap();
        let err = registry.register::<OtherMock>().unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { ref name } if name == "mock"));

        // The original registration survives
        let output = registry.get("mock").unwrap().convert(&Values::new()).unwrap();
        assert_eq!(output.to_string(), "Mock");
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = Registry::new();
        registry.register::<Second>().unwrap();
        registry.register::<Mock>().unwrap();
        let names: Vec<&str> = registry.lookup_all().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["second", "mock"]);
    }

    #[test]
    fn test_invalid_name_and_declaration_are_rejected() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.register::<Shouty>(),
            Err(RegistryError::InvalidName(_))
        ));
        assert!(matches!(
            registry.register::<Broken>(),
            Err(RegistryError::Declaration { .. })
        ));
        assert!(registry.is_empty());
    }
}
