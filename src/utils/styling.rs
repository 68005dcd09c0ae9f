//! Styled terminal output for the CLI

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::core::{InterfaceBuilder, Registry};

/// Table of every registered converter with its flags, for `--list`.
pub fn converter_table(registry: &Registry) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Converter").add_attribute(Attribute::Bold),
        Cell::new("Description").add_attribute(Attribute::Bold),
        Cell::new("Arguments").add_attribute(Attribute::Bold),
    ]);

    for entry in registry.lookup_all() {
        let converter = entry.instantiate();
        let arguments = match InterfaceBuilder::declare(converter.as_ref()) {
            Ok(interface) => interface
                .all_arguments()
                .map(|arg| format!("--{}", arg.flag_name()))
                .collect::<Vec<_>>()
                .join(" "),
            Err(err) => format!("invalid interface: {}", err),
        };

        table.add_row(vec![
            Cell::new(entry.name()).fg(Color::Cyan),
            Cell::new(converter.help()),
            Cell::new(arguments),
        ]);
    }

    table
}

/// Print the `--list` view: a heading and the converter table.
pub fn print_converter_list(registry: &Registry) {
    println!(
        "{} {}",
        style("Available converters").cyan().bold(),
        style(format!("({})", registry.len())).dim()
    );
    println!("{}", converter_table(registry));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::builtin_registry;

    #[test]
    fn test_converter_table_lists_every_converter() {
        let rendered = converter_table(&builtin_registry()).to_string();
        for name in ["datetime", "number", "encoding", "csr"] {
            assert!(rendered.contains(name), "missing {} in\n{}", name, rendered);
        }
        assert!(rendered.contains("--hex2dec"));
    }
}
