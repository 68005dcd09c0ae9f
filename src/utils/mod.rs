//! Terminal helpers for the CLI: spinners and styled messages

pub mod progress;
pub mod styling;

pub use progress::{create_spinner, finish_with_success, finish_with_warning};
pub use styling::{converter_table, print_converter_list};
