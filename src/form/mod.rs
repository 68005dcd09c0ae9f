//! Terminal form front end
//!
//! Every registered converter gets a tab whose inputs are generated from its
//! interface declaration. Results are shown in the tab, never printed.

pub mod app;
pub mod model;
pub mod picker;
pub mod render;

pub use app::{run, setup_terminal, teardown_terminal, App, ResultPane};
pub use model::{Field, FieldKind, Focus, Form, FormAction, Section};
pub use picker::{FilePicker, PickerAction};
