//! Uniconv: pluggable data-format converters
//!
//! Each converter declares its inputs once through an
//! [`InterfaceBuilder`](core::InterfaceBuilder); the CLI and the terminal form
//! are both generated from that declaration.

pub mod cli;
pub mod converters;
pub mod core;
pub mod form;
pub mod logging;
pub mod utils;
