//! Uniconv form: a terminal UI over every registered converter

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};

use uniconv::converters;
use uniconv::form::{self, App};
use uniconv::logging::{self, LogConfig, LogTarget};

/// Interactive forms for the uniconv converters
#[derive(Parser, Debug)]
#[command(name = "uniconv-form")]
#[command(author, version, about, long_about = None)]
struct FormArgs {
    /// Converter tab to open first
    #[arg(long)]
    tab: Option<String>,

    /// Write logs to this file. Without it nothing is logged,
    /// since the terminal belongs to the UI.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = FormArgs::parse();

    let target = match &args.log_file {
        Some(path) => LogTarget::File(path.clone()),
        None => LogTarget::Off,
    };
    logging::init(&LogConfig {
        verbosity: args.verbose,
        quiet: false,
        target,
    })?;

    let mut app = App::new(converters::registry())?;
    if let Some(name) = &args.tab {
        if !app.select_tab(name) {
            let available: Vec<&str> = converters::registry().names().collect();
            bail!(
                "Unknown converter '{}'. Available: {}",
                name,
                available.join(", ")
            );
        }
    }

    form::run(&mut app)
}
