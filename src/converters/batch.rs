//! Line-by-line batch conversion and spreadsheet export
//!
//! Batch modes take multiline text, convert every non-blank line on its own
//! and keep going past bad lines. Rows can be exported as a two-column
//! (`Input`, `Output`) spreadsheet, CSV or Parquet by file extension.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::core::{BatchRow, ConversionError, ConverterError, Output, ValidationError, Values};

/// Name of the export argument shared by the batch converters.
pub const EXPORT_ARG: &str = "export";

/// Spreadsheet formats batch results can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

impl ExportFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "parquet" => Ok(ExportFormat::Parquet),
            _ => Err(ValidationError::new(format!(
                "Unsupported export format '{}'. Supported formats: csv, parquet",
                path.display()
            ))),
        }
    }
}

/// A checked export destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub path: PathBuf,
    pub format: ExportFormat,
}

impl ExportTarget {
    /// Read the optional export argument, rejecting unsupported formats
    /// before any conversion work happens.
    pub fn from_values(values: &Values) -> Result<Option<Self>, ValidationError> {
        values
            .path(EXPORT_ARG)
            .map(|path| {
                Ok(ExportTarget {
                    path: path.to_path_buf(),
                    format: ExportFormat::from_path(path)?,
                })
            })
            .transpose()
    }
}

/// Convert every non-blank line of `text` with `convert_line`.
///
/// Lines are trimmed; blank ones produce no row. A failing line records its
/// error message and the rest of the batch still runs. Row order follows
/// input order.
pub fn convert_lines<F>(text: &str, convert_line: F) -> Vec<BatchRow>
where
    F: Fn(&str) -> Result<String, ValidationError> + Sync,
{
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .par_iter()
        .map(|&line| BatchRow {
            input: line.to_string(),
            output: convert_line(line).map_err(|err| err.message().to_string()),
        })
        .collect()
}

/// Write rows to `target` with `Input`/`Output` columns.
pub fn export_rows(rows: &[BatchRow], target: &ExportTarget) -> Result<(), ConversionError> {
    let path = &target.path;
    let inputs: Vec<&str> = rows.iter().map(|row| row.input.as_str()).collect();
    let outputs: Vec<String> = rows.iter().map(BatchRow::rendered).collect();

    let mut df = DataFrame::new(vec![
        Column::new("Input".into(), inputs),
        Column::new("Output".into(), outputs),
    ])
    .map_err(|err| ConversionError::with_source("Failed to build export table", err))?;

    let file = std::fs::File::create(path).map_err(|err| {
        ConversionError::with_source(
            format!("Failed to create export file: {}", path.display()),
            err,
        )
    })?;

    let written = match target.format {
        ExportFormat::Csv => {
            let mut file = file;
            CsvWriter::new(&mut file).finish(&mut df).map(|_| ())
        }
        ExportFormat::Parquet => ParquetWriter::new(file).finish(&mut df).map(|_| ()),
    };
    written.map_err(|err| {
        ConversionError::with_source(
            format!("Failed to write export file: {}", path.display()),
            err,
        )
    })?;

    info!(rows = rows.len(), path = %path.display(), "Exported batch results");
    Ok(())
}

/// Turn batch rows into output, exporting them first when asked to.
pub fn finish_batch(
    rows: Vec<BatchRow>,
    export: Option<&ExportTarget>,
) -> Result<Output, ConverterError> {
    let count = rows.len();
    let failed = rows.iter().filter(|row| row.output.is_err()).count();
    if failed > 0 {
        warn!(failed, total = count, "Some batch lines failed to convert");
    }

    if let Some(target) = export {
        export_rows(&rows, target)?;
    }

    let mut output = Output::from_rows(rows);
    if let Some(target) = export {
        output.push(format!(
            "Exported {} row(s) to {}",
            count,
            target.path.display()
        ));
    }
    Ok(output)
}

/// Log and drop an export request made outside batch mode. The path is not
/// checked, since nothing is written.
pub fn ignore_export(converter: &str, values: &Values) {
    if let Some(path) = values.path(EXPORT_ARG) {
        warn!(
            converter,
            path = %path.display(),
            "Export only applies to batch modes; ignoring"
        );
    }
}
