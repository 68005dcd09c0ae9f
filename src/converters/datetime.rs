//! ISO-8601 datetime ↔ POSIX timestamp conversion

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::batch::{self, ExportTarget, EXPORT_ARG};
use crate::core::{
    Argument, ArgumentType, Converter, ConverterError, InterfaceBuilder, Output, ValidationError,
    Values,
};

/// Seconds from the epoch to 0001-01-01T00:00:00Z.
const MIN_TIMESTAMP: f64 = -62_135_596_800.0;
/// Seconds from the epoch to 9999-12-31T23:59:59Z.
const MAX_TIMESTAMP: f64 = 253_402_300_799.0;

const AWARE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Default)]
pub struct DatetimeConverter;

enum Mode<'a> {
    ToTimestamp(&'a str),
    ToDatetime(&'a str),
    BatchToTimestamp(&'a str),
    BatchToDatetime(&'a str),
}

impl<'a> Mode<'a> {
    fn from_values(values: &'a Values) -> Result<Self, ValidationError> {
        if let Some(input) = values.text("to_ts") {
            Ok(Mode::ToTimestamp(input))
        } else if let Some(input) = values.text("to_dt") {
            Ok(Mode::ToDatetime(input))
        } else if let Some(input) = values.text("batch_to_ts") {
            Ok(Mode::BatchToTimestamp(input))
        } else if let Some(input) = values.text("batch_to_dt") {
            Ok(Mode::BatchToDatetime(input))
        } else {
            Err(ValidationError::new(
                "One of --to-ts, --to-dt, --batch-to-ts, --batch-to-dt is required",
            ))
        }
    }
}

impl Converter for DatetimeConverter {
    fn name(&self) -> &str {
        "datetime"
    }

    fn help(&self) -> &str {
        "Convert between Timestamp and Datetime (ISO format)"
    }

    fn configure_args(&self, builder: &mut InterfaceBuilder) {
        let mode = builder.add_group(true, true);
        mode.add_argument(
            Argument::new("to_ts", "Convert ISO datetime string to timestamp").label("ISO_DATETIME"),
        );
        mode.add_argument(
            Argument::new("to_dt", "Convert timestamp to ISO datetime string").label("TIMESTAMP"),
        );
        mode.add_argument(
            Argument::new("batch_to_ts", "Convert ISO datetimes to timestamps, one per line")
                .label("ISO_DATETIMES")
                .kind(ArgumentType::Text),
        );
        mode.add_argument(
            Argument::new("batch_to_dt", "Convert timestamps to ISO datetimes, one per line")
                .label("TIMESTAMPS")
                .kind(ArgumentType::Text),
        );

        builder.add_argument(
            Argument::new(EXPORT_ARG, "Export batch results to a spreadsheet (.csv or .parquet)")
                .label("FILE")
                .kind(ArgumentType::FileSave),
        );
    }

    fn convert(&self, values: &Values) -> Result<Output, ConverterError> {
        match Mode::from_values(values)? {
            Mode::ToTimestamp(input) => {
                batch::ignore_export(self.name(), values);
                Ok(Output::line(to_timestamp(input)?))
            }
            Mode::ToDatetime(input) => {
                batch::ignore_export(self.name(), values);
                Ok(Output::line(to_datetime(input)?))
            }
            Mode::BatchToTimestamp(text) => {
                let export = ExportTarget::from_values(values)?;
                batch::finish_batch(batch::convert_lines(text, to_timestamp), export.as_ref())
            }
            Mode::BatchToDatetime(text) => {
                let export = ExportTarget::from_values(values)?;
                batch::finish_batch(batch::convert_lines(text, to_datetime), export.as_ref())
            }
        }
    }
}

/// ISO-8601 string → POSIX timestamp, e.g. `1672574400.0`.
pub fn to_timestamp(input: &str) -> Result<String, ValidationError> {
    let dt = parse_iso_datetime(input)?;
    Ok(format_float(dt.timestamp_micros() as f64 / 1_000_000.0))
}

/// POSIX timestamp → ISO-8601 in UTC with an explicit `+00:00` offset.
pub fn to_datetime(input: &str) -> Result<String, ValidationError> {
    let ts: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(format!("Invalid timestamp: '{}'", input)))?;
    let dt = utc_from_timestamp(ts)?;
    Ok(format_utc(&dt))
}

/// Parse an ISO-8601 datetime, aware or naive. Naive values are local time.
pub fn parse_iso_datetime(input: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    let invalid = || ValidationError::new(format!("Invalid ISO datetime format: '{}'", input));
    let normalized = normalize_iso(input.trim());

    for format in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Ok(dt);
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(invalid)?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| {
            ValidationError::new(format!(
                "Invalid ISO datetime format: '{}' does not exist in the local timezone",
                input
            ))
        })
}

/// Accept a space separator and a `Z` suffix.
fn normalize_iso(input: &str) -> String {
    let mut normalized = input.to_string();
    if normalized.len() > 10 && normalized.as_bytes()[10] == b' ' {
        normalized.replace_range(10..11, "T");
    }
    if let Some(stripped) = normalized
        .strip_suffix('Z')
        .or_else(|| normalized.strip_suffix('z'))
    {
        normalized = format!("{}+00:00", stripped);
    }
    normalized
}

/// Split into whole seconds and microseconds rounded half-to-even.
fn utc_from_timestamp(ts: f64) -> Result<DateTime<Utc>, ValidationError> {
    if !ts.is_finite() {
        return Err(ValidationError::new(format!("Invalid timestamp: {}", ts)));
    }

    let mut secs = ts.trunc();
    let mut micros = ((ts - secs) * 1_000_000.0).round_ties_even();
    if micros >= 1_000_000.0 {
        secs += 1.0;
        micros -= 1_000_000.0;
    } else if micros < 0.0 {
        secs -= 1.0;
        micros += 1_000_000.0;
    }

    if !(MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&secs) {
        return Err(ValidationError::new(format!(
            "Invalid timestamp: {} is out of range for year 1..9999",
            ts
        )));
    }

    DateTime::from_timestamp(secs as i64, micros as u32 * 1_000)
        .ok_or_else(|| ValidationError::new(format!("Invalid timestamp: {}", ts)))
}

fn format_utc(dt: &DateTime<Utc>) -> String {
    let micros = dt.timestamp_subsec_micros();
    let base = dt.format("%Y-%m-%dT%H:%M:%S");
    if micros == 0 {
        format!("{}+00:00", base)
    } else {
        format!("{}.{:06}+00:00", base, micros)
    }
}

/// Shortest round-trip decimal, always with a fractional part.
///
/// Decimal exponents below -4 or from 16 up switch to scientific notation
/// with a signed, at least two digit exponent (`1e-06`, `1.5e+16`).
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    if value != 0.0 {
        let scientific = format!("{:e}", value);
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                if !(-4..16).contains(&exponent) {
                    let sign = if exponent < 0 { '-' } else { '+' };
                    return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
                }
            }
        }
    }

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}
