//! Hexadecimal ↔ decimal conversion with arbitrary precision

use num_bigint::BigInt;
use num_traits::Signed;

use super::batch::{self, ExportTarget, EXPORT_ARG};
use crate::core::{
    Argument, ArgumentType, Converter, ConverterError, InterfaceBuilder, Output, ValidationError,
    Values,
};

#[derive(Debug, Default)]
pub struct NumberConverter;

enum Mode<'a> {
    HexToDec(&'a str),
    DecToHex(&'a str),
    BatchHexToDec(&'a str),
    BatchDecToHex(&'a str),
}

impl<'a> Mode<'a> {
    fn from_values(values: &'a Values) -> Result<Self, ValidationError> {
        if let Some(input) = values.text("hex2dec") {
            Ok(Mode::HexToDec(input))
        } else if let Some(input) = values.text("dec2hex") {
            Ok(Mode::DecToHex(input))
        } else if let Some(input) = values.text("batch_hex2dec") {
            Ok(Mode::BatchHexToDec(input))
        } else if let Some(input) = values.text("batch_dec2hex") {
            Ok(Mode::BatchDecToHex(input))
        } else {
            Err(ValidationError::new(
                "One of --hex2dec, --dec2hex, --batch-hex2dec, --batch-dec2hex is required",
            ))
        }
    }
}

impl Converter for NumberConverter {
    fn name(&self) -> &str {
        "number"
    }

    fn help(&self) -> &str {
        "Convert between Hex and Decimal"
    }

    fn configure_args(&self, builder: &mut InterfaceBuilder) {
        let mode = builder.add_group(true, true);
        mode.add_argument(Argument::new("hex2dec", "Convert Hex string to Decimal").label("HEX_VALUE"));
        mode.add_argument(
            Argument::new("dec2hex", "Convert Decimal to Hex string").label("DECIMAL_VALUE"),
        );
        mode.add_argument(
            Argument::new("batch_hex2dec", "Convert Hex values to Decimal, one per line")
                .label("HEX_VALUES")
                .kind(ArgumentType::Text),
        );
        mode.add_argument(
            Argument::new("batch_dec2hex", "Convert Decimal values to Hex, one per line")
                .label("DECIMAL_VALUES")
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
            Mode::HexToDec(input) => {
                batch::ignore_export(self.name(), values);
                Ok(Output::line(hex_to_dec(input)?))
            }
            Mode::DecToHex(input) => {
                batch::ignore_export(self.name(), values);
                Ok(Output::line(dec_to_hex(input)?))
            }
            Mode::BatchHexToDec(text) => {
                let export = ExportTarget::from_values(values)?;
                batch::finish_batch(batch::convert_lines(text, hex_to_dec), export.as_ref())
            }
            Mode::BatchDecToHex(text) => {
                let export = ExportTarget::from_values(values)?;
                batch::finish_batch(batch::convert_lines(text, dec_to_hex), export.as_ref())
            }
        }
    }
}

/// `"0xA"` → `"10"`. The `0x`/`0X` prefix is optional.
pub fn hex_to_dec(input: &str) -> Result<String, ValidationError> {
    parse_integer(input, 16)
        .map(|n| n.to_str_radix(10))
        .ok_or_else(|| ValidationError::new(format!("Invalid hex value: {}", input)))
}

/// `"10"` → `"0xa"`, `"-10"` → `"-0xa"`.
pub fn dec_to_hex(input: &str) -> Result<String, ValidationError> {
    let n = parse_integer(input, 10)
        .ok_or_else(|| ValidationError::new(format!("Invalid decimal value: {}", input)))?;
    let sign = if n.is_negative() { "-" } else { "" };
    Ok(format!("{}0x{}", sign, n.abs().to_str_radix(16)))
}

/// Integer literal parsing: surrounding whitespace, an optional sign, an
/// optional `0x` prefix for base 16 and single underscores between digits.
fn parse_integer(input: &str, radix: u32) -> Option<BigInt> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (prefixed, body) = if radix == 16 {
        match unsigned.get(..2) {
            Some("0x") | Some("0X") => (true, &unsigned[2..]),
            _ => (false, unsigned),
        }
    } else {
        (false, unsigned)
    };

    // A prefix may be followed by one underscore: 0x_ff
    let body = if prefixed {
        body.strip_prefix('_').unwrap_or(body)
    } else {
        body
    };

    if body.is_empty()
        || body.starts_with('_')
        || body.ends_with('_')
        || body.contains("__")
    {
        return None;
    }

    let digits: String = body.chars().filter(|&c| c != '_').collect();
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::execute;
    use rand::Rng;

    #[test]
    fn test_hex_to_dec() {
        assert_eq!(hex_to_dec("0xA").unwrap(), "10");
        assert_eq!(hex_to_dec("ff").unwrap(), "255");
        assert_eq!(hex_to_dec("0XfF").unwrap(), "255");
        assert_eq!(hex_to_dec("  0x10  ").unwrap(), "16");
        assert_eq!(hex_to_dec("-0x1").unwrap(), "-1");
        assert_eq!(hex_to_dec("0x_ff_ff").unwrap(), "65535");
    }

    #[test]
    fn test_hex_to_dec_beyond_u128() {
        let hex = format!("0x1{}", "0".repeat(40));
        assert_eq!(
            hex_to_dec(&hex).unwrap(),
            "1461501637330902918203684832716283019655932542976"
        );
    }

    #[test]
    fn test_invalid_hex() {
        let err = hex_to_dec("ZZZ").unwrap_err();
        assert_eq!(err.message(), "Invalid hex value: ZZZ");
        assert!(hex_to_dec("").is_err());
        assert!(hex_to_dec("0x").is_err());
        assert!(hex_to_dec("f__f").is_err());
        assert!(hex_to_dec("ff_").is_err());
        assert!(hex_to_dec("--1").is_err());
    }

    #[test]
    fn test_dec_to_hex() {
        assert_eq!(dec_to_hex("10").unwrap(), "0xa");
        assert_eq!(dec_to_hex("0").unwrap(), "0x0");
        assert_eq!(dec_to_hex("-255").unwrap(), "-0xff");
        assert_eq!(dec_to_hex("1_000").unwrap(), "0x3e8");
        assert!(dec_to_hex("0x10").is_err());
        assert!(dec_to_hex("1.5").is_err());
    }

    #[test]
    fn test_round_trip_random_integers() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let n: u128 = rng.gen();
            let hex = dec_to_hex(&n.to_string()).unwrap();
            assert!(hex.starts_with("0x"));
            assert_eq!(hex, hex.to_lowercase());
            assert_eq!(hex_to_dec(&hex).unwrap(), n.to_string());
        }
    }

    #[test]
    fn test_batch_hex_to_dec() {
        let values = Values::new().with_text("batch_hex2dec", "0xA\nZZZ\n\nff");
        let output = execute(&NumberConverter, &values).unwrap();
        assert_eq!(
            output.lines,
            vec!["10", "Error: Invalid hex value: ZZZ", "255"]
        );
    }

    #[test]
    fn test_single_mode_scenarios() {
        let output = execute(&NumberConverter, &Values::new().with_text("hex2dec", "0xA")).unwrap();
        assert_eq!(output.to_string(), "10");

        let output = execute(&NumberConverter, &Values::new().with_text("dec2hex", "10")).unwrap();
        assert_eq!(output.to_string(), "0xa");

        let err = execute(&NumberConverter, &Values::new().with_text("hex2dec", "ZZZ")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_single_mode_ignores_any_export_path() {
        let values = Values::new()
            .with_text("dec2hex", "255")
            .with_path(EXPORT_ARG, "out.txt");
        let output = execute(&NumberConverter, &values).unwrap();
        assert_eq!(output.lines, vec!["0xff"]);
        assert!(output.rows.is_empty());
    }
}
