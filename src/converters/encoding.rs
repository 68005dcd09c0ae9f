//! Base64 encoding of UTF-8 text

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::Engine;

use crate::core::{
    Argument, Converter, ConverterError, InterfaceBuilder, Output, ValidationError, Values,
};

/// Standard alphabet with required padding. Non-zero bits left over in the
/// last symbol are dropped rather than rejected.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Default)]
pub struct EncodingConverter;

impl Converter for EncodingConverter {
    fn name(&self) -> &str {
        "encoding"
    }

    fn help(&self) -> &str {
        "Encode/Decode Base64"
    }

    fn configure_args(&self, builder: &mut InterfaceBuilder) {
        let mode = builder.add_group(true, true);
        mode.add_argument(Argument::new("b64enc", "Encode string to Base64").label("STRING"));
        mode.add_argument(Argument::new("b64dec", "Decode Base64 string").label("BASE64_STRING"));
    }

    fn convert(&self, values: &Values) -> Result<Output, ConverterError> {
        if let Some(text) = values.text("b64enc") {
            Ok(Output::line(b64_encode(text)))
        } else if let Some(encoded) = values.text("b64dec") {
            Ok(Output::line(b64_decode(encoded)?))
        } else {
            Err(ValidationError::new("One of --b64enc, --b64dec is required").into())
        }
    }
}

pub fn b64_encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode standard, padded base64 into UTF-8 text. Whitespace is ignored.
pub fn b64_decode(encoded: &str) -> Result<String, ValidationError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = LENIENT
        .decode(compact.as_bytes())
        .map_err(|err| ValidationError::new(format!("Decoding failed: {}", err)))?;
    String::from_utf8(bytes)
        .map_err(|err| ValidationError::new(format!("Decoding failed: {}", err)))
}
