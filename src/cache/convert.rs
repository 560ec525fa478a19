//! Converters
//!
//! Typed conversions from the raw bytes held by the store, for use with
//! [`Cache::get_with`](crate::Cache::get_with).

use crate::error::ConversionError;

/// Decodes the bytes as UTF-8 text.
pub fn to_text(raw: Vec<u8>) -> Result<String, ConversionError> {
    Ok(String::from_utf8(raw)?)
}

/// Parses the bytes as a base-10 signed integer.
pub fn to_integer(raw: Vec<u8>) -> Result<i64, ConversionError> {
    Ok(to_text(raw)?.parse()?)
}

/// Parses the bytes as a floating-point number.
pub fn to_float(raw: Vec<u8>) -> Result<f64, ConversionError> {
    Ok(to_text(raw)?.parse()?)
}
