//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror.

use std::num::{ParseFloatError, ParseIntError};
use std::string::FromUtf8Error;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache facade.
///
/// A missing key is never an error; lookups report it as `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Connectivity or protocol failure reported by the Redis client
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Failure reported by an in-process backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// A converter could not turn the stored bytes into the requested type
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// A call log entry could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing a rendered replay failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

// == Conversion Error Enum ==
/// Failure of a typed converter applied to raw stored bytes.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("value is not a base-10 integer: {0}")]
    InvalidInteger(#[from] ParseIntError),

    #[error("value is not a floating-point number: {0}")]
    InvalidFloat(#[from] ParseFloatError),
}

// == Result Type Alias ==
/// Convenience Result type for the cache facade.
pub type Result<T> = std::result::Result<T, CacheError>;
