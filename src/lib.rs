//! Instrumented Cache - A Redis-backed cache facade
//!
//! Stores scalar values under random UUID keys and records, in the backing
//! store itself, how often each tracked operation ran and with what
//! arguments and results.

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod instrument;

pub use backend::{KvBackend, MemoryBackend, RedisBackend};
pub use cache::{Cache, Value, STORE_OPERATION};
pub use config::Config;
pub use error::{CacheError, ConversionError, Result};
pub use instrument::{CallRecord, Replay};
