//! Backend Module
//!
//! The backing store seam. The facade talks to the store only through
//! [`KvBackend`], so the same instrumentation runs against Redis or the
//! in-process [`MemoryBackend`].

mod memory;
mod redis_backend;

pub use self::memory::MemoryBackend;
pub use self::redis_backend::RedisBackend;

use crate::error::Result;

// == Backend Trait ==
/// The subset of the Redis command set the facade relies on.
///
/// All calls are synchronous and blocking. Failures are returned as-is;
/// nothing is retried.
pub trait KvBackend {
    /// Writes `value` under `key`, replacing whatever was stored there.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Reads the value under `key`, `None` when the key does not exist.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Increments the integer under `key` by one and returns the new value.
    ///
    /// A missing key counts as zero.
    fn incr(&mut self, key: &str) -> Result<i64>;

    /// Appends `value` to the list under `key` and returns the new length.
    fn rpush(&mut self, key: &str, value: &[u8]) -> Result<usize>;

    /// Appends `input` to the list under `inputs_key` and `output` to the
    /// list under `outputs_key` as one atomic step.
    ///
    /// Other clients never observe one append without the other, so the two
    /// lists stay paired by position. Returns the new length of the outputs
    /// list.
    fn rpush_pair(
        &mut self,
        inputs_key: &str,
        input: &[u8],
        outputs_key: &str,
        output: &[u8],
    ) -> Result<usize>;

    /// Returns the list elements between `start` and `stop` inclusive.
    ///
    /// Negative indices count from the end, so `(0, -1)` is the whole list.
    fn lrange(&mut self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Removes every key of the selected database.
    fn flush_db(&mut self) -> Result<()>;
}
