//! Cache Store Module
//!
//! The instrumented cache facade. Values are written under generated keys
//! and every `store` call is counted and logged in the backing store.

use std::io::{self, Write};

use tracing::{debug, info};

use crate::backend::{KvBackend, RedisBackend};
use crate::cache::convert::{to_float, to_integer, to_text};
use crate::cache::{StoreValue, Value};
use crate::config::Config;
use crate::error::{ConversionError, Result};
use crate::instrument::{self, CountCalls, Operation, RecordHistory, Replay};

type InstrumentedStore = RecordHistory<CountCalls<StoreValue>>;

// == Cache ==
/// Cache facade over a [`KvBackend`].
///
/// Holds nothing but the backend handle; values, counters and call logs
/// all live in the backing store.
#[derive(Debug)]
pub struct Cache<B: KvBackend> {
    backend: B,
    store_op: InstrumentedStore,
}

impl Cache<RedisBackend> {
    /// Connects to the Redis server addressed by `config` and flushes it.
    pub fn connect(config: &Config) -> Result<Self> {
        Self::new(RedisBackend::connect(config)?)
    }
}

impl<B: KvBackend> Cache<B> {
    // == Constructor ==
    /// Creates the facade and flushes the backend.
    ///
    /// This wipes every key of the selected database, including values,
    /// counters and logs written by other facades sharing the store.
    pub fn new(mut backend: B) -> Result<Self> {
        backend.flush_db()?;
        info!("Backing store flushed");

        Ok(Self {
            backend,
            store_op: RecordHistory::new(CountCalls::new(StoreValue::default())),
        })
    }

    // == Store ==
    /// Stores `data` under a new random key and returns the key.
    ///
    /// Counted and logged under [`STORE_OPERATION`](crate::STORE_OPERATION).
    ///
    /// # Arguments
    /// * `data` - Text, bytes, an integer or a float
    pub fn store(&mut self, data: impl Into<Value>) -> Result<String> {
        self.store_op.invoke(&mut self.backend, (data.into(),))
    }

    /// Name under which `store` calls are counted and logged.
    pub fn store_operation(&self) -> &'static str {
        Operation::<B>::name(&self.store_op)
    }

    // == Get ==
    /// Returns the raw bytes stored under `key`, `None` if it does not exist.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let raw = self.backend.get(key)?;
        match &raw {
            Some(bytes) => debug!("Hit {} ({} bytes)", key, bytes.len()),
            None => debug!("Miss {}", key),
        }
        Ok(raw)
    }

    /// Returns the value under `key` passed through `convert`.
    ///
    /// The converter is not called for a missing key. Its failure is
    /// returned as [`CacheError::Conversion`](crate::CacheError::Conversion).
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    /// * `convert` - Conversion applied to the raw stored bytes
    pub fn get_with<T, F>(&mut self, key: &str, convert: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> std::result::Result<T, ConversionError>,
    {
        match self.get(key)? {
            Some(raw) => Ok(Some(convert(raw)?)),
            None => Ok(None),
        }
    }

    /// Returns the value under `key` decoded as UTF-8.
    pub fn get_str(&mut self, key: &str) -> Result<Option<String>> {
        self.get_with(key, to_text)
    }

    /// Returns the value under `key` parsed as a base-10 integer.
    pub fn get_int(&mut self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, to_integer)
    }

    /// Returns the value under `key` parsed as a float.
    pub fn get_float(&mut self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, to_float)
    }

    // == Instrumentation ==
    /// Returns how many times the operation `name` was called.
    pub fn call_count(&mut self, name: &str) -> Result<u64> {
        instrument::call_count(&mut self.backend, name)
    }

    /// Reads the call history of the operation `name`.
    pub fn replay(&mut self, name: &str) -> Result<Replay> {
        Replay::load(&mut self.backend, name)
    }

    /// Writes the call history of the operation `name` to `out`.
    ///
    /// # Arguments
    /// * `name` - The operation name, e.g. [`STORE_OPERATION`](crate::STORE_OPERATION)
    /// * `out` - Destination of the rendered history
    pub fn write_replay<W: Write>(&mut self, name: &str, out: &mut W) -> Result<()> {
        let replay = self.replay(name)?;
        write!(out, "{}", replay)?;
        out.flush()?;
        Ok(())
    }

    /// Prints the call history of the operation `name` to stdout.
    pub fn print_replay(&mut self, name: &str) -> Result<()> {
        self.write_replay(name, &mut io::stdout().lock())
    }

    // == Backend Access ==
    /// Returns the backend the facade writes to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the backend mutably, for commands the facade does not wrap.
    ///
    /// Writes made through it bypass the call counter and call log.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the facade and returns the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::cache::STORE_OPERATION;
    use crate::error::CacheError;

    fn new_cache() -> Cache<MemoryBackend> {
        Cache::new(MemoryBackend::new()).unwrap()
    }

    #[test]
    fn test_new_flushes_backend() {
        let mut backend = MemoryBackend::new();
        backend.set("stale", b"value").unwrap();
        backend.incr(STORE_OPERATION).unwrap();

        let mut cache = Cache::new(backend).unwrap();

        assert!(cache.backend().is_empty().unwrap());
        assert_eq!(cache.call_count(STORE_OPERATION).unwrap(), 0);
    }

    #[test]
    fn test_store_and_get() {
        let mut cache = new_cache();

        let key = cache.store("value1").unwrap();

        assert_eq!(cache.get(&key).unwrap(), Some(b"value1".to_vec()));
    }

    #[test]
    fn test_get_nonexistent() {
        let mut cache = new_cache();
        assert_eq!(cache.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_get_with_missing_key_skips_converter() {
        let mut cache = new_cache();

        let result = cache
            .get_with("nonexistent", |_| -> std::result::Result<i64, ConversionError> {
                panic!("converter must not run for a missing key")
            })
            .unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn test_get_with_custom_converter() {
        let mut cache = new_cache();
        let key = cache.store("hello").unwrap();

        let len = cache.get_with(&key, |raw| Ok(raw.len())).unwrap();

        assert_eq!(len, Some(5));
    }

    #[test]
    fn test_typed_getters() {
        let mut cache = new_cache();
        let text = cache.store("text").unwrap();
        let int = cache.store(1234).unwrap();
        let float = cache.store(0.75).unwrap();

        assert_eq!(cache.get_str(&text).unwrap(), Some("text".to_string()));
        assert_eq!(cache.get_int(&int).unwrap(), Some(1234));
        assert_eq!(cache.get_float(&float).unwrap(), Some(0.75));
    }

    #[test]
    fn test_get_int_on_text_fails() {
        let mut cache = new_cache();
        let key = cache.store("not a number").unwrap();

        let result = cache.get_int(&key);

        assert!(matches!(
            result,
            Err(CacheError::Conversion(ConversionError::InvalidInteger(_)))
        ));
    }

    #[test]
    fn test_store_counts_and_logs() {
        let mut cache = new_cache();

        let first = cache.store("foo").unwrap();
        assert_eq!(cache.call_count(STORE_OPERATION).unwrap(), 1);
        cache.store(b"bar").unwrap();
        assert_eq!(cache.call_count(STORE_OPERATION).unwrap(), 2);

        let replay = cache.replay(STORE_OPERATION).unwrap();
        assert_eq!(replay.calls, 2);
        assert_eq!(replay.records.len(), 2);
        assert_eq!(replay.records[0].output, serde_json::json!(first));
        assert_eq!(
            replay.records[1].arguments(),
            Some(vec![Value::Bytes(b"bar".to_vec())])
        );
    }

    #[test]
    fn test_get_is_not_instrumented() {
        let mut cache = new_cache();
        let key = cache.store("foo").unwrap();

        cache.get(&key).unwrap();
        cache.get_str(&key).unwrap();

        assert_eq!(cache.call_count(STORE_OPERATION).unwrap(), 1);
    }

    #[test]
    fn test_write_replay_renders_history() {
        let mut cache = new_cache();
        let key = cache.store(f64::INFINITY).unwrap();

        let mut out = Vec::new();
        cache.write_replay(STORE_OPERATION, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!(
                "Cache.store was called 1 times:\nCache.store(inf) -> \"{}\"\n",
                key
            )
        );
    }

    #[test]
    fn test_print_replay_succeeds() {
        let mut cache = new_cache();
        cache.store("foo").unwrap();

        cache.print_replay(STORE_OPERATION).unwrap();
    }

    #[test]
    fn test_store_operation_name() {
        let cache = new_cache();
        assert_eq!(cache.store_operation(), "Cache.store");
    }

    #[test]
    fn test_into_backend_keeps_data() {
        let mut cache = new_cache();
        let key = cache.store("kept").unwrap();

        let mut backend = cache.into_backend();

        assert_eq!(backend.get(&key).unwrap(), Some(b"kept".to_vec()));
    }
}
