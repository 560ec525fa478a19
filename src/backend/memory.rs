//! Memory Backend Module
//!
//! In-process stand-in for Redis. Keeps strings and lists in a HashMap and
//! reproduces the Redis behaviors the facade depends on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::KvBackend;
use crate::error::{CacheError, Result};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

// == Stored Entry ==
/// A value held by the memory backend.
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

// == Memory Backend ==
/// Shared in-memory key space.
///
/// Clones share the same data, which lets several facades (or a test)
/// observe one store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of keys currently stored.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    // == Is Empty ==
    /// Returns true if no keys are stored.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    // == Contains ==
    /// Checks whether `key` exists, whatever its type.
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(key))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|e| CacheError::Backend(format!("memory store lock poisoned: {}", e)))
    }
}

impl KvBackend for MemoryBackend {
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.lock()?
            .insert(key.to_string(), Entry::Bytes(value.to_vec()));
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.lock()?.get(key) {
            Some(Entry::Bytes(value)) => Ok(Some(value.clone())),
            Some(Entry::List(_)) => Err(CacheError::Backend(WRONG_TYPE.to_string())),
            None => Ok(None),
        }
    }

    fn incr(&mut self, key: &str) -> Result<i64> {
        let mut entries = self.lock()?;
        let current = match entries.get(key) {
            Some(Entry::Bytes(value)) => std::str::from_utf8(value)
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
                .ok_or_else(|| {
                    CacheError::Backend("value is not an integer or out of range".to_string())
                })?,
            Some(Entry::List(_)) => return Err(CacheError::Backend(WRONG_TYPE.to_string())),
            None => 0,
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::Backend("increment would overflow".to_string()))?;
        entries.insert(key.to_string(), Entry::Bytes(next.to_string().into_bytes()));
        Ok(next)
    }

    fn rpush(&mut self, key: &str, value: &[u8]) -> Result<usize> {
        let mut entries = self.lock()?;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));

        match entry {
            Entry::List(items) => {
                items.push(value.to_vec());
                Ok(items.len())
            }
            Entry::Bytes(_) => Err(CacheError::Backend(WRONG_TYPE.to_string())),
        }
    }

    fn rpush_pair(
        &mut self,
        inputs_key: &str,
        input: &[u8],
        outputs_key: &str,
        output: &[u8],
    ) -> Result<usize> {
        let mut entries = self.lock()?;

        // Reject before touching either list so a failure leaves both intact
        for key in [inputs_key, outputs_key] {
            if let Some(Entry::Bytes(_)) = entries.get(key) {
                return Err(CacheError::Backend(WRONG_TYPE.to_string()));
            }
        }

        push_list(&mut entries, inputs_key, input);
        Ok(push_list(&mut entries, outputs_key, output))
    }

    fn lrange(&mut self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        match self.lock()?.get(key) {
            Some(Entry::List(items)) => Ok(slice_range(items, start, stop).to_vec()),
            Some(Entry::Bytes(_)) => Err(CacheError::Backend(WRONG_TYPE.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn flush_db(&mut self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}

/// Appends to a key already known to hold a list or nothing.
fn push_list(entries: &mut HashMap<String, Entry>, key: &str, value: &[u8]) -> usize {
    match entries
        .entry(key.to_string())
        .or_insert_with(|| Entry::List(Vec::new()))
    {
        Entry::List(items) => {
            items.push(value.to_vec());
            items.len()
        }
        Entry::Bytes(_) => 0,
    }
}

// == Range Resolution ==
/// Resolves Redis-style inclusive indices against `items`.
fn slice_range(items: &[Vec<u8>], start: isize, stop: isize) -> &[Vec<u8>] {
    let len = items.len() as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        return &[];
    }
    &items[start as usize..=stop as usize]
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(backend: &mut MemoryBackend, key: &str, items: &[&str]) {
        for item in items {
            backend.rpush(key, item.as_bytes()).unwrap();
        }
    }

    #[test]
    fn test_backend_new() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.len().unwrap(), 0);
        assert!(backend.is_empty().unwrap());
    }

    #[test]
    fn test_set_and_get() {
        let mut backend = MemoryBackend::new();

        backend.set("key1", b"value1").unwrap();

        assert_eq!(backend.get("key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(backend.len().unwrap(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let mut backend = MemoryBackend::new();
        assert_eq!(backend.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites_list() {
        let mut backend = MemoryBackend::new();
        list_of(&mut backend, "key1", &["a"]);

        backend.set("key1", b"value").unwrap();

        assert_eq!(backend.get("key1").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_incr_starts_from_zero() {
        let mut backend = MemoryBackend::new();

        assert_eq!(backend.incr("counter").unwrap(), 1);
        assert_eq!(backend.incr("counter").unwrap(), 2);
        assert_eq!(backend.get("counter").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_incr_existing_integer_text() {
        let mut backend = MemoryBackend::new();
        backend.set("counter", b"41").unwrap();

        assert_eq!(backend.incr("counter").unwrap(), 42);
    }

    #[test]
    fn test_incr_non_integer_fails() {
        let mut backend = MemoryBackend::new();
        backend.set("counter", b"abc").unwrap();

        assert!(matches!(backend.incr("counter"), Err(CacheError::Backend(_))));
    }

    #[test]
    fn test_incr_overflow_fails() {
        let mut backend = MemoryBackend::new();
        backend.set("counter", i64::MAX.to_string().as_bytes()).unwrap();

        assert!(matches!(backend.incr("counter"), Err(CacheError::Backend(_))));
    }

    #[test]
    fn test_rpush_returns_length() {
        let mut backend = MemoryBackend::new();

        assert_eq!(backend.rpush("list", b"a").unwrap(), 1);
        assert_eq!(backend.rpush("list", b"b").unwrap(), 2);
    }

    #[test]
    fn test_wrong_type_errors() {
        let mut backend = MemoryBackend::new();
        backend.set("string", b"value").unwrap();
        list_of(&mut backend, "list", &["a"]);

        assert!(matches!(backend.rpush("string", b"x"), Err(CacheError::Backend(_))));
        assert!(matches!(backend.lrange("string", 0, -1), Err(CacheError::Backend(_))));
        assert!(matches!(backend.get("list"), Err(CacheError::Backend(_))));
        assert!(matches!(backend.incr("list"), Err(CacheError::Backend(_))));
    }

    #[test]
    fn test_rpush_pair_appends_both_lists() {
        let mut backend = MemoryBackend::new();
        list_of(&mut backend, "op:outputs", &["earlier"]);

        let len = backend.rpush_pair("op:inputs", b"in", "op:outputs", b"out").unwrap();

        assert_eq!(len, 2);
        assert_eq!(backend.lrange("op:inputs", 0, -1).unwrap(), vec![b"in".to_vec()]);
        assert_eq!(
            backend.lrange("op:outputs", -1, -1).unwrap(),
            vec![b"out".to_vec()]
        );
    }

    #[test]
    fn test_rpush_pair_wrong_type_leaves_lists_untouched() {
        let mut backend = MemoryBackend::new();
        backend.set("op:outputs", b"occupied").unwrap();

        let result = backend.rpush_pair("op:inputs", b"in", "op:outputs", b"out");

        assert!(matches!(result, Err(CacheError::Backend(_))));
        assert!(!backend.contains_key("op:inputs").unwrap());
        assert_eq!(backend.get("op:outputs").unwrap(), Some(b"occupied".to_vec()));
    }

    #[test]
    fn test_lrange_whole_list() {
        let mut backend = MemoryBackend::new();
        list_of(&mut backend, "list", &["a", "b", "c"]);

        let items = backend.lrange("list", 0, -1).unwrap();
        assert_eq!(items, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_lrange_negative_and_clamped_indices() {
        let mut backend = MemoryBackend::new();
        list_of(&mut backend, "list", &["a", "b", "c", "d"]);

        assert_eq!(
            backend.lrange("list", -2, -1).unwrap(),
            vec![b"c".to_vec(), b"d".to_vec()]
        );
        assert_eq!(
            backend.lrange("list", 1, 100).unwrap(),
            vec![b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]
        );
        assert_eq!(backend.lrange("list", -100, 0).unwrap(), vec![b"a".to_vec()]);
        assert!(backend.lrange("list", 3, 1).unwrap().is_empty());
        assert!(backend.lrange("list", 10, 20).unwrap().is_empty());
    }

    #[test]
    fn test_lrange_missing_key_is_empty() {
        let mut backend = MemoryBackend::new();
        assert!(backend.lrange("missing", 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_flush_db_clears_everything() {
        let mut backend = MemoryBackend::new();
        backend.set("key1", b"value1").unwrap();
        list_of(&mut backend, "list", &["a"]);

        backend.flush_db().unwrap();

        assert!(backend.is_empty().unwrap());
        assert_eq!(backend.get("key1").unwrap(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let mut writer = MemoryBackend::new();
        let mut reader = writer.clone();

        writer.set("shared", b"yes").unwrap();

        assert!(reader.contains_key("shared").unwrap());
        assert_eq!(reader.get("shared").unwrap(), Some(b"yes".to_vec()));
    }
}
