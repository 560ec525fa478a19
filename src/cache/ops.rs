//! Cache Operations
//!
//! The operations the facade runs through the instrumentation stack.

use tracing::debug;
use uuid::Uuid;

use crate::backend::KvBackend;
use crate::cache::Value;
use crate::error::Result;
use crate::instrument::Operation;

/// Counter and log key prefix of [`StoreValue`].
pub const STORE_OPERATION: &str = "Cache.store";

// == Store Value ==
/// Writes a value under a freshly generated UUID v4 key and returns the key.
#[derive(Debug, Clone)]
pub struct StoreValue {
    name: &'static str,
}

impl StoreValue {
    /// Registers the operation under `name`.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for StoreValue {
    fn default() -> Self {
        Self::named(STORE_OPERATION)
    }
}

impl<B: KvBackend> Operation<B> for StoreValue {
    type Input = (Value,);
    type Output = String;

    fn name(&self) -> &'static str {
        self.name
    }

    fn invoke(&self, backend: &mut B, (value,): (Value,)) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        backend.set(&key, &value.to_bytes())?;
        debug!("Stored {} value under {}", value.kind(), key);
        Ok(key)
    }
}
