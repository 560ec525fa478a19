//! Instrumentation Module
//!
//! Call counting and call history as composable wrappers around an
//! [`Operation`]. The wrapped operation never sees the instrumentation.
//!
//! For an operation named `Cache.store` the backing store holds:
//! - `Cache.store` - the call counter
//! - `Cache.store:inputs` - one JSON entry per call with the arguments
//! - `Cache.store:outputs` - one JSON entry per call with the result

mod count;
mod history;
mod replay;

pub use count::CountCalls;
pub use history::RecordHistory;
pub use replay::{CallRecord, Replay};

use serde::Serialize;

use crate::backend::KvBackend;
use crate::error::{ConversionError, Result};

// == Operation Trait ==
/// A named call against the backing store.
pub trait Operation<B: KvBackend> {
    /// Argument tuple of a call, recorded in the inputs log
    type Input: Serialize;
    /// Result of a call, recorded in the outputs log
    type Output: Serialize;

    /// Static identifier used as the counter and log key prefix.
    fn name(&self) -> &'static str;

    /// Runs the operation once.
    fn invoke(&self, backend: &mut B, input: Self::Input) -> Result<Self::Output>;
}

// == Key Helpers ==
/// Key of the list holding the inputs of `name`.
pub fn inputs_key(name: &str) -> String {
    format!("{}:inputs", name)
}

/// Key of the list holding the outputs of `name`.
pub fn outputs_key(name: &str) -> String {
    format!("{}:outputs", name)
}

/// Reads the call counter of `name`, zero when it was never incremented.
pub fn call_count<B: KvBackend>(backend: &mut B, name: &str) -> Result<u64> {
    match backend.get(name)? {
        Some(raw) => {
            let text = String::from_utf8(raw).map_err(ConversionError::from)?;
            let count = text
                .trim()
                .parse::<u64>()
                .map_err(ConversionError::from)?;
            Ok(count)
        }
        None => Ok(0),
    }
}
