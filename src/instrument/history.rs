//! Call History
//!
//! Wrapper that appends every call's arguments and result to the
//! operation's input and output logs.

use tracing::debug;

use crate::backend::KvBackend;
use crate::error::Result;
use crate::instrument::{inputs_key, outputs_key, Operation};

// == Record History ==
/// Records `(input, output)` of each successful call as JSON entries.
///
/// Both entries are appended in one atomic step after the inner call
/// returns, so the two logs always have the same length and stay paired
/// even when several clients share the store. A failed call appends nothing.
#[derive(Debug, Clone)]
pub struct RecordHistory<O> {
    inner: O,
}

impl<O> RecordHistory<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

impl<B, O> Operation<B> for RecordHistory<O>
where
    B: KvBackend,
    O: Operation<B>,
{
    type Input = O::Input;
    type Output = O::Output;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn invoke(&self, backend: &mut B, input: Self::Input) -> Result<Self::Output> {
        let encoded_input = serde_json::to_vec(&input)?;

        let output = self.inner.invoke(backend, input)?;
        let encoded_output = serde_json::to_vec(&output)?;

        let name = self.inner.name();
        let logged = backend.rpush_pair(
            &inputs_key(name),
            &encoded_input,
            &outputs_key(name),
            &encoded_output,
        )?;
        debug!("{} history now holds {} calls", name, logged);

        Ok(output)
    }
}
