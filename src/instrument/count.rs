//! Call Counter
//!
//! Wrapper that increments a per-operation counter on every invocation.

use tracing::debug;

use crate::backend::KvBackend;
use crate::error::Result;
use crate::instrument::Operation;

// == Count Calls ==
/// Increments the counter stored under the operation name, then invokes
/// the inner operation.
///
/// The counter is bumped before the inner call runs, so a call that fails
/// still counts.
#[derive(Debug, Clone)]
pub struct CountCalls<O> {
    inner: O,
}

impl<O> CountCalls<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

impl<B, O> Operation<B> for CountCalls<O>
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
        let name = self.inner.name();
        let calls = backend.incr(name)?;
        debug!("{} call #{}", name, calls);
        self.inner.invoke(backend, input)
    }
}
