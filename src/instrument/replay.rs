//! Replay Module
//!
//! Reads back the counter and call logs of an operation for display.

use std::fmt;

use serde_json::Value as Json;
use tracing::warn;

use crate::backend::KvBackend;
use crate::cache::Value;
use crate::error::Result;
use crate::instrument::{call_count, inputs_key, outputs_key};

// == Call Record ==
/// One logged call: the argument list and the result, as recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub input: Json,
    pub output: Json,
}

impl CallRecord {
    /// Decodes the arguments as scalar values when every one of them is one.
    pub fn arguments(&self) -> Option<Vec<Value>> {
        serde_json::from_value(self.input.clone()).ok()
    }
}

// == Replay ==
/// Snapshot of an operation's call history.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub name: String,
    pub calls: u64,
    pub records: Vec<CallRecord>,
}

impl Replay {
    // == Load ==
    /// Reads the counter and both logs of `name`.
    ///
    /// Records are paired by position. If the logs differ in length the
    /// extra entries of the longer one are dropped.
    pub fn load<B: KvBackend>(backend: &mut B, name: &str) -> Result<Self> {
        let calls = call_count(backend, name)?;
        let inputs = backend.lrange(&inputs_key(name), 0, -1)?;
        let outputs = backend.lrange(&outputs_key(name), 0, -1)?;

        if inputs.len() != outputs.len() {
            warn!(
                "{} has {} logged inputs but {} outputs, replay truncated",
                name,
                inputs.len(),
                outputs.len()
            );
        }

        let records = inputs
            .iter()
            .zip(outputs.iter())
            .map(|(input, output)| -> Result<CallRecord> {
                Ok(CallRecord {
                    input: serde_json::from_slice(input)?,
                    output: serde_json::from_slice(output)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            calls,
            records,
        })
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.name, self.calls)?;
        for record in &self.records {
            write!(f, "{}(", self.name)?;
            match record.arguments() {
                Some(args) => {
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                }
                None => write!(f, "{}", record.input)?,
            }
            writeln!(f, ") -> {}", record.output)?;
        }
        Ok(())
    }
}
