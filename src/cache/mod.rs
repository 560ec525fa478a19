//! Cache Module
//!
//! Provides the instrumented cache facade and the scalar values it stores.

pub mod convert;
mod ops;
mod store;
mod value;


// Re-export public types
pub use ops::{StoreValue, STORE_OPERATION};
pub use store::Cache;
pub use value::Value;
