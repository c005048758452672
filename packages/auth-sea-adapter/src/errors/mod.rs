//! Error handling for the adapter.

pub mod adapter;

pub use adapter::{AdapterError, AdapterResult};
