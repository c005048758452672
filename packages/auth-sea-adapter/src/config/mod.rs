//! Adapter configuration.

pub mod adapter;
pub mod env;

pub use adapter::AdapterConfig;
