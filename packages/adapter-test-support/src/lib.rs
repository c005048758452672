//! Adapter test support utilities
//!
//! This crate provides utilities for adapter testing, including
//! in-memory SQLite connection management and unified logging initialization.

pub mod logging;
pub mod sqlite;
