//! Repository backends.
//!
//! `sea` talks to a real database through SeaORM; `memory` keeps rows in a
//! process-local map and backs the test suites.

pub mod memory;
pub mod sea;

pub use memory::{MemoryRepository, MemorySource};
pub use sea::{SeaOrmSource, SeaRepository};
