//! Contract Integration Tests
//!
//! Tests that `MemoryRepository` honors the repository contract when used
//! through the facade crate, directly and behind `Box<dyn Repository<T>>`.

#[path = "../common/mod.rs"]
mod common;

mod conformance;
mod employees;
mod errors;
