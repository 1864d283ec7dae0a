//! Concurrency Integration Tests
//!
//! Tests serialized mutation, whole-state publication and transaction
//! isolation of `MemoryRepository` under real threads.

#[path = "../common/mod.rs"]
mod common;

mod readers;
mod transactions;
