//! Storage Integration Tests
//!
//! Tests configuration files and change notifications of the in-memory store.

#[path = "../common/mod.rs"]
mod common;

mod config;
