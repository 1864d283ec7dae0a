//! Storage layer for xrepo
//!
//! This crate implements the in-memory backend of the repository contract:
//! - MemoryRepository: concurrent store with serialized writers and lock-free reads
//! - Snapshot: immutable, versioned view published on every mutation
//! - TransactionContext: working-copy view handed to transaction bodies
//! - ChangeNotifier: callback and channel delivery of change events
//! - RepositoryConfig: `xrepo.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod memory;
pub mod notify;
pub mod snapshot;
pub mod transaction;
mod working;

pub use config::{RepositoryConfig, CONFIG_FILE_NAME};
pub use memory::MemoryRepository;
pub use notify::{ChangeEvent, ChangeKind, ChangeNotifier, ChangeSet, SubscriptionId};
pub use snapshot::Snapshot;
pub use transaction::TransactionContext;
