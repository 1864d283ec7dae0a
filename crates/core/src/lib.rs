//! Core types and traits for xrepo
//!
//! This crate defines the backend-agnostic half of the repository system:
//! - Identifiable: entities with a unique, statically typed identifier
//! - Query: composable boolean predicates over entities
//! - SortKey / DistinctKey: typed projections for ordering and de-duplication
//! - ReadRequest: the filter → sort → distinct read pipeline
//! - Repository: the operation set every backend implements
//! - Namespace: explicit storage-slot identifier
//! - RepositoryError: error kinds shared by all backends
//! - testing: reference model and contract conformance checks

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod identity;
pub mod keys;
pub mod namespace;
pub mod pipeline;
pub mod query;
pub mod repository;
pub mod testing;

pub use error::{ErrorKind, RepositoryError, RepositoryResult};
pub use identity::{EntityId, Identifiable};
pub use keys::{DistinctKey, SortDirection, SortKey};
pub use namespace::{Namespace, NamespaceError, DEFAULT_NAMESPACE, MAX_NAMESPACE_LENGTH};
pub use pipeline::ReadRequest;
pub use query::Query;
pub use repository::{dedup_by_id, Repository, TransactionBody};
