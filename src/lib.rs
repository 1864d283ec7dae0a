//! xrepo - one data-access contract, swappable backends
//!
//! xrepo lets application code read and write entities through a single
//! [`Repository`] trait, whatever storage sits behind it. Reads go through one
//! pipeline (filter → sort → distinct) with identical semantics on every
//! backend; mutations report violated preconditions as typed errors instead
//! of silently doing nothing.
//!
//! # Quick Start
//!
//! ```
//! use xrepo::{Identifiable, MemoryRepository, Query, ReadRequest, Repository, SortKey};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Employee {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Identifiable for Employee {
//!     type Id = String;
//!     fn id(&self) -> String {
//!         self.name.clone()
//!     }
//! }
//!
//! let repo = MemoryRepository::<Employee>::default();
//! repo.create(Employee { name: "Sebi".into(), age: 22 })?;
//! repo.create(Employee { name: "Joan".into(), age: 23 })?;
//!
//! let adults = repo.get_elements(
//!     &ReadRequest::all()
//!         .filtered_by(Query::ge(|e: &Employee| e.age, 23))
//!         .sorted_by(SortKey::ascending(|e: &Employee| e.age)),
//! );
//! assert_eq!(adults.len(), 1);
//! # Ok::<(), xrepo::RepositoryError>(())
//! ```
//!
//! # Architecture
//!
//! - `xrepo-core`: identity, queries, sort/distinct keys, the read pipeline,
//!   the [`Repository`] contract and its errors
//! - `xrepo-storage`: [`MemoryRepository`], snapshots, transactions, change
//!   events and configuration

pub use xrepo_core::*;
pub use xrepo_storage::*;
