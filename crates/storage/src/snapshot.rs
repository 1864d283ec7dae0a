//! Snapshot: immutable point-in-time view of a repository
//!
//! The in-memory store publishes a new snapshot on every successful mutation.
//! Readers clone the current snapshot's `Arc` and evaluate against it without
//! holding any lock.
//!
//! # Design Notes
//!
//! - **Copy-on-write**: a mutation copies the map, edits the copy and
//!   publishes it; a published map is never modified again
//! - **Immutable**: once handed out, a snapshot never changes underneath its holder
//! - **Thread-safe**: `Arc`-wrapped data can be shared across threads
//! - **Versioned**: the publish version travels with the data it describes,
//!   so a reader can never pair one version with another version's data

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use xrepo_core::{Identifiable, ReadRequest};

/// Immutable, versioned view of the stored entities
///
/// Iteration order is ascending id order. Cloning a snapshot is cheap
/// (one `Arc` increment).
///
/// # Example
///
/// ```ignore
/// let snapshot = repo.snapshot();
/// repo.create(entity)?;
///
/// // Writes after snapshot creation are not visible in the snapshot
/// assert!(snapshot.get(&entity_id).is_none());
/// ```
pub struct Snapshot<T: Identifiable> {
    version: u64,
    data: Arc<BTreeMap<T::Id, T>>,
}

impl<T: Identifiable> Snapshot<T> {
    /// Create a snapshot over `data`, published at `version`
    pub fn new(version: u64, data: BTreeMap<T::Id, T>) -> Self {
        Snapshot {
            version,
            data: Arc::new(data),
        }
    }

    /// The empty snapshot every store starts from (version 0)
    pub fn empty() -> Self {
        Self::new(0, BTreeMap::new())
    }

    /// Publish version this snapshot was created at
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the snapshot holds no entities
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the entity with `id`
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.data.get(id)
    }

    /// True if an entity with `id` is present
    pub fn contains(&self, id: &T::Id) -> bool {
        self.data.contains_key(id)
    }

    /// Entities in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.values()
    }

    /// Identifiers in ascending order
    pub fn ids(&self) -> impl Iterator<Item = &T::Id> + '_ {
        self.data.keys()
    }

    /// Owned copies of every entity
    pub fn to_vec(&self) -> Vec<T> {
        self.data.values().cloned().collect()
    }

    /// Run the read pipeline over owned copies of the entities
    pub fn query(&self, request: &ReadRequest<T>) -> Vec<T> {
        request.apply(self.data.values().cloned())
    }

    pub(crate) fn data(&self) -> &BTreeMap<T::Id, T> {
        &self.data
    }
}

impl<T: Identifiable> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Snapshot {
            version: self.version,
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Identifiable> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("version", &self.version)
            .field("len", &self.data.len())
            .finish()
    }
}
