//! Repository contract
//!
//! This module defines the `Repository` trait every backend implements. The
//! trait is the only thing application code depends on, so an in-memory
//! store can be swapped for a durable one without touching callers.
//!
//! # Contract
//!
//! - Reads never fail: missing data is `None` or an empty `Vec`.
//! - Mutations never silently no-op: a violated precondition is reported as
//!   `AlreadyExists` or `NotFound`.
//! - Batch mutations are all-or-nothing over the batch after collapsing
//!   duplicate identities.
//! - `get_elements` evaluates filter → sort → distinct (→ limit) in that order.
//!
//! The trait is object safe; callers may hold `Box<dyn Repository<T>>`.

use rustc_hash::FxHashSet;

use crate::error::RepositoryResult;
use crate::identity::Identifiable;
use crate::keys::{DistinctKey, SortKey};
use crate::namespace::Namespace;
use crate::pipeline::ReadRequest;
use crate::query::Query;

/// Body of a transaction
///
/// The body receives a transactional view of the repository. Every contract
/// operation on the view, including a nested `perform_transaction`, runs
/// inside the transaction that is already in progress.
pub type TransactionBody<'a, T> = dyn FnMut(&dyn Repository<T>) -> RepositoryResult<()> + 'a;

/// Uniform data-access contract over one entity type
///
/// Thread safety is up to the implementation; the in-memory store is
/// `Send + Sync` and may be shared behind an `Arc`.
pub trait Repository<T: Identifiable> {
    /// Storage slot this repository reads and writes
    fn namespace(&self) -> &Namespace;

    /// Every stored entity
    ///
    /// No ordering is promised by the contract; backends document their own.
    fn get_all(&self) -> Vec<T>;

    /// The entity with `id`, if stored
    fn get_element(&self, id: &T::Id) -> Option<T>;

    /// Entities passing the request's filter, sort, distinct and limit stages
    fn get_elements(&self, request: &ReadRequest<T>) -> Vec<T>;

    /// Insert a new entity
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if an entity with the same id is stored.
    fn create(&self, entity: T) -> RepositoryResult<T>;

    /// Insert a batch, all-or-nothing
    ///
    /// Duplicate ids inside the batch collapse onto their first occurrence.
    /// Returns the collapsed batch in input order.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` naming every colliding id; nothing is inserted.
    fn create_many(&self, entities: Vec<T>) -> RepositoryResult<Vec<T>>;

    /// Replace the stored entity with the same id
    ///
    /// # Errors
    ///
    /// `NotFound` if no entity with that id is stored.
    fn update(&self, entity: T) -> RepositoryResult<T>;

    /// Remove the entity with `id`
    ///
    /// # Errors
    ///
    /// `NotFound` if no entity with that id is stored.
    fn delete_by_id(&self, id: &T::Id) -> RepositoryResult<()>;

    /// Remove the stored entity sharing `entity`'s identity
    ///
    /// # Errors
    ///
    /// `NotFound` if no entity with that id is stored.
    fn delete(&self, entity: &T) -> RepositoryResult<()> {
        self.delete_by_id(&entity.id())
    }

    /// Remove a batch, all-or-nothing
    ///
    /// # Errors
    ///
    /// `NotFound` naming every missing id; nothing is removed.
    fn delete_many(&self, entities: &[T]) -> RepositoryResult<()>;

    /// Remove everything; always succeeds
    fn delete_all(&self) -> RepositoryResult<()>;

    /// Run `body` as a unit
    ///
    /// Backends serialize the body's writes against other writers. Durable
    /// backends may roll back on failure; the in-memory store does not.
    fn perform_transaction(&self, body: &mut TransactionBody<'_, T>) -> RepositoryResult<()>;

    /// Entities matching `query`
    fn filtered(&self, query: Query<T>) -> Vec<T> {
        self.get_elements(&ReadRequest::all().filtered_by(query))
    }

    /// Every entity, sorted by `key`
    fn sorted(&self, key: SortKey<T>) -> Vec<T> {
        self.get_elements(&ReadRequest::all().sorted_by(key))
    }

    /// One entity per `key` class
    fn distinct(&self, key: DistinctKey<T>) -> Vec<T> {
        self.get_elements(&ReadRequest::all().distinct_by(key))
    }

    /// Number of stored entities
    fn count(&self) -> usize {
        self.get_all().len()
    }

    /// True if an entity with `id` is stored
    fn contains(&self, id: &T::Id) -> bool {
        self.get_element(id).is_some()
    }
}

/// Collapse duplicate identities, keeping the first occurrence in order
pub fn dedup_by_id<T: Identifiable>(entities: Vec<T>) -> Vec<T> {
    let mut seen = FxHashSet::default();
    entities
        .into_iter()
        .filter(|entity| seen.insert(entity.id()))
        .collect()
}
