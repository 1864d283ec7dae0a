//! Transactions over the in-memory store
//!
//! A transaction takes exclusive mutation rights once, runs its body against a
//! private working copy and publishes that copy as a single snapshot when the
//! body returns.
//!
//! # Semantics
//!
//! - Reads inside the body see the body's own writes.
//! - Readers outside the transaction see the state before it or after it,
//!   never anything in between.
//! - Other writers block until the transaction is published.
//! - Writes made before a failing step are still published; the body's error
//!   is returned to the caller. There is no rollback.
//! - A panicking body publishes nothing.
//! - `perform_transaction` on the transaction view runs the nested body
//!   inline, inside the transaction already in progress.

use std::cell::RefCell;

use tracing::{debug, warn};
use xrepo_core::{Identifiable, Namespace, ReadRequest, Repository, RepositoryResult, TransactionBody};

use crate::memory::MemoryRepository;
use crate::notify::ChangeKind;
use crate::working::WorkingSet;

/// Transactional view handed to a transaction body
///
/// Implements the full `Repository` contract against the transaction's
/// working copy. Not `Sync`: the view belongs to the thread running the body.
pub struct TransactionContext<'a, T: Identifiable> {
    namespace: &'a Namespace,
    working: RefCell<WorkingSet<'a, T>>,
}

impl<'a, T: Identifiable> TransactionContext<'a, T> {
    fn new(namespace: &'a Namespace, working: WorkingSet<'a, T>) -> Self {
        TransactionContext {
            namespace,
            working: RefCell::new(working),
        }
    }

    fn into_working(self) -> WorkingSet<'a, T> {
        self.working.into_inner()
    }

    /// Owned copies of the working state, taken without holding the borrow
    /// while the caller processes them
    fn cloned_values(&self) -> Vec<T> {
        self.working.borrow().values().cloned().collect()
    }
}

impl<'a, T: Identifiable> Repository<T> for TransactionContext<'a, T> {
    fn namespace(&self) -> &Namespace {
        self.namespace
    }

    fn get_all(&self) -> Vec<T> {
        self.cloned_values()
    }

    fn get_element(&self, id: &T::Id) -> Option<T> {
        self.working.borrow().get(id).cloned()
    }

    fn get_elements(&self, request: &ReadRequest<T>) -> Vec<T> {
        request.apply(self.cloned_values())
    }

    fn create(&self, entity: T) -> RepositoryResult<T> {
        self.working.borrow_mut().create(entity)
    }

    fn create_many(&self, entities: Vec<T>) -> RepositoryResult<Vec<T>> {
        self.working.borrow_mut().create_many(entities)
    }

    fn update(&self, entity: T) -> RepositoryResult<T> {
        self.working.borrow_mut().update(entity)
    }

    fn delete_by_id(&self, id: &T::Id) -> RepositoryResult<()> {
        self.working.borrow_mut().delete_by_id(id)
    }

    fn delete_many(&self, entities: &[T]) -> RepositoryResult<()> {
        self.working.borrow_mut().delete_many(entities)
    }

    fn delete_all(&self) -> RepositoryResult<()> {
        self.working.borrow_mut().delete_all();
        Ok(())
    }

    fn perform_transaction(&self, body: &mut TransactionBody<'_, T>) -> RepositoryResult<()> {
        let view: &dyn Repository<T> = self;
        body(view)
    }

    fn count(&self) -> usize {
        self.working.borrow().len()
    }

    fn contains(&self, id: &T::Id) -> bool {
        self.working.borrow().contains(id)
    }
}

impl<T: Identifiable> MemoryRepository<T> {
    /// Run `body` as one transaction and return its value
    ///
    /// Every write the body makes is published as one snapshot with one
    /// `ChangeKind::Transaction` event. See the module docs for failure
    /// semantics.
    ///
    /// # Example
    ///
    /// ```
    /// use xrepo_core::testing::Employee;
    /// use xrepo_core::Repository;
    /// use xrepo_storage::MemoryRepository;
    ///
    /// let repo = MemoryRepository::<Employee>::default();
    /// let total = repo
    ///     .transaction(|txn| {
    ///         txn.create(Employee::new("Quirin", 21))?;
    ///         txn.create(Employee::new("Joan", 23))?;
    ///         Ok(txn.get_all().iter().map(|e| e.age).sum::<u32>())
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(total, 44);
    /// assert_eq!(repo.version(), 1);
    /// ```
    pub fn transaction<R, F>(&self, body: F) -> RepositoryResult<R>
    where
        F: FnOnce(&TransactionContext<'_, T>) -> RepositoryResult<R>,
    {
        let namespace = Repository::namespace(self);
        let (guard, base) = self.begin_write();
        debug!(
            target: "xrepo::txn",
            namespace = %namespace,
            base_version = base.version(),
            "Transaction started"
        );

        let context = TransactionContext::new(namespace, WorkingSet::new(namespace, base.data()));
        let result = body(&context);

        match context.into_working().into_parts() {
            Some((data, changes)) => {
                if let Err(e) = &result {
                    warn!(
                        target: "xrepo::txn",
                        namespace = %namespace,
                        error = %e,
                        created = changes.created.len(),
                        updated = changes.updated.len(),
                        deleted = changes.deleted.len(),
                        "Transaction body failed after partial writes; publishing them"
                    );
                }
                self.publish(&guard, &base, data, ChangeKind::Transaction(changes), "transaction");
            }
            None => {
                debug!(
                    target: "xrepo::txn",
                    namespace = %namespace,
                    ok = result.is_ok(),
                    "Transaction made no writes"
                );
            }
        }

        result
    }
}
