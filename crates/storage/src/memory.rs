//! MemoryRepository: concurrent in-memory backend
//!
//! This module implements the `Repository` contract using:
//! - `BTreeMap<Id, T>` snapshots published by `Arc` swap (copy-on-write)
//! - `parking_lot::Mutex<()>` granting exclusive mutation rights
//! - `parking_lot::RwLock<Snapshot<T>>` guarding only the pointer swap
//!
//! # Design Notes
//!
//! - **Serialized writers**: every mutation checks its precondition and
//!   publishes while holding the mutation lock, so check-then-act is atomic
//!   and two concurrent creates of one id can never both succeed
//! - **Lock-free reads**: readers clone the current snapshot and evaluate
//!   without any lock; they never wait for a writer's precondition checks
//! - **Whole-state publish**: a reader sees either all of a mutation or none
//!   of it, including every element of a batch
//! - **Ascending id order**: `get_all` and unsorted reads return entities in
//!   id order; a sort stage keeps that order among equal keys

use std::collections::BTreeMap;
use std::fmt;
use std::sync::mpsc::{self, Receiver};

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, trace};
use xrepo_core::{
    Identifiable, Namespace, ReadRequest, Repository, RepositoryResult, TransactionBody,
};

use crate::config::RepositoryConfig;
use crate::notify::{ChangeEvent, ChangeKind, ChangeNotifier, SubscriptionId};
use crate::snapshot::Snapshot;
use crate::working::WorkingSet;

/// In-memory repository for one entity type
///
/// Thread-safe: share it behind an `Arc` and call any operation from any
/// thread. Mutations are serialized; reads run concurrently with everything.
///
/// # Example
///
/// ```
/// use xrepo_core::testing::Employee;
/// use xrepo_core::{Namespace, Repository};
/// use xrepo_storage::MemoryRepository;
///
/// let repo = MemoryRepository::<Employee>::new(Namespace::new("employees").unwrap());
/// repo.create(Employee::new("Sebi", 22)).unwrap();
///
/// assert!(repo.create(Employee::new("Sebi", 30)).unwrap_err().is_already_exists());
/// assert_eq!(repo.version(), 1);
/// ```
pub struct MemoryRepository<T: Identifiable> {
    /// Storage slot owned by this repository
    namespace: Namespace,
    /// Exclusive mutation rights
    write_lock: Mutex<()>,
    /// Published snapshot
    current: RwLock<Snapshot<T>>,
    /// Change event subscribers
    notifier: ChangeNotifier<T::Id>,
    /// Deliver change events on publish
    change_events: bool,
}

impl<T: Identifiable> MemoryRepository<T> {
    /// Create an empty repository owning `namespace`
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            write_lock: Mutex::new(()),
            current: RwLock::new(Snapshot::empty()),
            notifier: ChangeNotifier::new(),
            change_events: true,
        }
    }

    /// Create an empty repository from configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidNamespace` if the configured namespace is malformed.
    pub fn with_config(config: &RepositoryConfig) -> RepositoryResult<Self> {
        let mut repo = Self::new(config.namespace()?);
        repo.change_events = config.change_events;
        Ok(repo)
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Snapshot<T> {
        self.current.read().clone()
    }

    /// Number of snapshots published so far
    pub fn version(&self) -> u64 {
        self.current.read().version()
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    /// True if publishes are announced to subscribers
    pub fn change_events_enabled(&self) -> bool {
        self.change_events
    }

    /// Call `callback` for every future published mutation
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent<T::Id>) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Stop calling a subscribed callback
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Receive every future change event over a channel
    ///
    /// With change events disabled nothing is registered and the returned
    /// receiver is already disconnected.
    pub fn watch(&self) -> Receiver<ChangeEvent<T::Id>> {
        if !self.change_events {
            let (_, rx) = mpsc::channel();
            return rx;
        }
        self.notifier.watch()
    }

    /// Number of registered callbacks and watch channels
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    /// Take exclusive mutation rights and the snapshot they apply to
    pub(crate) fn begin_write(&self) -> (MutexGuard<'_, ()>, Snapshot<T>) {
        let guard = self.write_lock.lock();
        let base = self.snapshot();
        (guard, base)
    }

    /// Install `data` as the next snapshot and announce it
    ///
    /// Only callable while holding the mutation lock taken together with `base`.
    pub(crate) fn publish(
        &self,
        _guard: &MutexGuard<'_, ()>,
        base: &Snapshot<T>,
        data: BTreeMap<T::Id, T>,
        kind: ChangeKind<T::Id>,
        operation: &'static str,
    ) -> u64 {
        let version = base.version() + 1;
        let len = data.len();
        *self.current.write() = Snapshot::new(version, data);

        debug!(
            target: "xrepo::store",
            namespace = %self.namespace,
            version,
            len,
            operation,
            "Published snapshot"
        );

        if self.change_events {
            self.notifier.notify(&ChangeEvent {
                namespace: self.namespace.clone(),
                version,
                kind,
            });
        }
        version
    }

    /// Run one contract mutation against a working copy and publish it
    fn mutate<R, F>(&self, operation: &'static str, f: F) -> RepositoryResult<R>
    where
        F: FnOnce(&mut WorkingSet<'_, T>) -> RepositoryResult<R>,
    {
        let (guard, base) = self.begin_write();
        let mut working = WorkingSet::new(&self.namespace, base.data());

        match f(&mut working) {
            Ok(value) => {
                if let Some((data, changes)) = working.into_parts() {
                    self.publish(&guard, &base, data, changes.into_single_kind(), operation);
                }
                Ok(value)
            }
            Err(e) => {
                debug!(
                    target: "xrepo::store",
                    namespace = %self.namespace,
                    operation,
                    error = %e,
                    "Mutation rejected"
                );
                Err(e)
            }
        }
    }
}

impl<T: Identifiable> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new(Namespace::default())
    }
}

impl<T: Identifiable> fmt::Debug for MemoryRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.read();
        f.debug_struct("MemoryRepository")
            .field("namespace", &self.namespace)
            .field("version", &current.version())
            .field("len", &current.len())
            .field("change_events", &self.change_events)
            .finish()
    }
}

impl<T: Identifiable> Repository<T> for MemoryRepository<T> {
    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn get_all(&self) -> Vec<T> {
        let snapshot = self.snapshot();
        trace!(target: "xrepo::store", namespace = %self.namespace, version = snapshot.version(), "get_all");
        snapshot.to_vec()
    }

    fn get_element(&self, id: &T::Id) -> Option<T> {
        self.snapshot().get(id).cloned()
    }

    fn get_elements(&self, request: &ReadRequest<T>) -> Vec<T> {
        let snapshot = self.snapshot();
        let out = snapshot.query(request);
        trace!(
            target: "xrepo::store",
            namespace = %self.namespace,
            version = snapshot.version(),
            scanned = snapshot.len(),
            results = out.len(),
            "get_elements"
        );
        out
    }

    fn create(&self, entity: T) -> RepositoryResult<T> {
        self.mutate("create", |working| working.create(entity))
    }

    fn create_many(&self, entities: Vec<T>) -> RepositoryResult<Vec<T>> {
        self.mutate("create_many", |working| working.create_many(entities))
    }

    fn update(&self, entity: T) -> RepositoryResult<T> {
        self.mutate("update", |working| working.update(entity))
    }

    fn delete_by_id(&self, id: &T::Id) -> RepositoryResult<()> {
        self.mutate("delete", |working| working.delete_by_id(id))
    }

    fn delete_many(&self, entities: &[T]) -> RepositoryResult<()> {
        self.mutate("delete_many", |working| working.delete_many(entities))
    }

    fn delete_all(&self) -> RepositoryResult<()> {
        self.mutate("delete_all", |working| {
            working.delete_all();
            Ok(())
        })
    }

    fn perform_transaction(&self, body: &mut TransactionBody<'_, T>) -> RepositoryResult<()> {
        self.transaction(|txn| {
            let view: &dyn Repository<T> = txn;
            body(view)
        })
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn contains(&self, id: &T::Id) -> bool {
        self.current.read().contains(id)
    }
}
