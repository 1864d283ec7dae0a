//! Change notifications
//!
//! A repository can announce every published mutation to interested parties,
//! either through callbacks or through `std::sync::mpsc` channels.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let id = repo.subscribe(|event| println!("v{}: {:?}", event.version, event.kind));
//! let rx = repo.watch();
//!
//! repo.create(entity)?;
//! let event = rx.recv()?;
//!
//! repo.unsubscribe(id);
//! ```
//!
//! Events are delivered after the new snapshot is published and before the
//! mutating call returns, so delivery order matches publish order. Callbacks
//! run on the mutating thread while it still holds exclusive mutation rights:
//! a callback must not mutate the repository that invoked it, and a slow
//! callback delays every writer. Hand heavy work to a `watch` channel.
//!
//! A panicking callback is contained and logged; the mutation that published
//! the event still returns its result.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{trace, warn};
use xrepo_core::{EntityId, Namespace};

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Identifiers touched by a published mutation
///
/// When `cleared` is set, the store was emptied first and the remaining lists
/// describe what happened afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet<Id> {
    /// Store was emptied
    pub cleared: bool,
    /// Created identifiers, in order
    pub created: Vec<Id>,
    /// Updated identifiers, in order
    pub updated: Vec<Id>,
    /// Deleted identifiers, in order
    pub deleted: Vec<Id>,
}

impl<Id> Default for ChangeSet<Id> {
    fn default() -> Self {
        ChangeSet {
            cleared: false,
            created: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

impl<Id> ChangeSet<Id> {
    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        !self.cleared && self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Forget everything recorded so far and mark the store as emptied
    pub(crate) fn record_clear(&mut self) {
        self.cleared = true;
        self.created.clear();
        self.updated.clear();
        self.deleted.clear();
    }

    /// Collapse the change set of a single contract operation
    pub(crate) fn into_single_kind(self) -> ChangeKind<Id> {
        if self.cleared {
            ChangeKind::Cleared
        } else if !self.created.is_empty() {
            ChangeKind::Created(self.created)
        } else if !self.updated.is_empty() {
            ChangeKind::Updated(self.updated)
        } else {
            ChangeKind::Deleted(self.deleted)
        }
    }
}

/// What a published mutation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind<Id> {
    /// `create` or `create_many`
    Created(Vec<Id>),
    /// `update`
    Updated(Vec<Id>),
    /// `delete`, `delete_by_id` or `delete_many`
    Deleted(Vec<Id>),
    /// `delete_all` on a non-empty store
    Cleared,
    /// Everything a transaction body did, published once
    Transaction(ChangeSet<Id>),
}

/// Notification about one published snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent<Id> {
    /// Namespace of the publishing repository
    pub namespace: Namespace,
    /// Version of the published snapshot
    pub version: u64,
    /// What changed
    pub kind: ChangeKind<Id>,
}

type Callback<Id> = Arc<dyn Fn(&ChangeEvent<Id>) + Send + Sync>;

/// Callback and channel registry for change events
pub struct ChangeNotifier<Id: EntityId> {
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(SubscriptionId, Callback<Id>)>>,
    channels: Mutex<Vec<Sender<ChangeEvent<Id>>>>,
}

impl<Id: EntityId> ChangeNotifier<Id> {
    /// Create a notifier with no subscribers
    pub fn new() -> Self {
        ChangeNotifier {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(Vec::new()),
            channels: Mutex::new(Vec::new()),
        }
    }

    /// Register a callback
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent<Id>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks.write().push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(sub, _)| *sub != id);
        callbacks.len() != before
    }

    /// Open a channel receiving every future event
    ///
    /// Dropping the receiver unsubscribes it at the next delivery.
    pub fn watch(&self) -> Receiver<ChangeEvent<Id>> {
        let (tx, rx) = mpsc::channel();
        self.channels.lock().push(tx);
        rx
    }

    /// Number of live callbacks and channels
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.read().len() + self.channels.lock().len()
    }

    /// Deliver `event` to every subscriber
    pub fn notify(&self, event: &ChangeEvent<Id>) {
        // Callbacks run without the registry lock so they may (un)subscribe
        let callbacks: Vec<(SubscriptionId, Callback<Id>)> = self
            .callbacks
            .read()
            .iter()
            .map(|(id, cb)| (*id, Arc::clone(cb)))
            .collect();
        for (id, callback) in &callbacks {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
                warn!(
                    target: "xrepo::notify",
                    namespace = %event.namespace,
                    version = event.version,
                    subscription = id.0,
                    panic = panic_message(payload.as_ref()),
                    "Change callback panicked"
                );
            }
        }

        let mut channels = self.channels.lock();
        let before = channels.len();
        channels.retain(|tx| tx.send(event.clone()).is_ok());
        if channels.len() != before {
            trace!(
                target: "xrepo::notify",
                namespace = %event.namespace,
                dropped = before - channels.len(),
                "Pruned disconnected change watchers"
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}

impl<Id: EntityId> Default for ChangeNotifier<Id> {
    fn default() -> Self {
        Self::new()
    }
}
