//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any test's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Barrier, Once};
use std::thread::{self, JoinHandle};

pub use xrepo::testing::{sample_employees, Employee, Operation, ReferenceModel};
pub use xrepo::{
    ChangeEvent, ChangeKind, DistinctKey, Identifiable, MemoryRepository, Namespace, Query,
    ReadRequest, Repository, RepositoryConfig, RepositoryError, SortKey,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (`RUST_LOG` filters it).
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A namespace unique within this test process.
pub fn unique_namespace(prefix: &str) -> Namespace {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    Namespace::new(format!("{}-{}", prefix, n)).unwrap()
}

// ============================================================================
// Repository Construction
// ============================================================================

/// Fresh, empty employee repository.
pub fn employee_repo() -> MemoryRepository<Employee> {
    init_tracing();
    MemoryRepository::new(unique_namespace("employees"))
}

/// Employee repository pre-filled with the sample employees.
pub fn seeded_repo() -> MemoryRepository<Employee> {
    let repo = employee_repo();
    repo.create_many(sample_employees()).unwrap();
    repo
}

/// Shared repository for multi-threaded tests.
pub fn shared_repo() -> Arc<MemoryRepository<Employee>> {
    Arc::new(employee_repo())
}

// ============================================================================
// Assertions
// ============================================================================

/// Names in result order.
pub fn names(items: &[Employee]) -> Vec<String> {
    items.iter().map(|e| e.name.clone()).collect()
}

/// Names, sorted, for order-insensitive comparison.
pub fn sorted_names(items: &[Employee]) -> Vec<String> {
    let mut out = names(items);
    out.sort();
    out
}

/// Assert that no two entities in `items` share an id.
pub fn assert_unique_ids(items: &[Employee]) {
    let mut ids = names(items);
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), before, "duplicate ids in {:?}", items);
}

// ============================================================================
// Concurrency Helpers
// ============================================================================

/// Spawn `threads` workers that start together, returning their results.
pub fn run_concurrent<F, R>(threads: usize, work: F) -> Vec<R>
where
    F: Fn(usize) -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    let barrier = Arc::new(Barrier::new(threads));
    let work = Arc::new(work);

    let handles: Vec<JoinHandle<R>> = (0..threads)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let work = Arc::clone(&work);
            thread::spawn(move || {
                barrier.wait();
                work(i)
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}
