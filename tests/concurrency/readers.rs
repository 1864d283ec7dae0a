//! Concurrent Reader Tests
//!
//! Readers observe whole published states and never wait on writers.

use crate::common::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

// ============================================================================
// Whole-State Visibility
// ============================================================================

#[test]
fn readers_never_see_partial_batches() {
    let repo = shared_repo();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let repo = Arc::clone(&repo);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let len = repo.get_all().len();
                    assert_eq!(len % 10, 0, "observed a partial batch of {}", len);
                }
            })
        })
        .collect();

    for round in 0..20 {
        let batch: Vec<Employee> = (0..10)
            .map(|i| Employee::new(&format!("r{}-{}", round, i), i))
            .collect();
        repo.create_many(batch.clone()).unwrap();
        if round % 3 == 2 {
            repo.delete_many(&batch).unwrap();
        }
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn snapshot_version_and_contents_agree() {
    let repo = shared_repo();
    let writer = {
        let repo = Arc::clone(&repo);
        thread::spawn(move || {
            for i in 0..200 {
                repo.create(Employee::new(&format!("e{:03}", i), i)).unwrap();
            }
        })
    };

    // one create per version, so version and length move together
    for _ in 0..500 {
        let snapshot = repo.snapshot();
        assert_eq!(snapshot.version() as usize, snapshot.len());
    }
    writer.join().unwrap();
    assert_eq!(repo.snapshot().len(), 200);
}

#[test]
fn held_snapshot_is_unaffected_by_writes() {
    let repo = seeded_repo();
    let snapshot = repo.snapshot();

    repo.delete_all().unwrap();
    repo.create(Employee::new("Tim", 87)).unwrap();

    assert_eq!(snapshot.len(), 5);
    assert!(!snapshot.contains(&"Tim".to_string()));
    assert_eq!(repo.count(), 1);
}

// ============================================================================
// Readers Do Not Block
// ============================================================================

#[test]
fn reads_proceed_while_a_transaction_is_open() {
    let repo = Arc::new(seeded_repo());
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let writer = {
        let repo = Arc::clone(&repo);
        thread::spawn(move || {
            repo.transaction(|txn| {
                txn.delete_all()?;
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                Ok(())
            })
            .unwrap();
        })
    };

    entered_rx.recv().unwrap();
    // the transaction holds exclusive mutation rights, but reads still answer
    assert_eq!(repo.count(), 5);
    assert_eq!(repo.get_all().len(), 5);
    release_tx.send(()).unwrap();

    writer.join().unwrap();
    assert!(repo.is_empty());
}
