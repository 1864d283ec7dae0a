//! Concurrent Transaction Tests
//!
//! Transactions serialize against each other and against single mutations.

use crate::common::*;
use std::sync::Arc;

#[test]
fn read_modify_write_in_transactions_loses_no_updates() {
    let repo = shared_repo();
    repo.create(Employee::new("counter", 0)).unwrap();
    let worker_repo = Arc::clone(&repo);

    run_concurrent(8, move |_| {
        for _ in 0..25 {
            worker_repo
                .transaction(|txn| {
                    let current = txn.get_element(&"counter".to_string()).unwrap();
                    txn.update(Employee::new("counter", current.age + 1))?;
                    Ok(())
                })
                .unwrap();
        }
    });

    assert_eq!(repo.get_element(&"counter".to_string()).unwrap().age, 200);
    assert_eq!(repo.version(), 201);
}

#[test]
fn transactions_and_single_writes_interleave_safely() {
    let repo = shared_repo();
    let worker_repo = Arc::clone(&repo);

    run_concurrent(6, move |t| {
        for i in 0..20 {
            let name = format!("w{}-{}", t, i);
            if t % 2 == 0 {
                worker_repo.create(Employee::new(&name, i)).unwrap();
            } else {
                worker_repo
                    .perform_transaction(&mut |txn: &dyn Repository<Employee>| {
                        txn.create(Employee::new(&name, i))?;
                        txn.update(Employee::new(&name, i + 100))?;
                        Ok(())
                    })
                    .unwrap();
            }
        }
    });

    let all = repo.get_all();
    assert_eq!(all.len(), 120);
    assert_unique_ids(&all);
    assert_eq!(all.iter().filter(|e| e.age >= 100).count(), 60);
}

#[test]
fn transaction_events_arrive_in_publish_order() {
    let repo = shared_repo();
    let rx = repo.watch();
    let worker_repo = Arc::clone(&repo);

    run_concurrent(4, move |t| {
        for i in 0..10 {
            worker_repo
                .transaction(|txn| {
                    txn.create(Employee::new(&format!("t{}-{}", t, i), i))?;
                    Ok(())
                })
                .unwrap();
        }
    });

    let versions: Vec<u64> = rx.try_iter().map(|event| event.version).collect();
    assert_eq!(versions, (1..=40).collect::<Vec<u64>>());
}
