//! Contract conformance checks
//!
//! Each check receives a freshly constructed, empty repository and panics on
//! the first contract violation. A backend passes when `run_contract_suite`
//! returns.

use std::collections::BTreeSet;

use crate::error::RepositoryError;
use crate::keys::{DistinctKey, SortKey};
use crate::pipeline::ReadRequest;
use crate::query::Query;
use crate::repository::Repository;
use crate::testing::{sample_employees, Employee};

type Check = fn(&dyn Repository<Employee>);

/// Every check, with its name
pub const CHECKS: &[(&str, Check)] = &[
    ("create_then_get", create_then_get),
    ("create_twice_fails", create_twice_fails),
    ("create_many_round_trips", create_many_round_trips),
    ("create_many_all_or_nothing", create_many_all_or_nothing),
    ("create_many_collapses_duplicates", create_many_collapses_duplicates),
    ("empty_batches_succeed", empty_batches_succeed),
    ("update_replaces", update_replaces),
    ("update_missing_fails", update_missing_fails),
    ("delete_missing_fails", delete_missing_fails),
    ("delete_many_all_or_nothing", delete_many_all_or_nothing),
    ("delete_all_idempotent", delete_all_idempotent),
    ("reads_on_empty_store", reads_on_empty_store),
    ("filter_sort_distinct_order", filter_sort_distinct_order),
    ("transaction_applies_body", transaction_applies_body),
    ("transaction_surfaces_body_error", transaction_surfaces_body_error),
    ("nested_transaction_runs_inline", nested_transaction_runs_inline),
];

/// Run every check against fresh repositories from `make`
pub fn run_contract_suite<F>(make: F)
where
    F: Fn() -> Box<dyn Repository<Employee>>,
{
    for (_, check) in CHECKS {
        let repo = make();
        check(repo.as_ref());
    }
}

fn ids(items: &[Employee]) -> BTreeSet<String> {
    items.iter().map(|e| e.name.clone()).collect()
}

/// `create(e)` then `get_element(e.id)` returns `e`
pub fn create_then_get(repo: &dyn Repository<Employee>) {
    let e = Employee::new("Zementha", 34);
    assert_eq!(repo.create(e.clone()).unwrap(), e);
    assert_eq!(repo.get_element(&"Zementha".to_string()), Some(e));
    assert!(repo.contains(&"Zementha".to_string()));
}

/// Second create of the same identity fails and keeps one copy
pub fn create_twice_fails(repo: &dyn Repository<Employee>) {
    let e = Employee::new("Torsten", 19);
    repo.create(e.clone()).unwrap();

    let err = repo.create(Employee::new("Torsten", 99)).unwrap_err();
    assert!(err.is_already_exists(), "unexpected error: {}", err);
    assert_eq!(repo.count(), 1);
    assert_eq!(repo.get_element(&"Torsten".to_string()), Some(e));
}

/// Batch create is visible as a set through `get_all`
pub fn create_many_round_trips(repo: &dyn Repository<Employee>) {
    let employees = sample_employees();
    let created = repo.create_many(employees.clone()).unwrap();
    assert_eq!(created, employees);
    assert_eq!(ids(&repo.get_all()), ids(&employees));
}

/// A batch with one collision inserts nothing
pub fn create_many_all_or_nothing(repo: &dyn Repository<Employee>) {
    repo.create(Employee::new("Sebi", 22)).unwrap();

    let err = repo
        .create_many(vec![Employee::new("Tim", 87), Employee::new("Sebi", 1)])
        .unwrap_err();
    match err {
        RepositoryError::AlreadyExists { ids, .. } => assert_eq!(ids, vec!["\"Sebi\"".to_string()]),
        other => panic!("expected AlreadyExists, got {:?}", other),
    }
    assert!(repo.get_element(&"Tim".to_string()).is_none());
    assert_eq!(repo.count(), 1);
}

/// Duplicate identities inside one batch collapse onto the first
pub fn create_many_collapses_duplicates(repo: &dyn Repository<Employee>) {
    let created = repo
        .create_many(vec![
            Employee::new("Torben", 21),
            Employee::new("Torben", 50),
            Employee::new("Struppi", 3),
        ])
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(repo.count(), 2);
    assert_eq!(repo.get_element(&"Torben".to_string()).unwrap().age, 21);

    repo.delete_many(&[Employee::new("Torben", 0), Employee::new("Torben", 0)])
        .unwrap();
    assert_eq!(repo.count(), 1);
}

/// Empty batches are a successful no-op
pub fn empty_batches_succeed(repo: &dyn Repository<Employee>) {
    assert!(repo.create_many(Vec::new()).unwrap().is_empty());
    repo.delete_many(&[]).unwrap();
    assert_eq!(repo.count(), 0);
}

/// Update replaces the stored value
pub fn update_replaces(repo: &dyn Repository<Employee>) {
    repo.create(Employee::new("Joan", 23)).unwrap();
    let updated = repo.update(Employee::new("Joan", 24)).unwrap();
    assert_eq!(updated.age, 24);
    assert_eq!(repo.get_element(&"Joan".to_string()).unwrap().age, 24);
    assert_eq!(repo.count(), 1);
}

/// Update of an absent identity fails
pub fn update_missing_fails(repo: &dyn Repository<Employee>) {
    let err = repo.update(Employee::new("Ghost", 1)).unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {}", err);
    assert_eq!(repo.count(), 0);
}

/// Delete of an absent identity fails and changes nothing
pub fn delete_missing_fails(repo: &dyn Repository<Employee>) {
    repo.create(Employee::new("Malte", 24)).unwrap();
    let err = repo.delete(&Employee::new("Ghost", 1)).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(repo.count(), 1);

    repo.delete(&Employee::new("Malte", 0)).unwrap();
    assert_eq!(repo.count(), 0);
    assert!(repo.delete_by_id(&"Malte".to_string()).unwrap_err().is_not_found());
}

/// A batch delete with one missing target removes nothing
pub fn delete_many_all_or_nothing(repo: &dyn Repository<Employee>) {
    repo.create_many(sample_employees()).unwrap();

    let err = repo
        .delete_many(&[Employee::new("Stefan", 0), Employee::new("Ghost", 0)])
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(repo.count(), 5);

    repo.delete_many(&[Employee::new("Stefan", 0), Employee::new("Sebi", 0)])
        .unwrap();
    assert_eq!(repo.count(), 3);
}

/// `delete_all` always succeeds, also on an empty store
pub fn delete_all_idempotent(repo: &dyn Repository<Employee>) {
    repo.create_many(sample_employees()).unwrap();
    repo.delete_all().unwrap();
    assert!(repo.get_all().is_empty());
    repo.delete_all().unwrap();
    assert!(repo.get_all().is_empty());
}

/// Reads on an empty store return nothing instead of failing
pub fn reads_on_empty_store(repo: &dyn Repository<Employee>) {
    assert!(repo.get_all().is_empty());
    assert!(repo.get_element(&"nobody".to_string()).is_none());
    let request = ReadRequest::all()
        .filtered_by(Query::all())
        .sorted_by(SortKey::ascending(|e: &Employee| e.age))
        .distinct_by(DistinctKey::new(|e: &Employee| e.age));
    assert!(repo.get_elements(&request).is_empty());
}

/// filter → sort → distinct, with first-wins after a stable sort
pub fn filter_sort_distinct_order(repo: &dyn Repository<Employee>) {
    repo.create_many(vec![
        Employee::new("A", 24),
        Employee::new("B", 24),
        Employee::new("C", 19),
    ])
    .unwrap();

    let request = ReadRequest::all()
        .sorted_by(SortKey::ascending(|e: &Employee| e.age))
        .distinct_by(DistinctKey::new(|e: &Employee| e.age));
    let out = repo.get_elements(&request);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].age, 19);
    assert_eq!(out[1].age, 24);

    let filtered = repo.filtered(Query::eq(|e: &Employee| e.age, 24));
    assert_eq!(ids(&filtered), ids(&[Employee::new("A", 0), Employee::new("B", 0)]));

    let sorted = repo.sorted(SortKey::descending(|e: &Employee| e.age));
    assert_eq!(sorted.last().map(|e| e.age), Some(19));

    assert_eq!(repo.distinct(DistinctKey::new(|e: &Employee| e.age)).len(), 2);
}

/// Writes made by the body are visible after the transaction
pub fn transaction_applies_body(repo: &dyn Repository<Employee>) {
    repo.perform_transaction(&mut |txn: &dyn Repository<Employee>| {
        txn.create(Employee::new("Quirin", 21))?;
        txn.create(Employee::new("Stefan", 24))?;
        assert_eq!(txn.count(), 2);
        txn.update(Employee::new("Stefan", 25))?;
        txn.delete(&Employee::new("Quirin", 0))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(repo.get_all(), vec![Employee::new("Stefan", 25)]);
}

/// A failing body's error is returned to the caller
pub fn transaction_surfaces_body_error(repo: &dyn Repository<Employee>) {
    repo.create(Employee::new("Sebi", 22)).unwrap();
    let err = repo
        .perform_transaction(&mut |txn: &dyn Repository<Employee>| {
            txn.create(Employee::new("Sebi", 22))?;
            Ok(())
        })
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(repo.count(), 1);
}

/// A transaction started from inside a body does not deadlock
pub fn nested_transaction_runs_inline(repo: &dyn Repository<Employee>) {
    repo.perform_transaction(&mut |outer: &dyn Repository<Employee>| {
        outer.create(Employee::new("Outer", 1))?;
        outer.perform_transaction(&mut |inner: &dyn Repository<Employee>| {
            assert!(inner.contains(&"Outer".to_string()));
            inner.create(Employee::new("Inner", 2)).map(|_| ())
        })
    })
    .unwrap();

    assert_eq!(repo.count(), 2);
}
