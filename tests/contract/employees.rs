//! Employee Scenarios
//!
//! End-to-end read/write scenarios over the five sample employees.

use crate::common::*;

// ============================================================================
// Writes
// ============================================================================

#[test]
fn add_one_element() {
    let repo = employee_repo();
    let tim = Employee::new("Tim", 87);
    repo.create(tim.clone()).unwrap();
    assert_eq!(repo.get_all(), vec![tim]);
}

#[test]
fn add_many_elements() {
    let repo = seeded_repo();
    assert_eq!(sorted_names(&repo.get_all()), sorted_names(&sample_employees()));
}

#[test]
fn add_same_element_twice_is_rejected() {
    let repo = seeded_repo();
    let err = repo.create(Employee::new("Quirin", 21)).unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(repo.count(), 5);
}

#[test]
fn update_element() {
    let repo = seeded_repo();
    repo.update(Employee::new("Quirin", 22)).unwrap();
    assert_eq!(repo.get_element(&"Quirin".to_string()).unwrap().age, 22);
}

#[test]
fn delete_element() {
    let repo = seeded_repo();
    repo.delete(&Employee::new("Stefan", 24)).unwrap();
    assert!(repo.get_element(&"Stefan".to_string()).is_none());
    assert_eq!(repo.count(), 4);
}

#[test]
fn delete_many_elements() {
    let repo = seeded_repo();
    repo.delete_many(&[Employee::new("Sebi", 22), Employee::new("Malte", 24)])
        .unwrap();
    assert_eq!(names(&repo.get_all()), ["Joan", "Quirin", "Stefan"]);
}

#[test]
fn delete_all_elements() {
    let repo = seeded_repo();
    repo.delete_all().unwrap();
    assert!(repo.get_all().is_empty());
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn get_element_by_id() {
    let repo = seeded_repo();
    assert_eq!(
        repo.get_element(&"Joan".to_string()),
        Some(Employee::new("Joan", 23))
    );
    assert_eq!(repo.get_element(&"Torben".to_string()), None);
}

#[test]
fn filter_by_predicate() {
    let repo = seeded_repo();
    let out = repo.filtered(Query::eq(|e: &Employee| e.age, 24));
    assert_eq!(sorted_names(&out), ["Malte", "Stefan"]);
}

#[test]
fn sort_ascending_and_descending() {
    let repo = seeded_repo();
    let ascending = repo.sorted(SortKey::ascending(|e: &Employee| e.age));
    let ages: Vec<u32> = ascending.iter().map(|e| e.age).collect();
    assert_eq!(ages, [21, 22, 23, 24, 24]);

    let descending = repo.sorted(SortKey::ascending(|e: &Employee| e.age).reversed());
    let ages: Vec<u32> = descending.iter().map(|e| e.age).collect();
    assert_eq!(ages, [24, 24, 23, 22, 21]);
}

#[test]
fn distinct_by_age() {
    let repo = seeded_repo();
    let out = repo.distinct(DistinctKey::new(|e: &Employee| e.age));
    assert_eq!(out.len(), 4);
    assert_unique_ids(&out);
}

#[test]
fn filter_sort_and_distinct_combined() {
    let repo = seeded_repo();
    let request = ReadRequest::all()
        .filtered_by(Query::gt(|e: &Employee| e.age, 21))
        .sorted_by(SortKey::descending(|e: &Employee| e.age).then(SortKey::ascending(
            |e: &Employee| e.name.clone(),
        )))
        .distinct_by(DistinctKey::new(|e: &Employee| e.age));

    assert_eq!(names(&repo.get_elements(&request)), ["Malte", "Joan", "Sebi"]);
}

#[test]
fn namespace_is_reported() {
    let repo = MemoryRepository::<Employee>::new(Namespace::new("staff").unwrap());
    assert_eq!(Repository::namespace(&repo).as_str(), "staff");
}
