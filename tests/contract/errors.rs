//! Error Reporting Tests
//!
//! Precondition failures carry the namespace and every offending id.

use crate::common::*;
use xrepo::ErrorKind;

#[test]
fn already_exists_names_namespace_and_ids() {
    let repo = MemoryRepository::<Employee>::new(Namespace::new("hr").unwrap());
    repo.create_many(sample_employees()).unwrap();

    let err = repo
        .create_many(vec![
            Employee::new("Joan", 1),
            Employee::new("Tim", 2),
            Employee::new("Malte", 3),
        ])
        .unwrap_err();

    match &err {
        RepositoryError::AlreadyExists { namespace, ids } => {
            assert_eq!(namespace.as_str(), "hr");
            assert_eq!(ids, &vec!["\"Joan\"".to_string(), "\"Malte\"".to_string()]);
        }
        other => panic!("Wrong error variant: {:?}", other),
    }
    assert!(err.to_string().contains("hr"));
    assert!(repo.get_element(&"Tim".to_string()).is_none());
}

#[test]
fn not_found_for_update_and_delete() {
    let repo = employee_repo();
    assert_eq!(
        repo.update(Employee::new("Ghost", 1)).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        repo.delete(&Employee::new("Ghost", 1)).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        repo.delete_by_id(&"Ghost".to_string()).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn errors_are_cloneable_and_comparable() {
    let repo = seeded_repo();
    let first = repo.create(Employee::new("Sebi", 22)).unwrap_err();
    let second = repo.create(Employee::new("Sebi", 22)).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(first.clone(), first);
}

#[test]
fn invalid_namespace_in_config() {
    let err = MemoryRepository::<Employee>::with_config(&RepositoryConfig::with_namespace(
        "has space",
    ))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidNamespace);
}
