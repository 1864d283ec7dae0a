//! Conformance Suite
//!
//! Runs the shared contract checks against the in-memory backend, once as a
//! whole and once per check so a failure names the violated rule.

use crate::common::*;
use xrepo::testing::conformance::{self, CHECKS};

fn boxed() -> Box<dyn Repository<Employee>> {
    Box::new(employee_repo())
}

#[test]
fn memory_repository_passes_full_suite() {
    conformance::run_contract_suite(boxed);
}

#[test]
fn every_check_passes_on_a_fresh_repository() {
    for (name, check) in CHECKS {
        let repo = boxed();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| check(repo.as_ref())));
        assert!(outcome.is_ok(), "contract check '{}' failed", name);
    }
}

#[test]
fn suite_covers_every_mutation() {
    let names: Vec<&str> = CHECKS.iter().map(|(name, _)| *name).collect();
    for expected in [
        "create_twice_fails",
        "create_many_all_or_nothing",
        "update_missing_fails",
        "delete_missing_fails",
        "delete_many_all_or_nothing",
        "delete_all_idempotent",
        "transaction_applies_body",
    ] {
        assert!(names.contains(&expected), "missing check {}", expected);
    }
}
