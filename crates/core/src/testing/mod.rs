//! Testing utilities shared by every backend
//!
//! - **Employee**: small fixture entity used across test suites
//! - **Reference Model**: sequential model for expected-state tracking
//! - **Conformance**: contract checks any `Repository` implementation must pass
//!
//! # Example
//!
//! ```ignore
//! use xrepo_core::testing::{conformance, Employee};
//!
//! conformance::run_contract_suite(|| Box::new(MyBackend::<Employee>::new()));
//! ```

pub mod conformance;
mod reference_model;

pub use reference_model::{Operation, ReferenceModel};

use serde::{Deserialize, Serialize};

use crate::identity::Identifiable;

/// Fixture entity: identity is the name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employee {
    /// Name, doubling as the id
    pub name: String,
    /// Age in years
    pub age: u32,
}

impl Employee {
    /// Create a fixture employee
    pub fn new(name: &str, age: u32) -> Self {
        Employee {
            name: name.to_string(),
            age,
        }
    }
}

impl Identifiable for Employee {
    type Id = String;

    fn id(&self) -> String {
        self.name.clone()
    }
}

/// The five employees used throughout the suites
pub fn sample_employees() -> Vec<Employee> {
    vec![
        Employee::new("Quirin", 21),
        Employee::new("Stefan", 24),
        Employee::new("Sebi", 22),
        Employee::new("Malte", 24),
        Employee::new("Joan", 23),
    ]
}
