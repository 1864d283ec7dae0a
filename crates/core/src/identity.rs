//! Entity identity
//!
//! A stored entity is a member of a set whose membership is decided by its
//! identifier alone: two entities with equal ids are the same member, no
//! matter what their other fields hold.

use std::fmt::Debug;
use std::hash::Hash;

/// Bounds every entity identifier must satisfy
///
/// Identifiers are hashable (for distinct/grouping and hash-based backends)
/// and totally ordered (for the ordered in-memory store and deterministic
/// iteration). Blanket-implemented for every type meeting the bounds.
pub trait EntityId: Clone + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

impl<T> EntityId for T where T: Clone + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

/// An entity with a unique, statically typed identifier
///
/// # Example
///
/// ```
/// use xrepo_core::Identifiable;
///
/// #[derive(Clone)]
/// struct Employee {
///     name: String,
///     age: u32,
/// }
///
/// impl Identifiable for Employee {
///     type Id = String;
///
///     fn id(&self) -> String {
///         self.name.clone()
///     }
/// }
/// ```
pub trait Identifiable: Clone + Send + Sync + 'static {
    /// Identifier type
    type Id: EntityId;

    /// The entity's identifier
    fn id(&self) -> Self::Id;
}
