//! Error types for xrepo
//!
//! Every backend maps its failures onto the kinds defined here, so calling
//! code can tell "already there" and "not there" apart from success no matter
//! which backend sits behind the contract.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::fmt::Debug;

use thiserror::Error;

use crate::namespace::{Namespace, NamespaceError};

/// Result type alias for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Backend-agnostic classification of a [`RepositoryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Create precondition violated
    AlreadyExists,
    /// Update/delete precondition violated
    NotFound,
    /// Storage-layer failure of a durable backend
    Unavailable,
    /// Namespace failed validation
    InvalidNamespace,
    /// Configuration could not be read or parsed
    Config,
}

/// Error types for repository operations
///
/// Identifiers are rendered with their `Debug` form so the error stays
/// independent of the entity type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// One or more entities with the same identity are already stored
    #[error("Already exists in '{namespace}': {ids:?}")]
    AlreadyExists {
        /// Namespace of the rejecting repository
        namespace: Namespace,
        /// Colliding identifiers
        ids: Vec<String>,
    },

    /// One or more target entities are not stored
    #[error("Not found in '{namespace}': {ids:?}")]
    NotFound {
        /// Namespace of the rejecting repository
        namespace: Namespace,
        /// Missing identifiers
        ids: Vec<String>,
    },

    /// Backend storage failure (never produced by the in-memory store)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Invalid namespace
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(#[from] NamespaceError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RepositoryError {
    /// Build an `AlreadyExists` error from the colliding identifiers
    pub fn already_exists<'a, I, Id>(namespace: &Namespace, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a Id>,
        Id: Debug + 'a,
    {
        RepositoryError::AlreadyExists {
            namespace: namespace.clone(),
            ids: render_ids(ids),
        }
    }

    /// Build a `NotFound` error from the missing identifiers
    pub fn not_found<'a, I, Id>(namespace: &Namespace, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a Id>,
        Id: Debug + 'a,
    {
        RepositoryError::NotFound {
            namespace: namespace.clone(),
            ids: render_ids(ids),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            RepositoryError::Unavailable(_) => ErrorKind::Unavailable,
            RepositoryError::InvalidNamespace(_) => ErrorKind::InvalidNamespace,
            RepositoryError::Config(_) => ErrorKind::Config,
        }
    }

    /// True if a create precondition was violated
    pub fn is_already_exists(&self) -> bool {
        self.kind() == ErrorKind::AlreadyExists
    }

    /// True if an update/delete precondition was violated
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// True for backend storage failures
    pub fn is_unavailable(&self) -> bool {
        self.kind() == ErrorKind::Unavailable
    }
}

fn render_ids<'a, I, Id>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Id>,
    Id: Debug + 'a,
{
    ids.into_iter().map(|id| format!("{:?}", id)).collect()
}
