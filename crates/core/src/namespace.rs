//! Storage namespace type
//!
//! Every repository instance owns exactly one storage slot. Instead of
//! deriving the slot from the entity's type name, callers pass a `Namespace`
//! explicitly when constructing a repository. The namespace shows up in
//! change events, error messages and log fields.
//!
//! ## Validation
//!
//! Namespaces must:
//! - Be 1-128 characters
//! - Contain only alphanumeric, dash, underscore, dot, colon
//! - Not start with a dash, dot or colon

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a namespace
pub const MAX_NAMESPACE_LENGTH: usize = 128;

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "default";

/// Explicit storage-slot identifier for a repository
///
/// ## Examples
///
/// Valid namespaces:
/// - "employees"
/// - "app:users.v2"
/// - "_scratch"
///
/// Invalid namespaces:
/// - "" (empty)
/// - "-leading-dash"
/// - "has spaces"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

/// Error when validating a namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// Namespace is empty
    Empty,
    /// Namespace exceeds maximum length
    TooLong {
        /// Actual length of the namespace
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Namespace contains an invalid character
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position of the invalid character
        position: usize,
    },
    /// Namespace starts with an invalid character
    InvalidStart {
        /// The invalid starting character
        char: char,
    },
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceError::Empty => write!(f, "namespace cannot be empty"),
            NamespaceError::TooLong { length, max } => {
                write!(f, "namespace too long: {} chars (max {})", length, max)
            }
            NamespaceError::InvalidChar { char, position } => write!(
                f,
                "invalid character '{}' at position {} (only alphanumeric, dash, underscore, dot, colon allowed)",
                char, position
            ),
            NamespaceError::InvalidStart { char } => write!(
                f,
                "namespace cannot start with '{}' (must start with alphanumeric or underscore)",
                char
            ),
        }
    }
}

impl std::error::Error for NamespaceError {}

impl Namespace {
    /// Create a new Namespace, validating the input
    ///
    /// # Errors
    ///
    /// Returns `NamespaceError` if the name is invalid.
    pub fn new(name: impl Into<String>) -> Result<Self, NamespaceError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Namespace(name))
    }

    /// Validate a namespace string
    pub fn validate(name: &str) -> Result<(), NamespaceError> {
        let first = match name.chars().next() {
            Some(c) => c,
            None => return Err(NamespaceError::Empty),
        };

        if name.len() > MAX_NAMESPACE_LENGTH {
            return Err(NamespaceError::TooLong {
                length: name.len(),
                max: MAX_NAMESPACE_LENGTH,
            });
        }

        if !first.is_ascii_alphanumeric() && first != '_' {
            return Err(NamespaceError::InvalidStart { char: first });
        }

        for (position, ch) in name.chars().enumerate() {
            if !Self::is_valid_char(ch) {
                return Err(NamespaceError::InvalidChar { char: ch, position });
            }
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')
    }

    /// Get the namespace as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace(DEFAULT_NAMESPACE.to_string())
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = NamespaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Namespace::new(value)
    }
}

impl TryFrom<&str> for Namespace {
    type Error = NamespaceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Namespace::new(value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

// ============================================================================
// Tests
// ============================================================================
