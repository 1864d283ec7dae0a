//! Backend-agnostic query predicates
//!
//! A `Query<T>` is a pure boolean test over an entity. Queries compose only
//! through logical combination (and/or/not), so every backend can evaluate
//! them without backend-specific syntax.
//!
//! # Design Notes
//!
//! - **Shared closure**: the predicate lives behind an `Arc`, so cloning a
//!   query is cheap and a query can be evaluated from many threads at once.
//! - **No side effects**: predicates must be a pure function of the entity;
//!   the read pipeline may evaluate them in any order, any number of times.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

type Predicate<T> = dyn Fn(&T) -> bool + Send + Sync;

/// Composable boolean test over an entity
///
/// # Example
///
/// ```
/// use xrepo_core::Query;
///
/// struct Employee {
///     name: String,
///     age: u32,
/// }
///
/// let adults = Query::ge(|e: &Employee| e.age, 18);
/// let not_bob = !Query::eq(|e: &Employee| e.name.clone(), "Bob".to_string());
/// let query = adults & not_bob;
///
/// let alice = Employee { name: "Alice".into(), age: 30 };
/// assert!(query.evaluate(&alice));
/// ```
pub struct Query<T> {
    predicate: Arc<Predicate<T>>,
}

impl<T: 'static> Query<T> {
    /// Create a query from a predicate closure
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Query {
            predicate: Arc::new(predicate),
        }
    }

    /// Query matching every entity
    pub fn all() -> Self {
        Query::new(|_| true)
    }

    /// Query matching no entity
    pub fn none() -> Self {
        Query::new(|_| false)
    }

    /// Evaluate the query against one entity
    #[inline]
    pub fn evaluate(&self, item: &T) -> bool {
        (self.predicate)(item)
    }

    /// Both queries must match
    pub fn and(self, other: Query<T>) -> Self {
        Query::new(move |item| self.evaluate(item) && other.evaluate(item))
    }

    /// Either query must match
    pub fn or(self, other: Query<T>) -> Self {
        Query::new(move |item| self.evaluate(item) || other.evaluate(item))
    }

    /// Invert the query
    pub fn negate(self) -> Self {
        Query::new(move |item| !self.evaluate(item))
    }

    /// Projected field equals `value`
    pub fn eq<K, P>(projection: P, value: K) -> Self
    where
        P: Fn(&T) -> K + Send + Sync + 'static,
        K: PartialEq + Send + Sync + 'static,
    {
        Query::new(move |item| projection(item) == value)
    }

    /// Projected field differs from `value`
    pub fn ne<K, P>(projection: P, value: K) -> Self
    where
        P: Fn(&T) -> K + Send + Sync + 'static,
        K: PartialEq + Send + Sync + 'static,
    {
        Query::new(move |item| projection(item) != value)
    }

    /// Projected field is strictly less than `value`
    pub fn lt<K, P>(projection: P, value: K) -> Self
    where
        P: Fn(&T) -> K + Send + Sync + 'static,
        K: PartialOrd + Send + Sync + 'static,
    {
        Query::new(move |item| projection(item) < value)
    }

    /// Projected field is less than or equal to `value`
    pub fn le<K, P>(projection: P, value: K) -> Self
    where
        P: Fn(&T) -> K + Send + Sync + 'static,
        K: PartialOrd + Send + Sync + 'static,
    {
        Query::new(move |item| projection(item) <= value)
    }

    /// Projected field is strictly greater than `value`
    pub fn gt<K, P>(projection: P, value: K) -> Self
    where
        P: Fn(&T) -> K + Send + Sync + 'static,
        K: PartialOrd + Send + Sync + 'static,
    {
        Query::new(move |item| projection(item) > value)
    }

    /// Projected field is greater than or equal to `value`
    pub fn ge<K, P>(projection: P, value: K) -> Self
    where
        P: Fn(&T) -> K + Send + Sync + 'static,
        K: PartialOrd + Send + Sync + 'static,
    {
        Query::new(move |item| projection(item) >= value)
    }

    /// Projected field equals any of `values`
    pub fn one_of<K, P, I>(projection: P, values: I) -> Self
    where
        P: Fn(&T) -> K + Send + Sync + 'static,
        K: PartialEq + Send + Sync + 'static,
        I: IntoIterator<Item = K>,
    {
        let values: Vec<K> = values.into_iter().collect();
        Query::new(move |item| {
            let key = projection(item);
            values.iter().any(|v| *v == key)
        })
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Query {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query").finish_non_exhaustive()
    }
}

impl<T: 'static> BitAnd for Query<T> {
    type Output = Query<T>;

    fn bitand(self, rhs: Query<T>) -> Query<T> {
        self.and(rhs)
    }
}

impl<T: 'static> BitOr for Query<T> {
    type Output = Query<T>;

    fn bitor(self, rhs: Query<T>) -> Query<T> {
        self.or(rhs)
    }
}

impl<T: 'static> Not for Query<T> {
    type Output = Query<T>;

    fn not(self) -> Query<T> {
        self.negate()
    }
}
