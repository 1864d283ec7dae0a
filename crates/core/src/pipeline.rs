//! Read pipeline: filter → sort → distinct
//!
//! Every backend evaluates `get_elements` through the same three stages, in
//! this fixed order:
//!
//! 1. **filter**: drop entities failing the query
//! 2. **sort**: stable sort by the sort key
//! 3. **distinct**: keep the first entity of every equivalence class
//!
//! Sorting before distinct makes distinct's pick deterministic for a given
//! sort key. An optional `limit` truncates the final sequence. Omitted stages
//! pass their input through unchanged.
//!
//! The stage functions are public so a backend that cannot push a stage down
//! into its storage engine can still reproduce the exact semantics in memory.

use crate::keys::{DistinctKey, SortKey};
use crate::query::Query;

/// Drop every item the query rejects, preserving order
pub fn filter<T>(items: Vec<T>, query: &Query<T>) -> Vec<T>
where
    T: 'static,
{
    items.into_iter().filter(|item| query.evaluate(item)).collect()
}

/// Stable sort by `key`
pub fn sort<T>(mut items: Vec<T>, key: &SortKey<T>) -> Vec<T>
where
    T: 'static,
{
    // sort_by is a stable merge sort
    items.sort_by(|a, b| key.compare(a, b));
    items
}

/// Keep the first item of every `key` class, preserving order
pub fn distinct<T>(items: Vec<T>, key: &DistinctKey<T>) -> Vec<T>
where
    T: 'static,
{
    key.apply(items)
}

/// Optional filter, sort, distinct and limit stages for a read
///
/// # Example
///
/// ```
/// use xrepo_core::{DistinctKey, ReadRequest, SortKey};
///
/// let request = ReadRequest::all()
///     .sorted_by(SortKey::ascending(|age: &u32| *age))
///     .distinct_by(DistinctKey::new(|age: &u32| *age));
///
/// assert_eq!(request.apply(vec![24, 24, 19]), vec![19, 24]);
/// ```
pub struct ReadRequest<T> {
    filter: Option<Query<T>>,
    sort: Option<SortKey<T>>,
    distinct: Option<DistinctKey<T>>,
    limit: Option<usize>,
}

impl<T: 'static> ReadRequest<T> {
    /// Request with every stage omitted
    pub fn all() -> Self {
        ReadRequest {
            filter: None,
            sort: None,
            distinct: None,
            limit: None,
        }
    }

    /// Set the filter stage
    pub fn filtered_by(mut self, query: Query<T>) -> Self {
        self.filter = Some(query);
        self
    }

    /// Set the sort stage
    pub fn sorted_by(mut self, key: SortKey<T>) -> Self {
        self.sort = Some(key);
        self
    }

    /// Set the distinct stage
    pub fn distinct_by(mut self, key: DistinctKey<T>) -> Self {
        self.distinct = Some(key);
        self
    }

    /// Truncate the result to at most `n` items
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Filter stage, if set
    pub fn filter(&self) -> Option<&Query<T>> {
        self.filter.as_ref()
    }

    /// Sort stage, if set
    pub fn sort(&self) -> Option<&SortKey<T>> {
        self.sort.as_ref()
    }

    /// Distinct stage, if set
    pub fn distinct(&self) -> Option<&DistinctKey<T>> {
        self.distinct.as_ref()
    }

    /// Limit, if set
    pub fn max_items(&self) -> Option<usize> {
        self.limit
    }

    /// True when no stage is set
    pub fn is_passthrough(&self) -> bool {
        self.filter.is_none() && self.sort.is_none() && self.distinct.is_none() && self.limit.is_none()
    }

    /// Run the stages over `items`, in order
    pub fn apply<I>(&self, items: I) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut out: Vec<T> = match &self.filter {
            Some(query) => items.into_iter().filter(|item| query.evaluate(item)).collect(),
            None => items.into_iter().collect(),
        };

        if let Some(key) = &self.sort {
            out = sort(out, key);
        }

        if let Some(key) = &self.distinct {
            out = distinct(out, key);
        }

        if let Some(n) = self.limit {
            out.truncate(n);
        }

        out
    }
}

impl<T: 'static> Default for ReadRequest<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> Clone for ReadRequest<T> {
    fn clone(&self) -> Self {
        ReadRequest {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            distinct: self.distinct.clone(),
            limit: self.limit,
        }
    }
}

impl<T> std::fmt::Debug for ReadRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadRequest")
            .field("filter", &self.filter.is_some())
            .field("sort", &self.sort)
            .field("distinct", &self.distinct.is_some())
            .field("limit", &self.limit)
            .finish()
    }
}

impl<T: 'static> From<Query<T>> for ReadRequest<T> {
    fn from(query: Query<T>) -> Self {
        ReadRequest::all().filtered_by(query)
    }
}

impl<T: 'static> From<SortKey<T>> for ReadRequest<T> {
    fn from(key: SortKey<T>) -> Self {
        ReadRequest::all().sorted_by(key)
    }
}

impl<T: 'static> From<DistinctKey<T>> for ReadRequest<T> {
    fn from(key: DistinctKey<T>) -> Self {
        ReadRequest::all().distinct_by(key)
    }
}
