//! Ordering and distinctness keys
//!
//! Both keys are typed projections from an entity:
//! - `SortKey<T>` projects to a totally ordered value and defines the
//!   comparison used by the sort stage.
//! - `DistinctKey<T>` projects to a hashable value and defines the
//!   equivalence classes used by the distinct stage.
//!
//! The projected key type is erased behind an `Arc`ed closure so requests can
//! be stored, cloned and handed across backends without generic noise.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashSet;

/// Direction of a sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest key first
    #[default]
    Ascending,
    /// Largest key first
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

type Comparator<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// Ordering projection `T -> K` with `K: Ord`
///
/// Because `K` is `Ord`, the comparison is a strict weak ordering by
/// construction. Sorting with a `SortKey` is stable: entities with equal keys
/// keep their input order, in either direction.
pub struct SortKey<T> {
    compare: Arc<Comparator<T>>,
    direction: SortDirection,
}

impl<T: 'static> SortKey<T> {
    /// Sort ascending by the projected key
    pub fn ascending<K, P>(projection: P) -> Self
    where
        K: Ord,
        P: Fn(&T) -> K + Send + Sync + 'static,
    {
        SortKey {
            compare: Arc::new(move |a: &T, b: &T| projection(a).cmp(&projection(b))),
            direction: SortDirection::Ascending,
        }
    }

    /// Sort descending by the projected key
    pub fn descending<K, P>(projection: P) -> Self
    where
        K: Ord,
        P: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::ascending(projection).reversed()
    }

    /// Flip the direction
    pub fn reversed(mut self) -> Self {
        self.direction = match self.direction {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        };
        self
    }

    /// Break ties of this key with `next`
    pub fn then(self, next: SortKey<T>) -> Self {
        SortKey {
            compare: Arc::new(move |a: &T, b: &T| {
                self.compare(a, b).then_with(|| next.compare(a, b))
            }),
            direction: SortDirection::Ascending,
        }
    }

    /// Direction of this key
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compare two entities under this key, honoring the direction
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.direction.apply((self.compare)(a, b))
    }

    /// Strict "a sorts before b"
    #[inline]
    pub fn is_smaller(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        SortKey {
            compare: Arc::clone(&self.compare),
            direction: self.direction,
        }
    }
}

impl<T> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

type Dedup<T> = dyn Fn(Vec<T>) -> Vec<T> + Send + Sync;

/// Distinctness projection `T -> K` with `K: Hash + Eq`
///
/// Grouping uses the projected key itself (not just its hash), so equal keys
/// always fall in the same class and unequal keys never collide.
pub struct DistinctKey<T> {
    dedup: Arc<Dedup<T>>,
}

impl<T: 'static> DistinctKey<T> {
    /// De-duplicate by the projected key
    pub fn new<K, P>(projection: P) -> Self
    where
        K: Hash + Eq + 'static,
        P: Fn(&T) -> K + Send + Sync + 'static,
    {
        DistinctKey {
            dedup: Arc::new(move |items: Vec<T>| {
                let mut seen = FxHashSet::default();
                items
                    .into_iter()
                    .filter(|item| seen.insert(projection(item)))
                    .collect()
            }),
        }
    }

    /// Keep the first entity of every equivalence class, preserving order
    pub fn apply(&self, items: Vec<T>) -> Vec<T> {
        (self.dedup)(items)
    }
}

impl<T> Clone for DistinctKey<T> {
    fn clone(&self) -> Self {
        DistinctKey {
            dedup: Arc::clone(&self.dedup),
        }
    }
}

impl<T> fmt::Debug for DistinctKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistinctKey").finish_non_exhaustive()
    }
}
