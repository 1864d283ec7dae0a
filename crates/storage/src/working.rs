//! Working copy used by a single mutation or transaction
//!
//! A `WorkingSet` starts out borrowing the published map and copies it on the
//! first write. Every operation checks its precondition against the current
//! working state before touching anything, so a rejected operation leaves the
//! working copy exactly as it found it.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use xrepo_core::{dedup_by_id, Identifiable, Namespace, RepositoryError, RepositoryResult};

use crate::notify::ChangeSet;

/// Private, copy-on-write view of the stored entities
pub(crate) struct WorkingSet<'a, T: Identifiable> {
    namespace: &'a Namespace,
    data: Cow<'a, BTreeMap<T::Id, T>>,
    changes: ChangeSet<T::Id>,
}

impl<'a, T: Identifiable> WorkingSet<'a, T> {
    pub(crate) fn new(namespace: &'a Namespace, base: &'a BTreeMap<T::Id, T>) -> Self {
        WorkingSet {
            namespace,
            data: Cow::Borrowed(base),
            changes: ChangeSet::default(),
        }
    }

    pub(crate) fn get(&self, id: &T::Id) -> Option<&T> {
        self.data.get(id)
    }

    pub(crate) fn contains(&self, id: &T::Id) -> bool {
        self.data.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.values()
    }

    pub(crate) fn create(&mut self, entity: T) -> RepositoryResult<T> {
        let id = entity.id();
        if self.data.contains_key(&id) {
            return Err(RepositoryError::already_exists(self.namespace, [&id]));
        }
        self.data.to_mut().insert(id.clone(), entity.clone());
        self.changes.created.push(id);
        Ok(entity)
    }

    pub(crate) fn create_many(&mut self, entities: Vec<T>) -> RepositoryResult<Vec<T>> {
        let batch = dedup_by_id(entities);
        let ids: Vec<T::Id> = batch.iter().map(Identifiable::id).collect();

        let colliding: Vec<&T::Id> = ids.iter().filter(|id| self.data.contains_key(*id)).collect();
        if !colliding.is_empty() {
            return Err(RepositoryError::already_exists(self.namespace, colliding));
        }
        if batch.is_empty() {
            return Ok(batch);
        }

        let map = self.data.to_mut();
        for (id, entity) in ids.iter().zip(&batch) {
            map.insert(id.clone(), entity.clone());
        }
        self.changes.created.extend(ids);
        Ok(batch)
    }

    pub(crate) fn update(&mut self, entity: T) -> RepositoryResult<T> {
        let id = entity.id();
        if !self.data.contains_key(&id) {
            return Err(RepositoryError::not_found(self.namespace, [&id]));
        }
        self.data.to_mut().insert(id.clone(), entity.clone());
        self.changes.updated.push(id);
        Ok(entity)
    }

    pub(crate) fn delete_by_id(&mut self, id: &T::Id) -> RepositoryResult<()> {
        if !self.data.contains_key(id) {
            return Err(RepositoryError::not_found(self.namespace, [id]));
        }
        self.data.to_mut().remove(id);
        self.changes.deleted.push(id.clone());
        Ok(())
    }

    pub(crate) fn delete_many(&mut self, entities: &[T]) -> RepositoryResult<()> {
        let mut seen = BTreeSet::new();
        let ids: Vec<T::Id> = entities
            .iter()
            .map(Identifiable::id)
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let missing: Vec<&T::Id> = ids.iter().filter(|id| !self.data.contains_key(*id)).collect();
        if !missing.is_empty() {
            return Err(RepositoryError::not_found(self.namespace, missing));
        }
        if ids.is_empty() {
            return Ok(());
        }

        let map = self.data.to_mut();
        for id in &ids {
            map.remove(id);
        }
        self.changes.deleted.extend(ids);
        Ok(())
    }

    pub(crate) fn delete_all(&mut self) {
        if self.data.is_empty() {
            return;
        }
        self.data = Cow::Owned(BTreeMap::new());
        self.changes.record_clear();
    }

    /// The changed map and what changed, or `None` if nothing was written
    pub(crate) fn into_parts(self) -> Option<(BTreeMap<T::Id, T>, ChangeSet<T::Id>)> {
        match self.data {
            Cow::Owned(map) => Some((map, self.changes)),
            Cow::Borrowed(_) => None,
        }
    }
}
