//! Reference model for tracking expected repository state
//!
//! The reference model is a plain, single-threaded `BTreeMap` that applies
//! contract operations with the contract's preconditions. Tests drive a real
//! backend and the model with the same operations and compare outcomes.
//!
//! # Example
//!
//! ```ignore
//! let mut model = ReferenceModel::new(namespace);
//! let expected = model.create(entity.clone());
//! let actual = repo.create(entity);
//! assert_eq!(expected.is_ok(), actual.is_ok());
//! assert_eq!(model.get_all(), repo.get_all());
//! ```

use std::collections::BTreeMap;

use crate::error::{RepositoryError, RepositoryResult};
use crate::identity::Identifiable;
use crate::namespace::Namespace;
use crate::pipeline::ReadRequest;
use crate::repository::dedup_by_id;

/// Contract operation recorded by the model
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<T> {
    /// Single create
    Create(T),
    /// Batch create
    CreateMany(Vec<T>),
    /// Update
    Update(T),
    /// Single delete
    Delete(T),
    /// Batch delete
    DeleteMany(Vec<T>),
    /// Clear
    DeleteAll,
}

/// Sequential model of a repository
pub struct ReferenceModel<T: Identifiable> {
    namespace: Namespace,
    entities: BTreeMap<T::Id, T>,
    applied: Vec<Operation<T>>,
}

impl<T: Identifiable> ReferenceModel<T> {
    /// Create an empty model
    pub fn new(namespace: Namespace) -> Self {
        ReferenceModel {
            namespace,
            entities: BTreeMap::new(),
            applied: Vec::new(),
        }
    }

    /// Apply one operation, returning whether it succeeded
    pub fn apply(&mut self, op: Operation<T>) -> RepositoryResult<()> {
        match op {
            Operation::Create(e) => self.create(e).map(|_| ()),
            Operation::CreateMany(es) => self.create_many(es).map(|_| ()),
            Operation::Update(e) => self.update(e).map(|_| ()),
            Operation::Delete(e) => self.delete(&e),
            Operation::DeleteMany(es) => self.delete_many(&es),
            Operation::DeleteAll => self.delete_all(),
        }
    }

    /// Insert if absent
    pub fn create(&mut self, entity: T) -> RepositoryResult<T> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(RepositoryError::already_exists(&self.namespace, [&id]));
        }
        self.entities.insert(id, entity.clone());
        self.applied.push(Operation::Create(entity.clone()));
        Ok(entity)
    }

    /// Insert a batch if none of it is present
    pub fn create_many(&mut self, entities: Vec<T>) -> RepositoryResult<Vec<T>> {
        let batch = dedup_by_id(entities);
        let ids: Vec<T::Id> = batch.iter().map(|e| e.id()).collect();
        let colliding: Vec<&T::Id> = ids.iter().filter(|id| self.entities.contains_key(*id)).collect();
        if !colliding.is_empty() {
            return Err(RepositoryError::already_exists(&self.namespace, colliding));
        }
        for (id, entity) in ids.into_iter().zip(batch.iter()) {
            self.entities.insert(id, entity.clone());
        }
        self.applied.push(Operation::CreateMany(batch.clone()));
        Ok(batch)
    }

    /// Replace if present
    pub fn update(&mut self, entity: T) -> RepositoryResult<T> {
        let id = entity.id();
        match self.entities.get_mut(&id) {
            Some(slot) => *slot = entity.clone(),
            None => return Err(RepositoryError::not_found(&self.namespace, [&id])),
        }
        self.applied.push(Operation::Update(entity.clone()));
        Ok(entity)
    }

    /// Remove if present
    pub fn delete(&mut self, entity: &T) -> RepositoryResult<()> {
        let id = entity.id();
        if self.entities.remove(&id).is_none() {
            return Err(RepositoryError::not_found(&self.namespace, [&id]));
        }
        self.applied.push(Operation::Delete(entity.clone()));
        Ok(())
    }

    /// Remove a batch if all of it is present
    pub fn delete_many(&mut self, entities: &[T]) -> RepositoryResult<()> {
        let batch = dedup_by_id(entities.to_vec());
        let ids: Vec<T::Id> = batch.iter().map(|e| e.id()).collect();
        let missing: Vec<&T::Id> = ids.iter().filter(|id| !self.entities.contains_key(*id)).collect();
        if !missing.is_empty() {
            return Err(RepositoryError::not_found(&self.namespace, missing));
        }
        for id in &ids {
            self.entities.remove(id);
        }
        self.applied.push(Operation::DeleteMany(batch));
        Ok(())
    }

    /// Remove everything
    pub fn delete_all(&mut self) -> RepositoryResult<()> {
        self.entities.clear();
        self.applied.push(Operation::DeleteAll);
        Ok(())
    }

    /// Every entity in ascending id order
    pub fn get_all(&self) -> Vec<T> {
        self.entities.values().cloned().collect()
    }

    /// Entity by id
    pub fn get_element(&self, id: &T::Id) -> Option<T> {
        self.entities.get(id).cloned()
    }

    /// Run the read pipeline over the model's state
    pub fn get_elements(&self, request: &ReadRequest<T>) -> Vec<T> {
        request.apply(self.entities.values().cloned())
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Successful operations in application order
    pub fn applied(&self) -> &[Operation<T>] {
        &self.applied
    }
}
