//! Business logic for property sets.

use crate::error::AppError;
use crate::model::PropertySet;
use crate::store::{PropertySetRepository, Storage};
use std::sync::Arc;

pub struct PropertySetService {
    repository: Arc<dyn PropertySetRepository>,
}

impl PropertySetService {
    pub fn new(storage: &Storage) -> Self {
        Self {
            repository: storage.property_sets.clone(),
        }
    }

    /// Add a new set; duplicate names are rejected by the repository.
    pub async fn create(&self, set: PropertySet) -> Result<PropertySet, AppError> {
        self.repository.create(&set).await
    }

    pub async fn read_all(&self) -> Result<Vec<PropertySet>, AppError> {
        self.repository.read_all().await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<PropertySet, AppError> {
        self.repository.find_by_id(id).await
    }

    /// The member values of the named set. Used by the property service to
    /// resolve set-based filters.
    pub async fn find_values_by_id(&self, id: &str) -> Result<Vec<String>, AppError> {
        Ok(self.find_by_id(id).await?.values)
    }

    /// Replace the whole values list of an existing set.
    pub async fn update(&self, set: PropertySet) -> Result<PropertySet, AppError> {
        self.repository.update(&set).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.repository.delete(id).await
    }
}
