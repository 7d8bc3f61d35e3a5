//! Business logic for properties.

use crate::error::AppError;
use crate::model::Property;
use crate::query::PropertyQuery;
use crate::service::property_set::PropertySetService;
use crate::service::validation::Validators;
use crate::store::{PropertyRepository, Storage};
use std::sync::Arc;

pub struct PropertyService {
    validators: Validators,
    repository: Arc<dyn PropertyRepository>,
    sets: Arc<PropertySetService>,
}

impl PropertyService {
    pub fn new(storage: &Storage, sets: Arc<PropertySetService>) -> Self {
        Self {
            validators: Validators::new(),
            repository: storage.properties.clone(),
            sets,
        }
    }

    /// Validate and persist a new property. The name must not collide with
    /// an existing property; the check-then-insert sequence is not atomic
    /// against concurrent creates (the sled backend's name index still
    /// catches the race, the document backend does not).
    pub async fn create(&self, property: Property) -> Result<Property, AppError> {
        self.validators.check(&property)?;

        match self.repository.find_by_name(&property.name).await {
            Ok(existing) => {
                return Err(AppError::conflict(
                    Property::ENTITY,
                    "name",
                    &existing.name,
                ));
            }
            Err(AppError::NotFound { .. }) => {}
            Err(other) => return Err(other),
        }

        self.repository.create(&property).await
    }

    /// All properties, restricted to the named set's members when the query
    /// carries a set name. Set resolution errors propagate unchanged.
    pub async fn read_all(&self, query: &PropertyQuery) -> Result<Vec<Property>, AppError> {
        if let Some(set) = query.set() {
            let values = self.sets.find_values_by_id(set).await?;
            return self.repository.read_all_filtered(&values).await;
        }
        self.repository.read_all().await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Property, AppError> {
        self.repository.find_by_id(id).await
    }

    /// Full overwrite of an existing property. Same validation as create,
    /// but no uniqueness re-check.
    pub async fn update(&self, property: Property) -> Result<Property, AppError> {
        self.validators.check(&property)?;
        self.repository.update(&property).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.repository.delete(id).await
    }
}
