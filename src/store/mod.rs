//! Repository contracts, the storage holder, and backend selection.

pub mod local;
pub mod surreal;

use crate::config::StorageConfig;
use crate::error::AppError;
use crate::model::{Property, PropertySet};
use async_trait::async_trait;
use std::sync::Arc;

/// Persistence contract for properties. Lookups return a NotFound error when
/// the record is absent, never a bare empty result.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Persist a new property. The returned record carries the
    /// backend-assigned id.
    async fn create(&self, property: &Property) -> Result<Property, AppError>;

    async fn read_all(&self) -> Result<Vec<Property>, AppError>;

    /// All properties whose name is a member of `names`.
    async fn read_all_filtered(&self, names: &[String]) -> Result<Vec<Property>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Property, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Property, AppError>;

    /// Full overwrite of the record with the given id.
    async fn update(&self, property: &Property) -> Result<Property, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Persistence contract for property sets; the set name is the identifier.
#[async_trait]
pub trait PropertySetRepository: Send + Sync {
    async fn create(&self, set: &PropertySet) -> Result<PropertySet, AppError>;

    async fn read_all(&self) -> Result<Vec<PropertySet>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<PropertySet, AppError>;

    async fn update(&self, set: &PropertySet) -> Result<PropertySet, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Holder for the repositories of the one active backend.
#[derive(Clone)]
pub struct Storage {
    pub properties: Arc<dyn PropertyRepository>,
    pub property_sets: Arc<dyn PropertySetRepository>,
}

/// One registered storage backend. `init` connects to the backing store and
/// builds the repositories; a connect failure is a fatal startup error.
#[async_trait]
pub(crate) trait BackendFactory: Send + Sync {
    fn id(&self) -> &'static str;

    async fn init(&self, config: &StorageConfig) -> Result<Storage, AppError>;
}

/// Select and initialize exactly one backend from the configured storage
/// type. Factories are tried in registration order with a case-insensitive
/// id match; an unknown type logs a warning and falls back to the first
/// (default) factory.
pub async fn setup_storage(config: &StorageConfig) -> Result<Storage, AppError> {
    let factories: Vec<Box<dyn BackendFactory>> = vec![
        Box::new(local::LocalFactory),
        Box::new(surreal::SurrealFactory),
    ];
    select_and_init(&factories, config).await
}

async fn select_and_init(
    factories: &[Box<dyn BackendFactory>],
    config: &StorageConfig,
) -> Result<Storage, AppError> {
    for factory in factories {
        if factory.id().eq_ignore_ascii_case(&config.type_) {
            tracing::info!(backend = factory.id(), "setting up storage");
            return factory.init(config).await;
        }
    }

    let default = &factories[0];
    tracing::warn!(
        requested = %config.type_,
        fallback = default.id(),
        "unknown storage type, falling back to default backend"
    );
    default.init(config).await
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory repositories for service and handler tests.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct MemoryPropertyRepository {
        items: Mutex<HashMap<String, Property>>,
    }

    #[async_trait]
    impl PropertyRepository for MemoryPropertyRepository {
        async fn create(&self, property: &Property) -> Result<Property, AppError> {
            let mut items = self.items.lock().unwrap();
            if items.values().any(|p| p.name == property.name) {
                return Err(AppError::conflict(Property::ENTITY, "name", &property.name));
            }
            let mut created = property.clone();
            created.id = uuid::Uuid::new_v4().to_string();
            items.insert(created.id.clone(), created.clone());
            Ok(created)
        }

        async fn read_all(&self) -> Result<Vec<Property>, AppError> {
            Ok(self.items.lock().unwrap().values().cloned().collect())
        }

        async fn read_all_filtered(&self, names: &[String]) -> Result<Vec<Property>, AppError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .values()
                .filter(|p| names.contains(&p.name))
                .cloned()
                .collect())
        }

        async fn find_by_id(&self, id: &str) -> Result<Property, AppError> {
            self.items
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| AppError::not_found(Property::ENTITY, id))
        }

        async fn find_by_name(&self, name: &str) -> Result<Property, AppError> {
            self.items
                .lock()
                .unwrap()
                .values()
                .find(|p| p.name == name)
                .cloned()
                .ok_or_else(|| AppError::not_found(Property::ENTITY, name))
        }

        async fn update(&self, property: &Property) -> Result<Property, AppError> {
            let mut items = self.items.lock().unwrap();
            if !items.contains_key(&property.id) {
                return Err(AppError::not_found(Property::ENTITY, &property.id));
            }
            items.insert(property.id.clone(), property.clone());
            Ok(property.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), AppError> {
            self.items
                .lock()
                .unwrap()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| AppError::not_found(Property::ENTITY, id))
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryPropertySetRepository {
        items: Mutex<HashMap<String, PropertySet>>,
    }

    #[async_trait]
    impl PropertySetRepository for MemoryPropertySetRepository {
        async fn create(&self, set: &PropertySet) -> Result<PropertySet, AppError> {
            let mut items = self.items.lock().unwrap();
            if items.contains_key(&set.name) {
                return Err(AppError::conflict(PropertySet::ENTITY, "name", &set.name));
            }
            items.insert(set.name.clone(), set.clone());
            Ok(set.clone())
        }

        async fn read_all(&self) -> Result<Vec<PropertySet>, AppError> {
            Ok(self.items.lock().unwrap().values().cloned().collect())
        }

        async fn find_by_id(&self, id: &str) -> Result<PropertySet, AppError> {
            self.items
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| AppError::not_found(PropertySet::ENTITY, id))
        }

        async fn update(&self, set: &PropertySet) -> Result<PropertySet, AppError> {
            let mut items = self.items.lock().unwrap();
            if !items.contains_key(&set.name) {
                return Err(AppError::not_found(PropertySet::ENTITY, &set.name));
            }
            items.insert(set.name.clone(), set.clone());
            Ok(set.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), AppError> {
            self.items
                .lock()
                .unwrap()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| AppError::not_found(PropertySet::ENTITY, id))
        }
    }

    pub(crate) fn storage() -> Storage {
        Storage {
            properties: Arc::new(MemoryPropertyRepository::default()),
            property_sets: Arc::new(MemoryPropertySetRepository::default()),
        }
    }
}
