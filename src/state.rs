//! Shared application state for all routes.

use crate::format::Formatters;
use crate::service::{PropertyService, PropertySetService};
use crate::store::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub properties: Arc<PropertyService>,
    pub property_sets: Arc<PropertySetService>,
    pub formatters: Arc<Formatters>,
}

impl AppState {
    /// Wire services in dependency order over an initialized storage: the
    /// set service first, then the property service that depends on it.
    pub fn new(storage: &Storage) -> Self {
        let property_sets = Arc::new(PropertySetService::new(storage));
        let properties = Arc::new(PropertyService::new(storage, property_sets.clone()));
        Self {
            properties,
            property_sets,
            formatters: Arc::new(Formatters::new()),
        }
    }
}
