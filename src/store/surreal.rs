//! Document-database backend on SurrealDB.
//!
//! Uses the `any` engine, so the endpoint decides the transport: `ws://host`
//! for a remote server, `mem://` for the embedded in-memory engine used in
//! tests. Property ids are assigned by the database; set records use the set
//! name as their record id.
//!
//! Name uniqueness is enforced by a find-then-insert check, not an index, so
//! concurrent creates of the same name can race.

use crate::config::StorageConfig;
use crate::error::AppError;
use crate::model::{Property, PropertySet};
use crate::store::{BackendFactory, PropertyRepository, PropertySetRepository, Storage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::{RecordId, Surreal};

const PROPERTY_TABLE: &str = "property";
const SET_TABLE: &str = "property_set";

pub(crate) struct SurrealFactory;

#[async_trait]
impl BackendFactory for SurrealFactory {
    fn id(&self) -> &'static str {
        "surreal"
    }

    async fn init(&self, config: &StorageConfig) -> Result<Storage, AppError> {
        let settings = &config.surreal;
        let db: Surreal<Any> = Surreal::init();
        db.connect(settings.endpoint.as_str()).await?;
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await?;
        }
        db.use_ns(settings.namespace.as_str())
            .use_db(settings.database.as_str())
            .await?;
        Ok(Storage {
            properties: Arc::new(SurrealPropertyRepository::new(db.clone())),
            property_sets: Arc::new(SurrealPropertySetRepository::new(db)),
        })
    }
}

#[derive(Debug, Serialize)]
struct PropertyContent {
    name: String,
    description: String,
    value: String,
}

impl From<&Property> for PropertyContent {
    fn from(property: &Property) -> Self {
        Self {
            name: property.name.clone(),
            description: property.description.clone(),
            value: property.value.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PropertyRecord {
    id: RecordId,
    name: String,
    description: String,
    value: String,
}

impl PropertyRecord {
    fn into_model(self) -> Property {
        Property {
            id: self.id.key().to_string(),
            name: self.name,
            description: self.description,
            value: self.value,
        }
    }
}

pub struct SurrealPropertyRepository {
    db: Surreal<Any>,
}

impl SurrealPropertyRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PropertyRepository for SurrealPropertyRepository {
    async fn create(&self, property: &Property) -> Result<Property, AppError> {
        match self.find_by_name(&property.name).await {
            Ok(_) => {
                return Err(AppError::conflict(Property::ENTITY, "name", &property.name));
            }
            Err(AppError::NotFound { .. }) => {}
            Err(other) => return Err(other),
        }

        let created: Option<PropertyRecord> = self
            .db
            .create(PROPERTY_TABLE)
            .content(PropertyContent::from(property))
            .await?;
        created
            .map(PropertyRecord::into_model)
            .ok_or_else(|| AppError::Unexpected("create returned no record".into()))
    }

    async fn read_all(&self) -> Result<Vec<Property>, AppError> {
        let records: Vec<PropertyRecord> = self.db.select(PROPERTY_TABLE).await?;
        Ok(records.into_iter().map(PropertyRecord::into_model).collect())
    }

    async fn read_all_filtered(&self, names: &[String]) -> Result<Vec<Property>, AppError> {
        let mut response = self
            .db
            .query("SELECT * FROM property WHERE name IN $names")
            .bind(("names", names.to_vec()))
            .await?;
        let records: Vec<PropertyRecord> = response.take(0)?;
        Ok(records.into_iter().map(PropertyRecord::into_model).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Property, AppError> {
        let record: Option<PropertyRecord> = self.db.select((PROPERTY_TABLE, id)).await?;
        record
            .map(PropertyRecord::into_model)
            .ok_or_else(|| AppError::not_found(Property::ENTITY, id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Property, AppError> {
        let mut response = self
            .db
            .query("SELECT * FROM property WHERE name = $name")
            .bind(("name", name.to_string()))
            .await?;
        let mut records: Vec<PropertyRecord> = response.take(0)?;
        records
            .pop()
            .map(PropertyRecord::into_model)
            .ok_or_else(|| AppError::not_found(Property::ENTITY, name))
    }

    async fn update(&self, property: &Property) -> Result<Property, AppError> {
        let updated: Option<PropertyRecord> = self
            .db
            .update((PROPERTY_TABLE, property.id.as_str()))
            .content(PropertyContent::from(property))
            .await?;
        updated
            .map(PropertyRecord::into_model)
            .ok_or_else(|| AppError::not_found(Property::ENTITY, &property.id))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted: Option<PropertyRecord> = self.db.delete((PROPERTY_TABLE, id)).await?;
        deleted
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(Property::ENTITY, id))
    }
}

#[derive(Debug, Serialize)]
struct SetContent {
    name: String,
    values: Vec<String>,
}

impl From<&PropertySet> for SetContent {
    fn from(set: &PropertySet) -> Self {
        Self {
            name: set.name.clone(),
            values: set.values.clone(),
        }
    }
}

/// The record id duplicates the name; the name field is what we read back.
#[derive(Debug, Deserialize)]
struct SetRecord {
    name: String,
    values: Vec<String>,
}

impl SetRecord {
    fn into_model(self) -> PropertySet {
        PropertySet {
            name: self.name,
            values: self.values,
        }
    }
}

pub struct SurrealPropertySetRepository {
    db: Surreal<Any>,
}

impl SurrealPropertySetRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PropertySetRepository for SurrealPropertySetRepository {
    async fn create(&self, set: &PropertySet) -> Result<PropertySet, AppError> {
        let existing: Option<SetRecord> = self.db.select((SET_TABLE, set.name.as_str())).await?;
        if existing.is_some() {
            return Err(AppError::conflict(PropertySet::ENTITY, "name", &set.name));
        }

        let created: Option<SetRecord> = self
            .db
            .create((SET_TABLE, set.name.as_str()))
            .content(SetContent::from(set))
            .await?;
        created
            .map(SetRecord::into_model)
            .ok_or_else(|| AppError::Unexpected("create returned no record".into()))
    }

    async fn read_all(&self) -> Result<Vec<PropertySet>, AppError> {
        let records: Vec<SetRecord> = self.db.select(SET_TABLE).await?;
        Ok(records.into_iter().map(SetRecord::into_model).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<PropertySet, AppError> {
        let record: Option<SetRecord> = self.db.select((SET_TABLE, id)).await?;
        record
            .map(SetRecord::into_model)
            .ok_or_else(|| AppError::not_found(PropertySet::ENTITY, id))
    }

    async fn update(&self, set: &PropertySet) -> Result<PropertySet, AppError> {
        let updated: Option<SetRecord> = self
            .db
            .update((SET_TABLE, set.name.as_str()))
            .content(SetContent::from(set))
            .await?;
        updated
            .map(SetRecord::into_model)
            .ok_or_else(|| AppError::not_found(PropertySet::ENTITY, &set.name))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted: Option<SetRecord> = self.db.delete((SET_TABLE, id)).await?;
        deleted
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(PropertySet::ENTITY, id))
    }
}
