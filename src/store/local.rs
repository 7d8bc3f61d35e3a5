//! Embedded key-value backend on sled.
//!
//! Properties live in one tree keyed by id, with a second tree acting as a
//! unique index from name to id. Property sets live in a tree keyed by name.
//! Records are stored as JSON.

use crate::config::StorageConfig;
use crate::error::AppError;
use crate::model::{Property, PropertySet};
use crate::store::{BackendFactory, PropertyRepository, PropertySetRepository, Storage};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

const PROPERTIES_TREE: &str = "properties";
const PROPERTY_NAMES_TREE: &str = "property_names";
const PROPERTY_SETS_TREE: &str = "property_sets";

pub(crate) struct LocalFactory;

#[async_trait]
impl BackendFactory for LocalFactory {
    fn id(&self) -> &'static str {
        "local"
    }

    async fn init(&self, config: &StorageConfig) -> Result<Storage, AppError> {
        let db = sled::open(&config.local.path)?;
        Ok(Storage {
            properties: Arc::new(LocalPropertyRepository::new(&db)?),
            property_sets: Arc::new(LocalPropertySetRepository::new(&db)?),
        })
    }
}

pub struct LocalPropertyRepository {
    items: sled::Tree,
    names: sled::Tree,
}

impl LocalPropertyRepository {
    pub fn new(db: &sled::Db) -> Result<Self, AppError> {
        Ok(Self {
            items: db.open_tree(PROPERTIES_TREE)?,
            names: db.open_tree(PROPERTY_NAMES_TREE)?,
        })
    }

    fn decode(bytes: &[u8]) -> Result<Property, AppError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[async_trait]
impl PropertyRepository for LocalPropertyRepository {
    async fn create(&self, property: &Property) -> Result<Property, AppError> {
        let mut created = property.clone();
        created.id = uuid::Uuid::new_v4().to_string();

        // Unique index on name: first writer wins.
        let claimed = self.names.compare_and_swap(
            created.name.as_bytes(),
            None::<&[u8]>,
            Some(created.id.as_bytes()),
        )?;
        if claimed.is_err() {
            return Err(AppError::conflict(Property::ENTITY, "name", &created.name));
        }

        self.items
            .insert(created.id.as_bytes(), serde_json::to_vec(&created)?)?;
        Ok(created)
    }

    async fn read_all(&self) -> Result<Vec<Property>, AppError> {
        let mut out = Vec::new();
        for entry in self.items.iter() {
            let (_, value) = entry?;
            out.push(Self::decode(&value)?);
        }
        Ok(out)
    }

    async fn read_all_filtered(&self, names: &[String]) -> Result<Vec<Property>, AppError> {
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        let mut out = Vec::new();
        for entry in self.items.iter() {
            let (_, value) = entry?;
            let property = Self::decode(&value)?;
            if wanted.contains(property.name.as_str()) {
                out.push(property);
            }
        }
        Ok(out)
    }

    async fn find_by_id(&self, id: &str) -> Result<Property, AppError> {
        match self.items.get(id.as_bytes())? {
            Some(value) => Self::decode(&value),
            None => Err(AppError::not_found(Property::ENTITY, id)),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Property, AppError> {
        let id = self
            .names
            .get(name.as_bytes())?
            .ok_or_else(|| AppError::not_found(Property::ENTITY, name))?;
        match self.items.get(&id)? {
            Some(value) => Self::decode(&value),
            None => Err(AppError::not_found(Property::ENTITY, name)),
        }
    }

    async fn update(&self, property: &Property) -> Result<Property, AppError> {
        let current = match self.items.get(property.id.as_bytes())? {
            Some(value) => Self::decode(&value)?,
            None => return Err(AppError::not_found(Property::ENTITY, &property.id)),
        };

        if current.name != property.name {
            let claimed = self.names.compare_and_swap(
                property.name.as_bytes(),
                None::<&[u8]>,
                Some(property.id.as_bytes()),
            )?;
            if claimed.is_err() {
                return Err(AppError::conflict(Property::ENTITY, "name", &property.name));
            }
            self.names.remove(current.name.as_bytes())?;
        }

        self.items
            .insert(property.id.as_bytes(), serde_json::to_vec(property)?)?;
        Ok(property.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let current = match self.items.get(id.as_bytes())? {
            Some(value) => Self::decode(&value)?,
            None => return Err(AppError::not_found(Property::ENTITY, id)),
        };
        self.items.remove(id.as_bytes())?;
        self.names.remove(current.name.as_bytes())?;
        Ok(())
    }
}

pub struct LocalPropertySetRepository {
    items: sled::Tree,
}

impl LocalPropertySetRepository {
    pub fn new(db: &sled::Db) -> Result<Self, AppError> {
        Ok(Self {
            items: db.open_tree(PROPERTY_SETS_TREE)?,
        })
    }

    fn decode(bytes: &[u8]) -> Result<PropertySet, AppError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[async_trait]
impl PropertySetRepository for LocalPropertySetRepository {
    async fn create(&self, set: &PropertySet) -> Result<PropertySet, AppError> {
        let claimed = self.items.compare_and_swap(
            set.name.as_bytes(),
            None::<&[u8]>,
            Some(serde_json::to_vec(set)?),
        )?;
        if claimed.is_err() {
            return Err(AppError::conflict(PropertySet::ENTITY, "name", &set.name));
        }
        Ok(set.clone())
    }

    async fn read_all(&self) -> Result<Vec<PropertySet>, AppError> {
        let mut out = Vec::new();
        for entry in self.items.iter() {
            let (_, value) = entry?;
            out.push(Self::decode(&value)?);
        }
        Ok(out)
    }

    async fn find_by_id(&self, id: &str) -> Result<PropertySet, AppError> {
        match self.items.get(id.as_bytes())? {
            Some(value) => Self::decode(&value),
            None => Err(AppError::not_found(PropertySet::ENTITY, id)),
        }
    }

    async fn update(&self, set: &PropertySet) -> Result<PropertySet, AppError> {
        if self.items.get(set.name.as_bytes())?.is_none() {
            return Err(AppError::not_found(PropertySet::ENTITY, &set.name));
        }
        self.items
            .insert(set.name.as_bytes(), serde_json::to_vec(set)?)?;
        Ok(set.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.items
            .remove(id.as_bytes())?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(PropertySet::ENTITY, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> (tempfile::TempDir, LocalPropertyRepository, LocalPropertySetRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db = sled::open(dir.path().join("db")).unwrap();
        let properties = LocalPropertyRepository::new(&db).unwrap();
        let sets = LocalPropertySetRepository::new(&db).unwrap();
        (dir, properties, sets)
    }

    fn property(name: &str, value: &str) -> Property {
        Property {
            id: String::new(),
            name: name.into(),
            description: String::new(),
            value: value.into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let (_dir, repo, _) = open();

        let first = repo.create(&property("a.b", "1")).await.unwrap();
        let second = repo.create(&property("c.d", "2")).await.unwrap();

        assert!(!first.id.is_empty());
        assert!(!second.id.is_empty());
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let (_dir, repo, _) = open();

        repo.create(&property("a.b", "1")).await.unwrap();
        let err = repo.create(&property("a.b", "other")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn find_by_id_and_name() {
        let (_dir, repo, _) = open();

        let created = repo.create(&property("a.b", "1")).await.unwrap();

        let by_id = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(by_id, created);

        let by_name = repo.find_by_name("a.b").await.unwrap();
        assert_eq!(by_name, created);

        let err = repo.find_by_id("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(
            err.to_string(),
            "Cannot find Property entity (id='missing')"
        );
    }

    #[tokio::test]
    async fn update_replaces_the_whole_record_and_moves_the_name_index() {
        let (_dir, repo, _) = open();

        let mut created = repo.create(&property("a.b", "1")).await.unwrap();
        created.name = "renamed".into();
        created.description = String::new();
        created.value = "2".into();

        let updated = repo.update(&created).await.unwrap();
        assert_eq!(updated.value, "2");

        assert!(repo.find_by_name("a.b").await.is_err());
        assert_eq!(repo.find_by_name("renamed").await.unwrap().id, created.id);

        // Freed name can be claimed again.
        repo.create(&property("a.b", "3")).await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let (_dir, repo, _) = open();

        let mut missing = property("a.b", "1");
        missing.id = "nope".into();
        let err = repo.update(&missing).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_frees_the_name_and_second_delete_fails() {
        let (_dir, repo, _) = open();

        let created = repo.create(&property("a.b", "1")).await.unwrap();
        repo.delete(&created.id).await.unwrap();

        let err = repo.delete(&created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        repo.create(&property("a.b", "again")).await.unwrap();
    }

    #[tokio::test]
    async fn filtered_read_restricts_by_name() {
        let (_dir, repo, _) = open();

        repo.create(&property("a", "1")).await.unwrap();
        repo.create(&property("b", "2")).await.unwrap();
        repo.create(&property("c", "3")).await.unwrap();

        let names = vec!["a".to_string(), "c".to_string()];
        let mut filtered = repo.read_all_filtered(&names).await.unwrap();
        filtered.sort_by(|x, y| x.name.cmp(&y.name));

        let got: Vec<&str> = filtered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(got, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn set_round_trip_and_conflicts() {
        let (_dir, _, repo) = open();

        let set = PropertySet {
            name: "group".into(),
            values: vec!["a".into(), "b".into()],
        };
        repo.create(&set).await.unwrap();

        let err = repo.create(&set).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let found = repo.find_by_id("group").await.unwrap();
        assert_eq!(found.values, vec!["a".to_string(), "b".to_string()]);

        let replaced = PropertySet {
            name: "group".into(),
            values: vec!["c".into()],
        };
        let updated = repo.update(&replaced).await.unwrap();
        assert_eq!(updated.values, vec!["c".to_string()]);

        repo.delete("group").await.unwrap();
        assert!(matches!(
            repo.delete("group").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
