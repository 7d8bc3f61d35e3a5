//! Core domain records for properties and property sets.

use serde::{Deserialize, Serialize};

/// A named key/value/description record, the primary resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Server-generated opaque identifier, assigned by the storage backend.
    pub id: String,
    /// Unique, non-empty, whitespace-free.
    pub name: String,
    pub description: String,
    pub value: String,
}

impl Property {
    pub const ENTITY: &'static str = "Property";
}

/// A named, ordered list of property names used to filter property listings.
/// The name doubles as the identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySet {
    pub name: String,
    pub values: Vec<String>,
}

impl PropertySet {
    pub const ENTITY: &'static str = "PropertySet";
}
