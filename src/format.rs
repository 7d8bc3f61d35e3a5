//! Content-negotiated response formatting for property listings.

use crate::model::Property;
use crate::query::Fields;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wire shape of a property. Empty id/description are omitted.
#[derive(Debug, Serialize)]
pub struct PropertyDto {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub value: String,
}

impl From<&Property> for PropertyDto {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id.clone(),
            name: property.name.clone(),
            description: property.description.clone(),
            value: property.value.clone(),
        }
    }
}

impl PropertyDto {
    /// Reduced shape carrying only name and value.
    pub fn basic(property: &Property) -> Self {
        Self {
            id: String::new(),
            name: property.name.clone(),
            description: String::new(),
            value: property.value.clone(),
        }
    }

    /// Keep only the requested fields. The field table is fixed; keys are
    /// matched through the selection's case-insensitive contract.
    pub fn project(&self, fields: &Fields) -> Map<String, Value> {
        let entries = [
            ("id", json!(self.id)),
            ("name", json!(self.name)),
            ("description", json!(self.description)),
            ("value", json!(self.value)),
        ];
        let mut out = Map::new();
        for (key, value) in entries {
            if fields.contains(key) {
                out.insert(key.to_string(), value);
            }
        }
        out
    }
}

#[derive(Debug, Serialize)]
struct PropertyListDto {
    properties: Vec<PropertyDto>,
}

pub(crate) trait Formatter: Send + Sync {
    fn supports(&self, accept: &str) -> bool;
    fn format(&self, code: StatusCode, properties: &[Property]) -> Response;
}

/// Formatter chain over the `Accept` header: first supporting formatter
/// wins, the first registered one is the unconditional fallback.
pub struct Formatters {
    values: Vec<Box<dyn Formatter>>,
}

impl Default for Formatters {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatters {
    pub fn new() -> Self {
        Self {
            values: vec![Box::new(JsonFormatter), Box::new(JavaPropertiesFormatter)],
        }
    }

    pub fn process(&self, accept: &str, code: StatusCode, properties: &[Property]) -> Response {
        for formatter in &self.values {
            if formatter.supports(accept) {
                return formatter.format(code, properties);
            }
        }
        self.values[0].format(code, properties)
    }
}

struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn supports(&self, accept: &str) -> bool {
        accept.is_empty()
            || accept.eq_ignore_ascii_case("*/*")
            || accept.eq_ignore_ascii_case("application/json")
    }

    fn format(&self, code: StatusCode, properties: &[Property]) -> Response {
        let body = PropertyListDto {
            properties: properties.iter().map(PropertyDto::from).collect(),
        };
        (code, Json(body)).into_response()
    }
}

/// Java-properties text rendition: one `name = value` line per property,
/// preceded by a `# description` comment line when the description is
/// non-empty. Served as a download.
struct JavaPropertiesFormatter;

impl Formatter for JavaPropertiesFormatter {
    fn supports(&self, accept: &str) -> bool {
        accept.eq_ignore_ascii_case("application/java.properties")
    }

    fn format(&self, code: StatusCode, properties: &[Property]) -> Response {
        let mut out = String::new();
        for property in properties {
            if !property.description.is_empty() {
                out.push_str("# ");
                out.push_str(&property.description);
                out.push('\n');
            }
            out.push_str(&property.name);
            out.push_str(" = ");
            out.push_str(&property.value);
            out.push('\n');
        }
        (
            code,
            [
                (header::CONTENT_TYPE, "application/octet-stream"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"java.properties\"",
                ),
            ],
            out,
        )
            .into_response()
    }
}
