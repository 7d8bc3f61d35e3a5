//! HTTP handlers for the property resource.

use crate::error::AppError;
use crate::format::PropertyDto;
use crate::model::Property;
use crate::query::{Fields, PropertyQuery};
use crate::state::AppState;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

/// Build a query from raw parameters: `set` picks a named filter group,
/// repeatable `fields` restrict the response projection.
fn parse_query(params: &[(String, String)], id: Option<String>) -> PropertyQuery {
    let mut set = None;
    let mut fields_raw: Vec<&str> = Vec::new();
    for (key, value) in params {
        match key.as_str() {
            "set" => set = Some(value.clone()),
            "fields" => fields_raw.push(value.as_str()),
            _ => {}
        }
    }
    PropertyQuery {
        id,
        set,
        fields: Fields::new(fields_raw),
    }
}

fn accept_header(headers: &HeaderMap) -> &str {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

#[derive(Debug, Deserialize)]
pub struct CreatePropertyDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: String,
}

pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<CreatePropertyDto>,
) -> Result<impl IntoResponse, AppError> {
    let created = state
        .properties
        .create(Property {
            id: String::new(),
            name: body.name,
            description: body.description,
            value: body.value,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("{}/{}", uri.path(), created.id),
        )],
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let query = parse_query(&params, None);
    let properties = state.properties.read_all(&query).await?;
    Ok(state
        .formatters
        .process(accept_header(&headers), StatusCode::OK, &properties))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let query = parse_query(&params, Some(id.clone()));
    let property = state.properties.find_by_id(&id).await?;
    let dto = PropertyDto::from(&property);
    if query.fields.is_enabled() {
        return Ok(Json(dto.project(&query.fields)).into_response());
    }
    Ok(Json(dto).into_response())
}

/// Reduced projection carrying only name and value.
pub async fn read_basic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.properties.find_by_id(&id).await?;
    Ok(Json(PropertyDto::basic(&property)))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePropertyDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: String,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePropertyDto>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .properties
        .update(Property {
            id,
            name: body.name,
            description: body.description,
            value: body.value,
        })
        .await?;
    Ok(Json(PropertyDto::from(&updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.properties.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
