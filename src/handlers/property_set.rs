//! HTTP handlers for the property-set resource.

use crate::error::AppError;
use crate::model::PropertySet;
use crate::state::AppState;
use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PropertySetDto {
    pub name: String,
    pub values: Vec<String>,
}

impl From<&PropertySet> for PropertySetDto {
    fn from(set: &PropertySet) -> Self {
        Self {
            name: set.name.clone(),
            values: set.values.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SetListDto {
    sets: Vec<PropertySetDto>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSetDto {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<CreateSetDto>,
) -> Result<impl IntoResponse, AppError> {
    let created = state
        .property_sets
        .create(PropertySet {
            name: body.name,
            values: body.values,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        [(
            header::LOCATION,
            format!("{}/{}", uri.path(), created.name),
        )],
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let sets = state.property_sets.read_all().await?;
    Ok(Json(SetListDto {
        sets: sets.iter().map(PropertySetDto::from).collect(),
    }))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let set = state.property_sets.find_by_id(&id).await?;
    Ok(Json(PropertySetDto::from(&set)))
}

/// The values list is a total overwrite; the name comes from the path.
#[derive(Debug, Deserialize)]
pub struct UpdateSetDto {
    #[serde(default)]
    pub values: Vec<String>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSetDto>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .property_sets
        .update(PropertySet {
            name: id,
            values: body.values,
        })
        .await?;
    Ok(Json(PropertySetDto::from(&updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.property_sets.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
