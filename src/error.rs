//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load: {0}")]
    Load(String),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Business and infrastructure errors. The structured kinds (not found,
/// conflict, validation) reuse their HTTP status as the error code and are
/// echoed to the client verbatim; everything else collapses to a generic 500.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Cannot find {entity} entity (id='{id}')")]
    NotFound { entity: &'static str, id: String },
    #[error("Found {entity} with same unique property ({property}='{value}')")]
    Conflict {
        entity: &'static str,
        property: &'static str,
        value: String,
    },
    #[error("Invalid {entity} entity. Property '{property}' cannot be empty")]
    EmptyField {
        entity: &'static str,
        property: &'static str,
    },
    #[error("Invalid {entity} entity. {reason}")]
    Invalid { entity: &'static str, reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("local store: {0}")]
    Sled(#[from] sled::Error),
    #[error("document store: {0}")]
    Surreal(#[from] surrealdb::Error),
    #[error("encoding: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn conflict(entity: &'static str, property: &'static str, value: impl Into<String>) -> Self {
        AppError::Conflict {
            entity,
            property,
            value: value.into(),
        }
    }

    pub fn empty_field(entity: &'static str, property: &'static str) -> Self {
        AppError::EmptyField { entity, property }
    }

    pub fn invalid(entity: &'static str, reason: impl Into<String>) -> Self {
        AppError::Invalid {
            entity,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::EmptyField { .. } | AppError::Invalid { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire shape of every error response.
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub timestamp: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
