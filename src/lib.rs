//! Storage-backed REST API for configuration properties and property sets.

pub mod config;
pub mod error;
pub mod format;
pub mod handlers;
pub mod model;
pub mod query;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use model::{Property, PropertySet};
pub use routes::app;
pub use state::AppState;
pub use store::{setup_storage, Storage};
