//! Typed error handling for the catalog API
//!
//! Every failure surfaced by the library is a [`CatalogError`]. Each variant
//! wraps a more specific error type for its category so handlers can match on
//! exactly what went wrong, while the HTTP boundary only needs
//! [`IntoResponse`].
//!
//! # Error Categories
//!
//! - [`EntityError`]: missing records and unique-field conflicts
//! - [`ValidationError`]: malformed input and field-level rule violations
//! - [`AuthError`]: authentication and authorization failures
//! - [`StorageError`]: storage backend failures
//! - [`ConfigError`]: configuration loading and validation
//!
//! # Example
//!
//! ```rust,ignore
//! let author = authors
//!     .get(&id)
//!     .await?
//!     .ok_or(EntityError::NotFound { entity_type: "author", id })?;
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Result alias used by the service layer
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// The main error type for the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Entity(e) => e.status_code(),
            CatalogError::Validation(e) => e.status_code(),
            CatalogError::Auth(_) => StatusCode::FORBIDDEN,
            CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Entity(e) => e.error_code(),
            CatalogError::Validation(e) => e.error_code(),
            CatalogError::Auth(e) => e.error_code(),
            CatalogError::Storage(_) => "STORAGE_ERROR",
            CatalogError::Config(_) => "CONFIG_ERROR",
            CatalogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Field-level errors carried by this error, if any
    ///
    /// Unique-field conflicts are reported through the same map as rule
    /// violations so clients see a single shape for "this field is wrong".
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            CatalogError::Validation(ValidationError::Fields(errors)) => Some(errors.clone()),
            CatalogError::Entity(conflict @ EntityError::Conflict { field, .. }) => {
                let mut errors = FieldErrors::new();
                errors.add(*field, conflict.to_string());
                Some(errors)
            }
            _ => None,
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        if let Some(fields) = self.field_errors() {
            return Some(serde_json::json!({ "fields": fields }));
        }

        match self {
            CatalogError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: &'static str, id: Uuid },

    /// A unique field already holds this value
    #[error("{entity_type} with this {field} already exists.")]
    Conflict {
        entity_type: &'static str,
        field: &'static str,
        value: String,
    },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::Conflict { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::Conflict { .. } => "ENTITY_CONFLICT",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Field name → list of messages, serialized as a plain JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Merge another set of errors into this one
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when no errors were collected, otherwise a validation error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(self).into())
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| describe_rule(&error.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

fn describe_rule(code: &str) -> String {
    match code {
        "email" => "Enter a valid email address.".to_string(),
        "url" => "Enter a valid URL.".to_string(),
        "length" => "Ensure this field has a valid length.".to_string(),
        "required" => "This field is required.".to_string(),
        other => format!("Invalid value ({}).", other),
    }
}

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more field-level rule violations
    #[error("Validation failed for: {}", .0.fields().collect::<Vec<_>>().join(", "))]
    Fields(FieldErrors),

    /// Body is not valid JSON
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Body is JSON but does not match the expected shape
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Path id is not a valid UUID
    #[error("Invalid id format: '{value}'")]
    InvalidId { value: String },
}

impl ValidationError {
    /// Single-field shorthand
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        ValidationError::Fields(errors)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::Fields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidBody { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            ValidationError::InvalidId { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Fields(_) => "VALIDATION_FAILED",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidBody { .. } => "INVALID_BODY",
            ValidationError::InvalidId { .. } => "INVALID_ID",
        }
    }
}

impl From<FieldErrors> for CatalogError {
    fn from(errors: FieldErrors) -> Self {
        CatalogError::Validation(ValidationError::Fields(errors))
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Authentication and authorization failures
///
/// Messages are deliberately generic: a login never says whether the email or
/// the password was wrong.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    #[error("{message}")]
    Forbidden { message: String },
}

impl AuthError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        AuthError::Forbidden {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::NotAuthenticated => "NOT_AUTHENTICATED",
            AuthError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Lock poisoned or backend otherwise unusable
    #[error("Storage backend '{backend}' is unavailable: {message}")]
    Unavailable { backend: String, message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {message}")]
    Parse { message: String },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}
