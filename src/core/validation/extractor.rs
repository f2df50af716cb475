//! Axum extractor for validated request bodies
//!
//! This module provides the `ValidatedJson<T>` extractor that normalizes and
//! validates request payloads before they reach handlers.

use super::filters::Normalize;
use crate::core::error::{CatalogError, FieldErrors, ValidationError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that deserializes, normalizes and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_author(
///     ValidatedJson(payload): ValidatedJson<CreateAuthor>,
/// ) -> Result<impl IntoResponse, CatalogError> {
///     // payload already passed every field rule
/// }
/// ```
///
/// Malformed JSON is rejected with 400, a body of the wrong shape with 422
/// and rule violations with 422 plus a per-field message map.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Normalize + Send,
{
    type Rejection = CatalogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        payload.normalize();
        payload.validate().map_err(FieldErrors::from)?;

        Ok(ValidatedJson(payload))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> CatalogError {
    let error = match rejection {
        JsonRejection::JsonDataError(e) => ValidationError::InvalidBody {
            message: e.body_text(),
        },
        other => ValidationError::InvalidJson {
            message: other.body_text(),
        },
    };
    error.into()
}
