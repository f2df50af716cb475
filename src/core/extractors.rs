//! Axum extractors for callers and path ids
//!
//! This module provides HTTP extractors that:
//! - Resolve the bearer token into an [`AuthContext`]
//! - Parse entity ids from path segments into typed errors

use crate::core::auth::{AuthContext, AuthProvider};
use crate::core::error::{CatalogError, Result, ValidationError};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use std::sync::Arc;
use uuid::Uuid;

/// The authenticated (or anonymous) caller of a request
///
/// A missing `Authorization` header yields [`AuthContext::Anonymous`]; a
/// present but invalid one rejects the request before the handler runs.
#[derive(Debug, Clone)]
pub struct Caller(pub AuthContext);

impl<S> FromRequestParts<S> for Caller
where
    Arc<dyn AuthProvider>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let provider = Arc::<dyn AuthProvider>::from_ref(state);
        provider.extract_context(&parts.headers).await.map(Caller)
    }
}

/// Parse a path segment as an entity id
pub fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        ValidationError::InvalidId {
            value: raw.to_string(),
        }
        .into()
    })
}
