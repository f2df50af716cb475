//! # Course Catalog
//!
//! A REST backend for a course catalog: authors, courses, comments and
//! JWT-authenticated user accounts with profiles.
//!
//! ## Features
//!
//! - **JWT Sessions**: HS256 tokens with a fixed lifetime, no refresh
//! - **Access Control**: public reads, authenticated writes, owner-only comment edits
//! - **Nested Responses**: explicit flat/populated views, one level deep
//! - **Validated Input**: field rules, password policy and uniqueness reported per field
//! - **Atomic Cascades**: deleting an author, course or user removes what depends on it
//! - **Configuration-Based**: YAML file plus environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::with_secret("change-me").with_env_overrides()?;
//!     let bind = config.server.bind.clone();
//!
//!     ServerBuilder::new()
//!         .with_config(config)
//!         .with_store(InMemoryStore::new())
//!         .serve(&bind)
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod serialization;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AccessGate, AuthContext, AuthPolicy, AuthProvider, JwtAuthProvider, Operation, Resource},
        entity::Entity,
        error::{CatalogError, FieldErrors, Result},
        extractors::Caller,
        password::PasswordPolicy,
        service::{AccountService, CourseQuery, DataService, GraphReader},
        token::TokenService,
        validation::ValidatedJson,
    };

    // === Entities ===
    pub use crate::entities::{Author, Comment, Course, Profile, User};

    // === Serialization ===
    pub use crate::serialization::{Expansion, Renderer};

    // === Storage ===
    pub use crate::storage::{CatalogStore, InMemoryStore};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
