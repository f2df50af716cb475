//! Core module containing the building blocks shared by every entity

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod password;
pub mod service;
pub mod token;
pub mod validation;

pub use auth::{AccessGate, AuthContext, AuthPolicy, AuthProvider, NoAuthProvider};
pub use entity::Entity;
pub use error::{CatalogError, Result};
pub use service::{AccountService, CourseQuery, DataService, GraphReader};
