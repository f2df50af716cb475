//! Server module: shared state, route registry and the HTTP entry point
//!
//! `ServerBuilder` assembles a `ServerHost` from configuration and a store,
//! registers every entity's routes and serves them under `/api`.

pub mod builder;
pub mod entity_registry;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use host::{ServerHost, Services};
pub use router::{API_PREFIX, RestExposure};
