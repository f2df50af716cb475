//! Entity registry for collecting each entity's routes

use axum::Router;
use std::collections::BTreeMap;

/// Trait that describes how to build routes for an entity
///
/// Each resource family (authors, courses, comments, accounts) implements
/// this trait to contribute its routes. Routes are relative to the API
/// prefix; the router nests them.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "course")
    fn entity_type(&self) -> &str;

    /// The path segment the routes live under (e.g., "courses")
    fn plural(&self) -> &str;

    /// Build the routes for this entity, with state already applied
    fn build_routes(&self) -> Router;
}

/// Registry for all entities in the application
///
/// Descriptors are keyed by entity type; registering the same type twice
/// replaces the earlier descriptor.
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity descriptor
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        tracing::debug!(entity_type = %entity_type, plural = descriptor.plural(), "registering routes");
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, descriptor: impl EntityDescriptor + 'static) -> Self {
        self.register(Box::new(descriptor));
        self
    }

    /// Merge every registered entity's routes into one router
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum_test::TestServer;

    struct StaticDescriptor {
        entity_type: &'static str,
        plural: &'static str,
    }

    impl EntityDescriptor for StaticDescriptor {
        fn entity_type(&self) -> &str {
            self.entity_type
        }

        fn plural(&self) -> &str {
            self.plural
        }

        fn build_routes(&self) -> Router {
            let body = self.plural;
            Router::new().route(&format!("/{}", self.plural), get(move || async move { body }))
        }
    }

    fn descriptor(entity_type: &'static str, plural: &'static str) -> StaticDescriptor {
        StaticDescriptor { entity_type, plural }
    }

    #[test]
    fn test_new_registry_is_empty() {
        assert!(EntityRegistry::new().entity_types().is_empty());
    }

    #[test]
    fn test_entity_types_are_sorted() {
        let registry = EntityRegistry::new()
            .with(descriptor("course", "courses"))
            .with(descriptor("author", "authors"));
        assert_eq!(registry.entity_types(), vec!["author", "course"]);
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let registry = EntityRegistry::new()
            .with(descriptor("course", "courses"))
            .with(descriptor("course", "classes"));
        assert_eq!(registry.entity_types().len(), 1);
    }

    #[tokio::test]
    async fn test_build_routes_merges_every_descriptor() {
        let registry = EntityRegistry::new()
            .with(descriptor("author", "authors"))
            .with(descriptor("comment", "comments"));

        let server = TestServer::new(registry.build_routes()).unwrap();
        server.get("/authors").await.assert_text("authors");
        server.get("/comments").await.assert_text("comments");
    }
}
