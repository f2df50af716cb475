//! Entity descriptor for Author

use super::handlers::{
    create_author, delete_author, get_author, list_author_courses, list_authors, update_author,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{Router, routing::get};

/// Descriptor for the Author entity
pub struct AuthorDescriptor {
    host: ServerHost,
}

impl AuthorDescriptor {
    pub fn new(host: ServerHost) -> Self {
        Self { host }
    }
}

impl EntityDescriptor for AuthorDescriptor {
    fn entity_type(&self) -> &str {
        "author"
    }

    fn plural(&self) -> &str {
        "authors"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/authors", get(list_authors).post(create_author))
            .route(
                "/authors/{id}",
                get(get_author).put(update_author).delete(delete_author),
            )
            .route("/authors/{id}/courses", get(list_author_courses))
            .with_state(self.host.clone())
    }
}
