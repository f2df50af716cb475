//! Entity descriptor for Comment

use super::handlers::{create_comment, delete_comment, get_comment, list_comments, update_comment};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{Router, routing::get};

pub struct CommentDescriptor {
    host: ServerHost,
}

impl CommentDescriptor {
    pub fn new(host: ServerHost) -> Self {
        Self { host }
    }
}

impl EntityDescriptor for CommentDescriptor {
    fn entity_type(&self) -> &str {
        "comment"
    }

    fn plural(&self) -> &str {
        "comments"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/comments", get(list_comments).post(create_comment))
            .route(
                "/comments/{id}",
                get(get_comment).put(update_comment).delete(delete_comment),
            )
            .with_state(self.host.clone())
    }
}
