//! Entity descriptor for Course

use super::handlers::{
    add_course_to_profile, create_course, delete_course, get_course, list_courses,
    list_user_courses, remove_course_from_profile, update_course,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Descriptor for the Course entity, including the saved-course routes
pub struct CourseDescriptor {
    host: ServerHost,
}

impl CourseDescriptor {
    pub fn new(host: ServerHost) -> Self {
        Self { host }
    }
}

impl EntityDescriptor for CourseDescriptor {
    fn entity_type(&self) -> &str {
        "course"
    }

    fn plural(&self) -> &str {
        "courses"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/courses", get(list_courses).post(create_course))
            .route(
                "/courses/{id}",
                get(get_course).put(update_course).delete(delete_course),
            )
            .route("/courses/{id}/add", post(add_course_to_profile))
            .route("/courses/{id}/remove", delete(remove_course_from_profile))
            .route("/courses/user/{user_id}", get(list_user_courses))
            .with_state(self.host.clone())
    }
}
