//! Nested serialization of catalog entities

pub mod renderer;
pub mod views;

pub use renderer::Renderer;
pub use views::{
    AuthorRepr, AuthorView, CommentRepr, CommentView, CourseRepr, CourseView, Expansion,
    PopulatedAuthor, PopulatedComment, PopulatedCourse, ProfileView, UserView,
};
