//! Entities module - contains all business entities

pub mod account;
pub mod author;
pub mod comment;
pub mod course;

// Re-export models for convenience
pub use account::{Profile, User};
pub use author::Author;
pub use comment::Comment;
pub use course::Course;
