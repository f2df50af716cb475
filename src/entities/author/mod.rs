//! Author entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::AuthorDescriptor;
pub use model::{Author, CreateAuthor, UpdateAuthor};
