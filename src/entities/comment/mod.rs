//! Comment entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::CommentDescriptor;
pub use model::{Comment, CreateComment, UpdateComment};
