//! Storage implementations

pub mod in_memory;

pub use in_memory::InMemoryStore;

use crate::core::service::{AccountService, CourseQuery, DataService, GraphReader};
use crate::entities::account::User;
use crate::entities::author::Author;
use crate::entities::comment::Comment;
use crate::entities::course::Course;

/// A backend that implements every catalog service
///
/// Implemented automatically for any type providing all of them.
pub trait CatalogStore:
    DataService<Author>
    + DataService<Course>
    + DataService<Comment>
    + DataService<User>
    + CourseQuery
    + GraphReader
    + AccountService
    + 'static
{
}

impl<T> CatalogStore for T where
    T: DataService<Author>
        + DataService<Course>
        + DataService<Comment>
        + DataService<User>
        + CourseQuery
        + GraphReader
        + AccountService
        + 'static
{
}
