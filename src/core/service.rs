//! Service traits for entity, query and account operations
//!
//! Handlers only ever see these traits; the storage backend behind them is
//! chosen when the server is assembled.

use crate::core::entity::Entity;
use crate::core::error::{EntityError, Result};
use crate::entities::account::{Profile, UpdateProfile, User};
use crate::entities::author::Author;
use crate::entities::comment::Comment;
use crate::entities::course::{Course, CourseFilter};
use async_trait::async_trait;
use uuid::Uuid;

/// An in-place change applied to a stored entity
///
/// Returning an error leaves the stored entity untouched.
pub type Mutation<T> = Box<dyn FnOnce(&mut T) -> Result<()> + Send>;

/// Service trait for managing data entities
///
/// Implementations provide CRUD operations for a specific entity type and
/// enforce its uniqueness and reference rules on every write.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: T) -> Result<T>;

    /// Get an entity by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all entities, oldest first
    async fn list(&self) -> Result<Vec<T>>;

    /// Apply `mutate` to the stored entity and persist the result
    ///
    /// The read, the change and the write's integrity checks run as one
    /// atomic step, so concurrent partial updates never undo each other.
    async fn update(&self, id: &Uuid, mutate: Mutation<T>) -> Result<T>;

    /// Delete an entity and everything that depends on it
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Get an entity by ID, failing with `NotFound` when absent
    async fn fetch(&self, id: &Uuid) -> Result<T> {
        self.get(id).await?.ok_or_else(|| {
            EntityError::NotFound {
                entity_type: T::resource_name_singular(),
                id: *id,
            }
            .into()
        })
    }
}

/// Course search
#[async_trait]
pub trait CourseQuery: Send + Sync {
    /// Courses whose title and author name contain the given substrings
    async fn find_by_filters(&self, filter: &CourseFilter) -> Result<Vec<Course>>;
}

/// Read-only traversal of entity relations, used to build populated views
#[async_trait]
pub trait GraphReader: Send + Sync {
    async fn author(&self, id: &Uuid) -> Result<Option<Author>>;

    async fn course(&self, id: &Uuid) -> Result<Option<Course>>;

    async fn user(&self, id: &Uuid) -> Result<Option<User>>;

    async fn courses_by_author(&self, author_id: &Uuid) -> Result<Vec<Course>>;

    async fn comments_for_course(&self, course_id: &Uuid) -> Result<Vec<Comment>>;
}

/// User lookup and profile management
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn user(&self, id: &Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// The user's profile, created with defaults if it does not exist yet
    async fn profile(&self, user_id: &Uuid) -> Result<Profile>;

    async fn update_profile(&self, user_id: &Uuid, changes: &UpdateProfile) -> Result<Profile>;

    /// Add a course to the user's saved set
    async fn add_saved_course(&self, user_id: &Uuid, course_id: &Uuid) -> Result<Profile>;

    /// Remove a course from the user's saved set
    async fn remove_saved_course(&self, user_id: &Uuid, course_id: &Uuid) -> Result<Profile>;

    /// The user's saved courses in the order they were added
    async fn saved_courses(&self, user_id: &Uuid) -> Result<Vec<Course>>;
}
