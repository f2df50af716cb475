//! In-memory implementation of every catalog service
//!
//! All tables live behind a single `RwLock`, so each write (including its
//! cascades) happens atomically with respect to every other request.

use crate::core::entity::{Entity, sort_by_creation};
use crate::core::error::{EntityError, FieldErrors, Result, StorageError};
use crate::core::service::{AccountService, CourseQuery, DataService, GraphReader, Mutation};
use crate::entities::account::{Profile, UpdateProfile, User};
use crate::entities::author::Author;
use crate::entities::comment::Comment;
use crate::entities::course::{Course, CourseFilter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

const BACKEND: &str = "in-memory";

#[derive(Default)]
struct Tables {
    authors: HashMap<Uuid, Author>,
    courses: HashMap<Uuid, Course>,
    comments: HashMap<Uuid, Comment>,
    users: HashMap<Uuid, User>,
    /// Keyed by user id
    profiles: HashMap<Uuid, Profile>,
}

/// In-memory store implementation
///
/// Useful for testing and development. Cloning is cheap and every clone
/// shares the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| {
            StorageError::Unavailable {
                backend: BACKEND.to_string(),
                message: format!("Failed to acquire read lock: {}", e),
            }
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| {
            StorageError::Unavailable {
                backend: BACKEND.to_string(),
                message: format!("Failed to acquire write lock: {}", e),
            }
            .into()
        })
    }
}

fn not_found<T: Entity>(id: Uuid) -> crate::core::error::CatalogError {
    EntityError::NotFound {
        entity_type: T::resource_name_singular(),
        id,
    }
    .into()
}

fn missing_reference(id: &Uuid) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

fn ensure_unique<T: Entity>(
    table: &HashMap<Uuid, T>,
    own_id: Uuid,
    field: &'static str,
    value: &str,
    get: impl Fn(&T) -> &str,
) -> Result<()> {
    if table.values().any(|e| e.id() != own_id && get(e) == value) {
        return Err(EntityError::Conflict {
            entity_type: T::resource_name_singular(),
            field,
            value: value.to_string(),
        }
        .into());
    }
    Ok(())
}

impl Tables {
    fn check_author(&self, author: &Author) -> Result<()> {
        ensure_unique(&self.authors, author.id, "name", &author.name, |a| a.name.as_str())?;
        ensure_unique(&self.authors, author.id, "email", &author.email, |a| a.email.as_str())
    }

    fn check_course(&self, course: &Course) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(author_id) = &course.author_id {
            if !self.authors.contains_key(author_id) {
                errors.add("author", missing_reference(author_id));
            }
        }
        if !self.users.contains_key(&course.owner_id) {
            errors.add("owner", missing_reference(&course.owner_id));
        }
        errors.into_result()?;

        ensure_unique(&self.courses, course.id, "title", &course.title, |c| c.title.as_str())
    }

    fn check_comment(&self, comment: &Comment) -> Result<()> {
        let mut errors = FieldErrors::new();
        if !self.courses.contains_key(&comment.course_id) {
            errors.add("course", missing_reference(&comment.course_id));
        }
        if !self.users.contains_key(&comment.owner_id) {
            errors.add("owner", missing_reference(&comment.owner_id));
        }
        errors.into_result()
    }

    fn check_user(&self, user: &User) -> Result<()> {
        ensure_unique(&self.users, user.id, "username", &user.username, |u| u.username.as_str())?;
        ensure_unique(&self.users, user.id, "email", &user.email, |u| u.email.as_str())
    }

    fn remove_author(&mut self, id: &Uuid) {
        self.authors.remove(id);
        let written: Vec<Uuid> = self
            .courses
            .values()
            .filter(|c| c.author_id.as_ref() == Some(id))
            .map(|c| c.id)
            .collect();
        for course_id in written {
            self.remove_course(&course_id);
        }
    }

    fn remove_course(&mut self, id: &Uuid) {
        self.courses.remove(id);
        self.comments.retain(|_, c| c.course_id != *id);
        for profile in self.profiles.values_mut() {
            profile.forget_course(id);
        }
    }

    fn remove_comment(&mut self, id: &Uuid) {
        self.comments.remove(id);
    }

    fn remove_user(&mut self, id: &Uuid) {
        self.users.remove(id);
        self.profiles.remove(id);
        let owned: Vec<Uuid> = self
            .courses
            .values()
            .filter(|c| c.owner_id == *id)
            .map(|c| c.id)
            .collect();
        for course_id in owned {
            self.remove_course(&course_id);
        }
        self.comments.retain(|_, c| c.owner_id != *id);
    }

    /// Profile for an existing user, created with defaults on first access
    fn profile_mut(&mut self, user_id: &Uuid) -> Result<&mut Profile> {
        if !self.users.contains_key(user_id) {
            return Err(not_found::<User>(*user_id));
        }
        Ok(self
            .profiles
            .entry(*user_id)
            .or_insert_with(|| Profile::new(*user_id)))
    }

    fn require_course(&self, course_id: &Uuid) -> Result<()> {
        if self.courses.contains_key(course_id) {
            Ok(())
        } else {
            Err(not_found::<Course>(*course_id))
        }
    }
}

macro_rules! impl_data_service {
    ($entity:ty, $table:ident, $check:ident, $remove:ident) => {
        #[async_trait]
        impl DataService<$entity> for InMemoryStore {
            async fn create(&self, entity: $entity) -> Result<$entity> {
                let mut tables = self.write()?;
                tables.$check(&entity)?;
                tables.$table.insert(entity.id, entity.clone());
                Ok(entity)
            }

            async fn get(&self, id: &Uuid) -> Result<Option<$entity>> {
                Ok(self.read()?.$table.get(id).cloned())
            }

            async fn list(&self) -> Result<Vec<$entity>> {
                let mut items: Vec<$entity> = self.read()?.$table.values().cloned().collect();
                sort_by_creation(&mut items);
                Ok(items)
            }

            async fn update(&self, id: &Uuid, mutate: Mutation<$entity>) -> Result<$entity> {
                let mut tables = self.write()?;
                let mut entity = tables
                    .$table
                    .get(id)
                    .cloned()
                    .ok_or_else(|| not_found::<$entity>(*id))?;
                mutate(&mut entity)?;
                entity.id = *id;
                tables.$check(&entity)?;
                tables.$table.insert(*id, entity.clone());
                Ok(entity)
            }

            async fn delete(&self, id: &Uuid) -> Result<()> {
                let mut tables = self.write()?;
                if !tables.$table.contains_key(id) {
                    return Err(not_found::<$entity>(*id));
                }
                tables.$remove(id);
                Ok(())
            }
        }
    };
}

impl_data_service!(Author, authors, check_author, remove_author);
impl_data_service!(Course, courses, check_course, remove_course);
impl_data_service!(Comment, comments, check_comment, remove_comment);
impl_data_service!(User, users, check_user, remove_user);

#[async_trait]
impl CourseQuery for InMemoryStore {
    async fn find_by_filters(&self, filter: &CourseFilter) -> Result<Vec<Course>> {
        let title = filter.title_needle();
        let author = filter.author_needle();
        let tables = self.read()?;

        let mut matches: Vec<Course> = tables
            .courses
            .values()
            .filter(|course| {
                title
                    .as_deref()
                    .is_none_or(|needle| course.title.to_lowercase().contains(needle))
            })
            .filter(|course| {
                author.as_deref().is_none_or(|needle| {
                    course
                        .author_id
                        .and_then(|id| tables.authors.get(&id))
                        .is_some_and(|a| a.name.to_lowercase().contains(needle))
                })
            })
            .cloned()
            .collect();
        drop(tables);

        sort_by_creation(&mut matches);
        Ok(matches)
    }
}

#[async_trait]
impl GraphReader for InMemoryStore {
    async fn author(&self, id: &Uuid) -> Result<Option<Author>> {
        Ok(self.read()?.authors.get(id).cloned())
    }

    async fn course(&self, id: &Uuid) -> Result<Option<Course>> {
        Ok(self.read()?.courses.get(id).cloned())
    }

    async fn user(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn courses_by_author(&self, author_id: &Uuid) -> Result<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .read()?
            .courses
            .values()
            .filter(|c| c.author_id.as_ref() == Some(author_id))
            .cloned()
            .collect();
        sort_by_creation(&mut courses);
        Ok(courses)
    }

    async fn comments_for_course(&self, course_id: &Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .read()?
            .comments
            .values()
            .filter(|c| c.course_id == *course_id)
            .cloned()
            .collect();
        sort_by_creation(&mut comments);
        Ok(comments)
    }
}

#[async_trait]
impl AccountService for InMemoryStore {
    async fn user(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn profile(&self, user_id: &Uuid) -> Result<Profile> {
        let mut tables = self.write()?;
        Ok(tables.profile_mut(user_id)?.clone())
    }

    async fn update_profile(&self, user_id: &Uuid, changes: &UpdateProfile) -> Result<Profile> {
        let mut tables = self.write()?;
        let profile = tables.profile_mut(user_id)?;
        profile.apply(changes);
        Ok(profile.clone())
    }

    async fn add_saved_course(&self, user_id: &Uuid, course_id: &Uuid) -> Result<Profile> {
        let mut tables = self.write()?;
        tables.require_course(course_id)?;
        let profile = tables.profile_mut(user_id)?;
        profile.save_course(*course_id);
        Ok(profile.clone())
    }

    async fn remove_saved_course(&self, user_id: &Uuid, course_id: &Uuid) -> Result<Profile> {
        let mut tables = self.write()?;
        tables.require_course(course_id)?;
        let profile = tables.profile_mut(user_id)?;
        profile.forget_course(course_id);
        Ok(profile.clone())
    }

    async fn saved_courses(&self, user_id: &Uuid) -> Result<Vec<Course>> {
        let tables = self.read()?;
        if !tables.users.contains_key(user_id) {
            return Err(not_found::<User>(*user_id));
        }
        Ok(tables
            .profiles
            .get(user_id)
            .map(|profile| {
                profile
                    .courses
                    .iter()
                    .filter_map(|id| tables.courses.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CatalogError;
    use crate::entities::account::RegisterRequest;
    use crate::entities::course::CreateCourse;

    fn user(username: &str) -> User {
        User::new(
            RegisterRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: String::new(),
                password_confirmation: String::new(),
                image_url: None,
                country: None,
                quote: None,
            },
            "$argon2id$placeholder".to_string(),
        )
    }

    fn course(title: &str, author: Option<Uuid>, owner: Uuid) -> Course {
        Course::new(
            CreateCourse {
                title: title.to_string(),
                link: "https://example.com".to_string(),
                description: "desc".to_string(),
                image_url: None,
                author,
            },
            owner,
        )
    }

    async fn seeded() -> (InMemoryStore, User, Author) {
        let store = InMemoryStore::new();
        let owner = store.create(user("owner")).await.unwrap();
        let author = store
            .create(Author::new("Ada Lovelace".into(), "ada@x.com".into(), None))
            .await
            .unwrap();
        (store, owner, author)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (store, owner, author) = seeded().await;
        let created = store.create(course("Rust", Some(author.id), owner.id)).await.unwrap();

        let fetched: Option<Course> = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_unique_fields_conflict() {
        let (store, _, _) = seeded().await;

        let err = store
            .create(Author::new("Ada Lovelace".into(), "other@x.com".into(), None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Entity(EntityError::Conflict { field: "name", .. })
        ));

        let err = store.create(user("owner")).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Entity(EntityError::Conflict { field: "username", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_may_keep_own_unique_values() {
        let (store, _, author) = seeded().await;
        let updated = DataService::<Author>::update(
            &store,
            &author.id,
            Box::new(|a: &mut Author| {
                a.image_url = Some("https://img.example.com/ada.png".into());
                Ok(())
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.image_url.as_deref(), Some("https://img.example.com/ada.png"));
    }

    #[tokio::test]
    async fn test_update_cannot_change_id() {
        let (store, _, author) = seeded().await;
        let updated = DataService::<Author>::update(
            &store,
            &author.id,
            Box::new(|a: &mut Author| {
                a.id = Uuid::new_v4();
                Ok(())
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.id, author.id);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_entity_untouched() {
        let (store, _, author) = seeded().await;
        let other = store
            .create(Author::new("Grace Hopper".into(), "grace@x.com".into(), None))
            .await
            .unwrap();

        let err = DataService::<Author>::update(
            &store,
            &other.id,
            Box::new(|a: &mut Author| {
                a.name = "Ada Lovelace".into();
                a.image_url = Some("https://img.example.com/g.png".into());
                Ok(())
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Entity(EntityError::Conflict { field: "name", .. })
        ));

        let stored: Author = store.fetch(&other.id).await.unwrap();
        assert_eq!(stored, other);
        let untouched: Author = store.fetch(&author.id).await.unwrap();
        assert_eq!(untouched, author);
    }

    #[tokio::test]
    async fn test_update_of_missing_entity_is_not_found() {
        let (store, _, _) = seeded().await;
        let err = DataService::<Author>::update(&store, &Uuid::new_v4(), Box::new(|_: &mut Author| Ok(())))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Entity(EntityError::NotFound { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_partial_updates_all_land() {
        let (store, owner, author) = seeded().await;
        let course = store.create(course("Rust", Some(author.id), owner.id)).await.unwrap();
        let comment = store
            .create(Comment::new(String::new(), course.id, owner.id))
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            let id = comment.id;
            tasks.push(tokio::spawn(async move {
                DataService::<Comment>::update(
                    &store,
                    &id,
                    Box::new(|c: &mut Comment| {
                        c.text.push('x');
                        Ok(())
                    }),
                )
                .await
                .map(|_| ())
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored: Comment = store.fetch(&comment.id).await.unwrap();
        assert_eq!(stored.text.len(), 32);
    }

    #[tokio::test]
    async fn test_interleaved_field_updates_keep_both_fields() {
        let (store, _, author) = seeded().await;

        let rename = DataService::<Author>::update(
            &store,
            &author.id,
            Box::new(|a: &mut Author| {
                a.name = "Ada L".into();
                Ok(())
            }),
        );
        let picture = DataService::<Author>::update(
            &store,
            &author.id,
            Box::new(|a: &mut Author| {
                a.image_url = Some("https://i.x/a.png".into());
                Ok(())
            }),
        );
        let (renamed, pictured) = tokio::join!(rename, picture);
        renamed.unwrap();
        pictured.unwrap();

        let stored: Author = store.fetch(&author.id).await.unwrap();
        assert_eq!(stored.name, "Ada L");
        assert_eq!(stored.image_url.as_deref(), Some("https://i.x/a.png"));
    }

    #[tokio::test]
    async fn test_dangling_references_are_field_errors() {
        let (store, owner, _) = seeded().await;
        let missing = Uuid::new_v4();

        let err = store.create(course("Rust", Some(missing), owner.id)).await.unwrap_err();
        let fields = err.field_errors().expect("field errors");
        assert_eq!(
            fields.get("author").unwrap()[0],
            format!("Invalid pk \"{}\" - object does not exist.", missing)
        );

        let err = store
            .create(Comment::new("hi".into(), missing, owner.id))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().get("course").is_some());
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();

        let err = DataService::<Author>::delete(&store, &id).await.unwrap_err();
        assert!(matches!(err, CatalogError::Entity(EntityError::NotFound { .. })));

        let err = DataService::<Comment>::fetch(&store, &id).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Entity(EntityError::NotFound { entity_type: "comment", .. })
        ));
    }

    #[tokio::test]
    async fn test_deleting_course_removes_comments_and_saved_refs() {
        let (store, owner, author) = seeded().await;
        let rust = store.create(course("Rust", Some(author.id), owner.id)).await.unwrap();
        let other = store.create(course("Go", Some(author.id), owner.id)).await.unwrap();

        store.create(Comment::new("one".into(), rust.id, owner.id)).await.unwrap();
        store.create(Comment::new("two".into(), rust.id, owner.id)).await.unwrap();
        let kept = store.create(Comment::new("three".into(), other.id, owner.id)).await.unwrap();
        store.add_saved_course(&owner.id, &rust.id).await.unwrap();

        DataService::<Course>::delete(&store, &rust.id).await.unwrap();

        let comments: Vec<Comment> = store.list().await.unwrap();
        assert_eq!(comments, vec![kept]);
        assert!(store.profile(&owner.id).await.unwrap().courses.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_author_cascades_to_courses() {
        let (store, owner, author) = seeded().await;
        let written = store.create(course("Rust", Some(author.id), owner.id)).await.unwrap();
        let orphan = store.create(course("Go", None, owner.id)).await.unwrap();
        store.create(Comment::new("x".into(), written.id, owner.id)).await.unwrap();

        DataService::<Author>::delete(&store, &author.id).await.unwrap();

        let courses: Vec<Course> = store.list().await.unwrap();
        assert_eq!(courses, vec![orphan]);
        let comments: Vec<Comment> = store.list().await.unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let (store, owner, author) = seeded().await;
        let other = store.create(user("other")).await.unwrap();
        let owned = store.create(course("Rust", Some(author.id), owner.id)).await.unwrap();
        let foreign = store.create(course("Go", Some(author.id), other.id)).await.unwrap();
        store.create(Comment::new("mine".into(), foreign.id, owner.id)).await.unwrap();
        let theirs = store.create(Comment::new("theirs".into(), foreign.id, other.id)).await.unwrap();
        store.profile(&owner.id).await.unwrap();

        DataService::<User>::delete(&store, &owner.id).await.unwrap();

        assert!(DataService::<Course>::get(&store, &owned.id).await.unwrap().is_none());
        let comments: Vec<Comment> = store.list().await.unwrap();
        assert_eq!(comments, vec![theirs]);
        assert!(store.profile(&owner.id).await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_filters_is_case_insensitive_and_anded() {
        let (store, owner, ada) = seeded().await;
        let grace = store
            .create(Author::new("Grace Hopper".into(), "grace@x.com".into(), None))
            .await
            .unwrap();

        let rust_ada = store.create(course("Intro to Rust", Some(ada.id), owner.id)).await.unwrap();
        let rust_grace = store.create(course("Advanced RUST", Some(grace.id), owner.id)).await.unwrap();
        store.create(course("Cobol", Some(grace.id), owner.id)).await.unwrap();
        store.create(course("Rust without author", None, owner.id)).await.unwrap();

        let filter = CourseFilter {
            title: Some("rust".into()),
            author: None,
        };
        assert_eq!(store.find_by_filters(&filter).await.unwrap().len(), 3);

        let filter = CourseFilter {
            title: Some("rust".into()),
            author: Some("HOPPER".into()),
        };
        assert_eq!(store.find_by_filters(&filter).await.unwrap(), vec![rust_grace]);

        let filter = CourseFilter {
            title: None,
            author: Some("ada".into()),
        };
        assert_eq!(store.find_by_filters(&filter).await.unwrap(), vec![rust_ada]);

        assert_eq!(store.find_by_filters(&CourseFilter::default()).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let (store, owner, author) = seeded().await;
        let rust = store.create(course("Rust", Some(author.id), owner.id)).await.unwrap();

        let profile = store.profile(&owner.id).await.unwrap();
        assert_eq!(profile.country, "Unknown");

        let profile = store
            .update_profile(
                &owner.id,
                &UpdateProfile {
                    country: Some("Malaysia".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.country, "Malaysia");
        assert_eq!(profile.quote, "Quote");

        store.add_saved_course(&owner.id, &rust.id).await.unwrap();
        store.add_saved_course(&owner.id, &rust.id).await.unwrap();
        assert_eq!(store.saved_courses(&owner.id).await.unwrap(), vec![rust.clone()]);

        store.remove_saved_course(&owner.id, &rust.id).await.unwrap();
        assert!(store.saved_courses(&owner.id).await.unwrap().is_empty());

        let err = store
            .add_saved_course(&owner.id, &Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let (store, owner, _) = seeded().await;
        let found = store.find_by_email("owner@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(owner.id));
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
