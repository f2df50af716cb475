//! Builds response payloads from entities
//!
//! Expansion is fixed and driven by the caller:
//!
//! ```text
//! Author(populated)  -> courses: [Course(populated)] whose author is Author(flat)
//! Course(populated)  -> author: Author(flat), owner: User, comments: [Comment(populated)]
//! Comment(populated) -> owner: User
//! ```
//!
//! Every relation is removed by cascade together with whatever references it,
//! so a relation that disappears mid-render means the entity being rendered
//! was deleted concurrently. Single renders then fail with `NotFound` and
//! list renders drop the entity.

use super::views::*;
use crate::core::entity::Entity;
use crate::core::error::{CatalogError, EntityError, Result};
use crate::core::service::GraphReader;
use crate::entities::account::User;
use crate::entities::author::Author;
use crate::entities::comment::Comment;
use crate::entities::course::Course;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct Renderer {
    graph: Arc<dyn GraphReader>,
}

impl Renderer {
    pub fn new(graph: Arc<dyn GraphReader>) -> Self {
        Self { graph }
    }

    pub async fn author(&self, author: &Author, expansion: Expansion) -> Result<AuthorRepr> {
        let flat = AuthorView::from(author);
        if expansion == Expansion::Flat {
            return Ok(AuthorRepr::Flat(flat));
        }

        let mut courses = Vec::new();
        for course in self.graph.courses_by_author(&author.id).await? {
            // The author is already known, so it is not looked up again.
            if let Some(course) = still_present(self.populate_course(&course, Some(flat.clone())).await)? {
                courses.push(course);
            }
        }

        Ok(AuthorRepr::Populated(PopulatedAuthor {
            author: flat,
            courses,
        }))
    }

    pub async fn authors(&self, authors: &[Author], expansion: Expansion) -> Result<Vec<AuthorRepr>> {
        let mut out = Vec::with_capacity(authors.len());
        for author in authors {
            if let Some(rendered) = still_present(self.author(author, expansion).await)? {
                out.push(rendered);
            }
        }
        Ok(out)
    }

    pub async fn course(&self, course: &Course, expansion: Expansion) -> Result<CourseRepr> {
        match expansion {
            Expansion::Flat => Ok(CourseRepr::Flat(CourseView::from(course))),
            Expansion::Populated => {
                let author = match course.author_id {
                    Some(author_id) => {
                        let author = self
                            .graph
                            .author(&author_id)
                            .await?
                            .ok_or_else(|| vanished::<Course>(course.id))?;
                        Some(AuthorView::from(&author))
                    }
                    None => None,
                };
                Ok(CourseRepr::Populated(self.populate_course(course, author).await?))
            }
        }
    }

    pub async fn courses(&self, courses: &[Course], expansion: Expansion) -> Result<Vec<CourseRepr>> {
        let mut out = Vec::with_capacity(courses.len());
        for course in courses {
            if let Some(rendered) = still_present(self.course(course, expansion).await)? {
                out.push(rendered);
            }
        }
        Ok(out)
    }

    pub async fn comment(&self, comment: &Comment, expansion: Expansion) -> Result<CommentRepr> {
        match expansion {
            Expansion::Flat => Ok(CommentRepr::Flat(CommentView::from(comment))),
            Expansion::Populated => Ok(CommentRepr::Populated(self.populate_comment(comment).await?)),
        }
    }

    pub async fn comments(&self, comments: &[Comment], expansion: Expansion) -> Result<Vec<CommentRepr>> {
        let mut out = Vec::with_capacity(comments.len());
        for comment in comments {
            if let Some(rendered) = still_present(self.comment(comment, expansion).await)? {
                out.push(rendered);
            }
        }
        Ok(out)
    }

    async fn populate_course(&self, course: &Course, author: Option<AuthorView>) -> Result<PopulatedCourse> {
        let owner = self.owner::<Course>(course.id, course.owner_id).await?;

        let mut comments = Vec::new();
        for comment in self.graph.comments_for_course(&course.id).await? {
            if let Some(comment) = still_present(self.populate_comment(&comment).await)? {
                comments.push(comment);
            }
        }

        Ok(PopulatedCourse {
            id: course.id,
            title: course.title.clone(),
            link: course.link.clone(),
            description: course.description.clone(),
            image_url: course.image_url.clone(),
            author,
            owner,
            comments,
            created_at: course.created_at,
        })
    }

    async fn populate_comment(&self, comment: &Comment) -> Result<PopulatedComment> {
        Ok(PopulatedComment {
            id: comment.id,
            text: comment.text.clone(),
            course: comment.course_id,
            owner: self.owner::<Comment>(comment.id, comment.owner_id).await?,
            created_at: comment.created_at,
        })
    }

    async fn owner<T: Entity>(&self, id: Uuid, owner_id: Uuid) -> Result<UserView> {
        let user: User = self
            .graph
            .user(&owner_id)
            .await?
            .ok_or_else(|| vanished::<T>(id))?;
        Ok(UserView::from(&user))
    }
}

fn vanished<T: Entity>(id: Uuid) -> CatalogError {
    tracing::debug!(entity = T::resource_name_singular(), %id, "entity deleted while rendering");
    EntityError::NotFound {
        entity_type: T::resource_name_singular(),
        id,
    }
    .into()
}

/// `None` when the rendered entity vanished, so lists can skip it
fn still_present<T>(rendered: Result<T>) -> Result<Option<T>> {
    match rendered {
        Ok(value) => Ok(Some(value)),
        Err(CatalogError::Entity(EntityError::NotFound { .. })) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::DataService;
    use crate::entities::account::RegisterRequest;
    use crate::entities::course::CreateCourse;
    use crate::storage::InMemoryStore;

    async fn fixture() -> (InMemoryStore, Renderer, Author, User) {
        let store = InMemoryStore::new();
        let renderer = Renderer::new(Arc::new(store.clone()));

        let user = store
            .create(User::new(
                RegisterRequest {
                    username: "reader".into(),
                    email: "reader@example.com".into(),
                    password: String::new(),
                    password_confirmation: String::new(),
                    image_url: None,
                    country: Some("MY".into()),
                    quote: None,
                },
                "$argon2id$placeholder".into(),
            ))
            .await
            .unwrap();
        let author = store
            .create(Author::new("Ada".into(), "ada@x.com".into(), None))
            .await
            .unwrap();

        for title in ["Rust", "Go"] {
            let course = store
                .create(Course::new(
                    CreateCourse {
                        title: title.into(),
                        link: "https://example.com".into(),
                        description: "desc".into(),
                        image_url: None,
                        author: Some(author.id),
                    },
                    user.id,
                ))
                .await
                .unwrap();
            store
                .create(Comment::new(format!("on {}", title), course.id, user.id))
                .await
                .unwrap();
        }

        (store, renderer, author, user)
    }

    #[tokio::test]
    async fn test_populated_author_nests_courses_with_flat_author() {
        let (_, renderer, author, user) = fixture().await;

        let AuthorRepr::Populated(populated) =
            renderer.author(&author, Expansion::Populated).await.unwrap()
        else {
            panic!("expected populated author");
        };

        assert_eq!(populated.courses.len(), 2);
        for course in &populated.courses {
            assert_eq!(course.author, Some(AuthorView::from(&author)));
            assert_eq!(course.comments.len(), 1);
            assert_eq!(course.comments[0].owner.id, user.id);
        }

        let json = serde_json::to_value(&populated).unwrap();
        assert_eq!(json["name"], "Ada");
        let nested_author = &json["courses"][0]["author"];
        assert!(nested_author.get("courses").is_none());
        assert!(json["courses"][0]["owner"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_flat_views_carry_ids() {
        let (store, renderer, author, user) = fixture().await;
        let courses: Vec<Course> = store.list().await.unwrap();

        let CourseRepr::Flat(flat) = renderer.course(&courses[0], Expansion::Flat).await.unwrap()
        else {
            panic!("expected flat course");
        };
        assert_eq!(flat.author, Some(author.id));
        assert_eq!(flat.owner, user.id);

        let json = serde_json::to_value(renderer.author(&author, Expansion::Flat).await.unwrap()).unwrap();
        assert!(json.get("courses").is_none());
    }

    #[tokio::test]
    async fn test_populated_course_without_author() {
        let (store, renderer, _, user) = fixture().await;
        let course = store
            .create(Course::new(
                CreateCourse {
                    title: "Orphan".into(),
                    link: "https://example.com".into(),
                    description: "desc".into(),
                    image_url: None,
                    author: None,
                },
                user.id,
            ))
            .await
            .unwrap();

        let json = serde_json::to_value(renderer.course(&course, Expansion::Populated).await.unwrap()).unwrap();
        assert!(json["author"].is_null());
        assert_eq!(json["owner"]["username"], "reader");
        assert_eq!(json["comments"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_course_deleted_mid_render() {
        let (store, renderer, author, _) = fixture().await;
        let mut courses: Vec<Course> = store.list().await.unwrap();
        let stale = courses.remove(0);

        // The author's deletion cascades to the course already fetched above.
        DataService::<Author>::delete(&store, &author.id).await.unwrap();

        let err = renderer.course(&stale, Expansion::Populated).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Entity(EntityError::NotFound { entity_type: "course", id }) if id == stale.id
        ));

        let listed = renderer.courses(&[stale], Expansion::Populated).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_comment_by_deleted_owner_is_dropped_from_listing() {
        let (store, renderer, _, user) = fixture().await;
        let comments: Vec<Comment> = store.list().await.unwrap();

        DataService::<User>::delete(&store, &user.id).await.unwrap();

        let err = renderer.comment(&comments[0], Expansion::Populated).await.unwrap_err();
        assert!(matches!(err, CatalogError::Entity(EntityError::NotFound { entity_type: "comment", .. })));
        assert!(renderer.comments(&comments, Expansion::Populated).await.unwrap().is_empty());
        assert_eq!(renderer.comments(&comments, Expansion::Flat).await.unwrap().len(), comments.len());
    }

    #[tokio::test]
    async fn test_populated_comment_expands_owner() {
        let (store, renderer, _, user) = fixture().await;
        let comments: Vec<Comment> = store.list().await.unwrap();

        let json = serde_json::to_value(
            renderer.comment(&comments[0], Expansion::Populated).await.unwrap(),
        )
        .unwrap();
        assert_eq!(json["owner"]["id"], user.id.to_string());
        assert_eq!(json["owner"]["country"], "MY");
    }
}
