//! Response view models
//!
//! Flat views carry foreign keys as bare ids and no relation lists.
//! Populated views expand relations by exactly one level, and whatever they
//! embed is always a flat view, so no view can contain itself.

use crate::entities::account::{Profile, User};
use crate::entities::author::Author;
use crate::entities::comment::Comment;
use crate::entities::course::Course;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// How far a response expands an entity's relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Own fields with foreign keys as ids
    Flat,
    /// Relations expanded one level
    Populated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: author.name.clone(),
            email: author.email.clone(),
            image_url: author.image_url.clone(),
        }
    }
}

/// Public user fields; there is no password field to leak
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub country: Option<String>,
    pub quote: Option<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            image_url: user.image_url.clone(),
            country: user.country.clone(),
            quote: user.quote.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseView {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub description: String,
    pub image_url: Option<String>,
    pub author: Option<Uuid>,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            link: course.link.clone(),
            description: course.description.clone(),
            image_url: course.image_url.clone(),
            author: course.author_id,
            owner: course.owner_id,
            created_at: course.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub course: Uuid,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text.clone(),
            course: comment.course_id,
            owner: comment.owner_id,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedComment {
    pub id: Uuid,
    pub text: String,
    pub course: Uuid,
    pub owner: UserView,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedCourse {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub description: String,
    pub image_url: Option<String>,
    pub author: Option<AuthorView>,
    pub owner: UserView,
    pub comments: Vec<PopulatedComment>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedAuthor {
    #[serde(flatten)]
    pub author: AuthorView,
    pub courses: Vec<PopulatedCourse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub user: Uuid,
    pub image_url: Option<String>,
    pub country: String,
    pub quote: String,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            user: profile.user_id,
            image_url: profile.image_url.clone(),
            country: profile.country.clone(),
            quote: profile.quote.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AuthorRepr {
    Flat(AuthorView),
    Populated(PopulatedAuthor),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CourseRepr {
    Flat(CourseView),
    Populated(PopulatedCourse),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommentRepr {
    Flat(CommentView),
    Populated(PopulatedComment),
}
