//! Course entity model

use crate::core::entity::Entity;
use crate::core::validation::{Normalize, filters, validators};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Nullable: a course may exist without a known author
    pub author_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn new(payload: CreateCourse, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: payload.title,
            link: payload.link,
            description: payload.description,
            image_url: payload.image_url,
            author_id: payload.author,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Overwrite only the fields present in `changes`
    ///
    /// The author can be reassigned but not cleared, and the owner never
    /// changes.
    pub fn apply(&mut self, changes: UpdateCourse) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(link) = changes.link {
            self.link = link;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(image_url) = changes.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(author) = changes.author {
            self.author_id = Some(author);
        }
    }
}

impl Entity for Course {
    fn resource_name() -> &'static str {
        "courses"
    }

    fn resource_name_singular() -> &'static str {
        "course"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 80, message = "Ensure this field has between 1 and 80 characters."))]
    pub title: String,

    #[validate(url(message = "Enter a valid URL."))]
    pub link: String,

    #[validate(custom(function = "validators::not_blank"))]
    pub description: String,

    #[validate(
        url(message = "Enter a valid URL."),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    #[serde(default)]
    pub image_url: Option<String>,

    /// Author id
    #[serde(default)]
    pub author: Option<Uuid>,
}

impl Normalize for CreateCourse {
    fn normalize(&mut self) {
        filters::trim(&mut self.title);
        filters::trim(&mut self.link);
        filters::trim_optional(&mut self.image_url);
    }
}

/// Partial update: absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCourse {
    #[validate(length(min = 1, max = 80, message = "Ensure this field has between 1 and 80 characters."))]
    pub title: Option<String>,

    #[validate(url(message = "Enter a valid URL."))]
    pub link: Option<String>,

    #[validate(custom(function = "validators::not_blank"))]
    pub description: Option<String>,

    #[validate(
        url(message = "Enter a valid URL."),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    pub image_url: Option<String>,

    pub author: Option<Uuid>,
}

impl Normalize for UpdateCourse {
    fn normalize(&mut self) {
        if let Some(title) = self.title.as_mut() {
            filters::trim(title);
        }
        if let Some(link) = self.link.as_mut() {
            filters::trim(link);
        }
        filters::trim_optional(&mut self.image_url);
    }
}

/// Query-string filters for `GET /courses`
///
/// Both filters are case-insensitive substring matches and are AND-ed.
/// Empty values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilter {
    /// Substring of the course title
    pub title: Option<String>,
    /// Substring of the author's name
    pub author: Option<String>,
}

impl CourseFilter {
    pub fn title_needle(&self) -> Option<String> {
        needle(self.title.as_deref())
    }

    pub fn author_needle(&self) -> Option<String> {
        needle(self.author.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.title_needle().is_none() && self.author_needle().is_none()
    }
}

fn needle(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}
