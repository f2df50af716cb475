//! Author entity model

use crate::core::entity::Entity;
use crate::core::validation::{Normalize, filters};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Author {
    pub fn new(name: String, email: String, image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            image_url,
            created_at: Utc::now(),
        }
    }

    /// Overwrite only the fields present in `changes`
    pub fn apply(&mut self, changes: UpdateAuthor) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(image_url) = changes.image_url {
            self.image_url = Some(image_url);
        }
    }
}

impl Entity for Author {
    fn resource_name() -> &'static str {
        "authors"
    }

    fn resource_name_singular() -> &'static str {
        "author"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 80, message = "Ensure this field has between 1 and 80 characters."))]
    pub name: String,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub email: String,

    #[validate(
        url(message = "Enter a valid URL."),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Normalize for CreateAuthor {
    fn normalize(&mut self) {
        filters::trim(&mut self.name);
        filters::email(&mut self.email);
        filters::trim_optional(&mut self.image_url);
    }
}

impl From<CreateAuthor> for Author {
    fn from(payload: CreateAuthor) -> Self {
        Author::new(payload.name, payload.email, payload.image_url)
    }
}

/// Partial update: absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 80, message = "Ensure this field has between 1 and 80 characters."))]
    pub name: Option<String>,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub email: Option<String>,

    #[validate(
        url(message = "Enter a valid URL."),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    pub image_url: Option<String>,
}

impl Normalize for UpdateAuthor {
    fn normalize(&mut self) {
        if let Some(name) = self.name.as_mut() {
            filters::trim(name);
        }
        filters::email_optional(&mut self.email);
        filters::trim_optional(&mut self.image_url);
    }
}
