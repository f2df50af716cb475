//! Comment entity model

use crate::core::entity::Entity;
use crate::core::validation::{Normalize, filters};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub course_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: String, course_id: Uuid, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            course_id,
            owner_id,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, changes: UpdateComment) {
        if let Some(text) = changes.text {
            self.text = text;
        }
    }
}

impl Entity for Comment {
    fn resource_name() -> &'static str {
        "comments"
    }

    fn resource_name_singular() -> &'static str {
        "comment"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 300, message = "Ensure this field has between 1 and 300 characters."))]
    pub text: String,

    /// Course id
    pub course: Uuid,
}

impl Normalize for CreateComment {
    fn normalize(&mut self) {
        filters::trim(&mut self.text);
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateComment {
    #[validate(length(min = 1, max = 300, message = "Ensure this field has between 1 and 300 characters."))]
    pub text: Option<String>,
}

impl Normalize for UpdateComment {
    fn normalize(&mut self) {
        if let Some(text) = self.text.as_mut() {
            filters::trim(text);
        }
    }
}
