//! User and profile models
//!
//! `User` holds credentials and is never serialized directly: responses go
//! through [`UserView`](crate::serialization::UserView), which has no
//! password fields.

use crate::core::entity::Entity;
use crate::core::validation::{Normalize, filters};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_COUNTRY: &str = "Unknown";
pub const DEFAULT_QUOTE: &str = "Quote";

#[derive(Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub image_url: Option<String>,
    pub country: Option<String>,
    pub quote: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl User {
    pub fn new(registration: RegisterRequest, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: registration.username,
            email: registration.email,
            password_hash,
            image_url: registration.image_url,
            country: registration.country,
            quote: registration.quote,
            created_at: Utc::now(),
        }
    }
}

impl Entity for User {
    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One-to-one companion of a [`User`], created on first access
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: Uuid,
    pub image_url: Option<String>,
    pub country: String,
    pub quote: String,
    /// Saved course ids, in the order they were added, without duplicates
    pub courses: Vec<Uuid>,
}

impl Profile {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            image_url: None,
            country: DEFAULT_COUNTRY.to_string(),
            quote: DEFAULT_QUOTE.to_string(),
            courses: Vec::new(),
        }
    }

    pub fn apply(&mut self, changes: &UpdateProfile) {
        if let Some(image_url) = &changes.image_url {
            self.image_url = Some(image_url.clone());
        }
        if let Some(country) = &changes.country {
            self.country = country.clone();
        }
        if let Some(quote) = &changes.quote {
            self.quote = quote.clone();
        }
    }

    /// Returns false when the course was already saved
    pub fn save_course(&mut self, course_id: Uuid) -> bool {
        if self.courses.contains(&course_id) {
            return false;
        }
        self.courses.push(course_id);
        true
    }

    /// Returns false when the course was not saved
    pub fn forget_course(&mut self, course_id: &Uuid) -> bool {
        let before = self.courses.len();
        self.courses.retain(|id| id != course_id);
        self.courses.len() != before
    }
}

#[derive(Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."),
        custom(function = "crate::core::validation::validators::username")
    )]
    pub username: String,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub email: String,

    pub password: String,

    pub password_confirmation: String,

    #[validate(
        url(message = "Enter a valid URL."),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    #[serde(default)]
    pub image_url: Option<String>,

    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub quote: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl RegisterRequest {
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirmation
    }
}

impl Normalize for RegisterRequest {
    fn normalize(&mut self) {
        filters::trim(&mut self.username);
        filters::email(&mut self.email);
        filters::trim_optional(&mut self.image_url);
        filters::trim_optional(&mut self.country);
        filters::trim_optional(&mut self.quote);
    }
}

#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Normalize for LoginRequest {
    fn normalize(&mut self) {
        filters::email(&mut self.email);
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(
        url(message = "Enter a valid URL."),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    pub image_url: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Ensure this field has between 1 and 100 characters."))]
    pub country: Option<String>,

    pub quote: Option<String>,
}

impl Normalize for UpdateProfile {
    fn normalize(&mut self) {
        filters::trim_optional(&mut self.image_url);
        if let Some(country) = self.country.as_mut() {
            filters::trim(country);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirmation: &str) -> RegisterRequest {
        RegisterRequest {
            username: "a".into(),
            email: "a@x.com".into(),
            password: password.into(),
            password_confirmation: confirmation.into(),
            image_url: None,
            country: None,
            quote: None,
        }
    }

    #[test]
    fn test_profile_defaults() {
        let profile = Profile::new(Uuid::new_v4());
        assert_eq!(profile.country, "Unknown");
        assert_eq!(profile.quote, "Quote");
        assert!(profile.courses.is_empty());
    }

    #[test]
    fn test_saved_courses_are_a_set() {
        let mut profile = Profile::new(Uuid::new_v4());
        let course = Uuid::new_v4();

        assert!(profile.save_course(course));
        assert!(!profile.save_course(course));
        assert_eq!(profile.courses, vec![course]);

        assert!(profile.forget_course(&course));
        assert!(!profile.forget_course(&course));
    }

    #[test]
    fn test_passwords_match() {
        assert!(registration("Abc12345", "Abc12345").passwords_match());
        assert!(!registration("Abc12345", "wrong").passwords_match());
    }

    #[test]
    fn test_debug_never_prints_secrets() {
        let rendered = format!("{:?}", registration("Abc12345", "Abc12345"));
        assert!(!rendered.contains("Abc12345"));

        let user = User::new(registration("Abc12345", "Abc12345"), "$argon2id$hash".into());
        assert!(!format!("{:?}", user).contains("argon2"));
    }

    #[test]
    fn test_username_rule() {
        let mut bad = registration("Abc12345", "Abc12345");
        bad.username = "has space".into();
        assert!(bad.validate().unwrap_err().field_errors().contains_key("username"));
    }
}
