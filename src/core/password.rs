//! Password policy and hashing
//!
//! Registration delegates strength checks to [`PasswordPolicy`], which runs
//! the usual account-framework validators:
//!
//! - minimum length
//! - not entirely numeric
//! - not a well-known common password
//! - not too similar to the username or email
//!
//! Every failing rule is reported, not just the first one, so the client gets
//! the whole list in a single round trip.
//!
//! Hashes are Argon2id in PHC string format.

use crate::config::PasswordConfig;
use crate::core::error::{CatalogError, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

/// Shortest username/email fragment considered for the similarity rule
const MIN_SIMILARITY_FRAGMENT: usize = 3;

/// Password strength policy
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub reject_common: bool,
    pub reject_numeric: bool,
    pub reject_similar: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            reject_common: true,
            reject_numeric: true,
            reject_similar: true,
        }
    }
}

impl PasswordPolicy {
    pub fn from_config(config: &PasswordConfig) -> Self {
        Self {
            min_length: config.min_length,
            reject_common: config.reject_common,
            reject_numeric: config.reject_numeric,
            reject_similar: config.reject_similar,
        }
    }

    /// Validate a password with user context (username, email)
    ///
    /// Returns every violated rule as a human-readable message.
    pub fn validate(
        &self,
        password: &str,
        username: Option<&str>,
        email: Option<&str>,
    ) -> std::result::Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if self.reject_similar {
            if let Some(username) = username {
                if is_similar(password, username) {
                    problems.push("The password is too similar to the username.".to_string());
                }
            }
            if let Some(local) = email.and_then(|e| e.split('@').next()) {
                if is_similar(password, local) {
                    problems.push("The password is too similar to the email address.".to_string());
                }
            }
        }

        if password.chars().count() < self.min_length {
            problems.push(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min_length
            ));
        }

        if self.reject_common && COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
            problems.push("This password is too common.".to_string());
        }

        if self.reject_numeric && !password.is_empty() && password.chars().all(|c| c.is_ascii_digit())
        {
            problems.push("This password is entirely numeric.".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

fn is_similar(password: &str, attribute: &str) -> bool {
    if attribute.chars().count() < MIN_SIMILARITY_FRAGMENT {
        return false;
    }
    let password = password.to_lowercase();
    let attribute = attribute.to_lowercase();
    password.contains(&attribute) || attribute.contains(&password)
}

/// Hash a password with Argon2 and a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CatalogError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC hash
///
/// An unparseable hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Frequently used passwords, matched case-insensitively
static COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789",
    "12345", "1234", "111111", "1234567", "dragon",
    "123123", "baseball", "abc123", "football", "monkey",
    "letmein", "shadow", "master", "666666", "qwertyuiop",
    "123321", "mustang", "1234567890", "michael", "654321",
    "superman", "1qaz2wsx", "7777777", "121212", "000000",
    "qazwsx", "123qwe", "killer", "trustno1", "jordan",
    "jennifer", "zxcvbnm", "asdfgh", "hunter", "buster",
    "soccer", "harley", "batman", "andrew", "tigger",
    "sunshine", "iloveyou", "charlie", "robert", "thomas",
    "hockey", "ranger", "daniel", "starwars", "computer",
    "michelle", "jessica", "pepper", "11111111", "freedom",
    "princess", "password1", "password123", "passw0rd", "admin",
    "admin123", "qwerty123", "welcome", "welcome1", "changeme",
    "letmein1", "test123", "testing", "default", "secret",
];
