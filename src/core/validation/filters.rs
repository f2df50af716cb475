//! Reusable field filters
//!
//! These filters transform payload fields before validation

/// Payloads that clean up their own fields before validation runs
pub trait Normalize {
    fn normalize(&mut self) {}
}

/// Filter: trim whitespace from string
pub fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Filter: trim an optional string, dropping it when nothing is left
pub fn trim_optional(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        trim(inner);
        if inner.is_empty() {
            *value = None;
        }
    }
}

/// Filter: trim an email and lowercase its domain part
///
/// The local part is case-sensitive and kept as typed.
pub fn email(value: &mut String) {
    trim(value);
    if let Some((local, domain)) = value.rsplit_once('@') {
        *value = format!("{}@{}", local, domain.to_lowercase());
    }
}

/// [`email`] for optional fields
pub fn email_optional(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        email(inner);
    }
}
