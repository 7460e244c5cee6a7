use crate::api::models::{CreateContactRequest, NewContact};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name, email, and phone are required";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", REQUIRED_FIELDS_MESSAGE)]
    MissingRequired,
    #[error("{}", INVALID_EMAIL_MESSAGE)]
    InvalidEmail,
}

/// Form fields of a contact, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Email,
    Phone,
    Message,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Client-side check for a single field. Blank means whitespace-only here,
/// matching what the form considers empty.
pub fn validate_field(field: Field, value: &str) -> Option<&'static str> {
    match field {
        Field::Name if value.trim().is_empty() => Some("Name is required"),
        Field::Email if value.trim().is_empty() => Some("Email is required"),
        Field::Email if !is_valid_email(value) => Some(INVALID_EMAIL_MESSAGE),
        Field::Phone if value.trim().is_empty() => Some("Phone is required"),
        _ => None,
    }
}

/// Server-side check for a create request. Presence is checked before the
/// email pattern, and an absent message becomes the empty string.
pub fn validate_create(req: CreateContactRequest) -> Result<NewContact, ValidationError> {
    let present = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(name), Some(email), Some(phone)) =
        (present(req.name), present(req.email), present(req.phone))
    else {
        return Err(ValidationError::MissingRequired);
    };
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(NewContact {
        name,
        email,
        phone,
        message: req.message.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, phone: &str) -> CreateContactRequest {
        CreateContactRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            message: None,
        }
    }

    #[test]
    fn email_pattern() {
        for bad in ["bob", "bob@x", "bob.com", "", "bob @x.com", "@.", "a@b."] {
            assert!(!is_valid_email(bad), "{bad:?} should be rejected");
        }
        for good in ["bob@x.com", "a.b@c.d.e", "x@y.z"] {
            assert!(is_valid_email(good), "{good:?} should pass");
        }
    }

    #[test]
    fn create_requires_every_mandatory_field() {
        let cases = [
            request("", "ann@x.com", "1"),
            request("Ann", "", "1"),
            request("Ann", "ann@x.com", ""),
            CreateContactRequest {
                name: Some("Ann".into()),
                email: Some("not-an-email".into()),
                ..Default::default()
            },
        ];
        for case in cases {
            assert_eq!(validate_create(case), Err(ValidationError::MissingRequired));
        }
    }

    #[test]
    fn create_rejects_bad_email_after_presence() {
        assert_eq!(
            validate_create(request("Ann", "bob@x", "1")),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(ValidationError::InvalidEmail.to_string(), INVALID_EMAIL_MESSAGE);
    }

    #[test]
    fn create_defaults_message() {
        let contact = validate_create(request("Ann", "ann@x.com", "555-1111")).unwrap();
        assert_eq!(contact.message, "");
        assert_eq!(contact.name, "Ann");
    }

    #[test]
    fn field_messages() {
        assert_eq!(validate_field(Field::Name, "  "), Some("Name is required"));
        assert_eq!(validate_field(Field::Email, ""), Some("Email is required"));
        assert_eq!(validate_field(Field::Email, "bob"), Some(INVALID_EMAIL_MESSAGE));
        assert_eq!(validate_field(Field::Phone, ""), Some("Phone is required"));
        assert_eq!(validate_field(Field::Message, ""), None);
        assert_eq!(validate_field(Field::Email, "bob@x.com"), None);
    }
}
