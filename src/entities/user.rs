use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::Error;

// The password hash is deliberately not a field here: it lives in its own
// column and never enters the serialized document, so neither API responses
// nor stored JSON can leak it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub places: Vec<Uuid>,
}

impl User {
    pub fn new(name: String, email: String, image: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            image,
            places: Vec::new(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
}

impl UserDraft {
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty()
            || !plausible_email(&self.email)
            || self.password.chars().count() < 6
            || self.image.trim().is_empty()
        {
            return Err(Error::validation_error(
                "Invalid inputs passed, please check your data.",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("image", &self.image)
            .finish()
    }
}

fn plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
fn sample_draft() -> UserDraft {
    UserDraft {
        name: "Max".into(),
        email: "max@example.com".into(),
        password: "test123".into(),
        image: "uploads/images/max.png".into(),
    }
}

#[test]
fn new_user_starts_with_no_places() {
    let user = User::new(
        "Max".into(),
        "max@example.com".into(),
        "uploads/images/max.png".into(),
    );

    assert!(user.places.is_empty());
}

#[test]
fn valid_signup_draft_passes_validation() {
    assert!(sample_draft().validate().is_ok());
}

#[test]
fn short_password_fails_validation() {
    let mut draft = sample_draft();
    draft.password = "12345".into();

    assert!(draft.validate().unwrap_err().is_validation_error());
}

#[test]
fn implausible_emails_fail_validation() {
    for email in ["", "max", "max@", "@example.com", "max@localhost"] {
        let mut draft = sample_draft();
        draft.email = email.into();

        assert!(
            draft.validate().unwrap_err().is_validation_error(),
            "accepted {:?}",
            email
        );
    }
}

#[test]
fn draft_debug_output_redacts_the_password() {
    let rendered = format!("{:?}", sample_draft());

    assert!(!rendered.contains("test123"));
    assert!(rendered.contains("<redacted>"));
}
