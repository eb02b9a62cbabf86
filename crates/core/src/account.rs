//! Account registration input and validation.

use serde::Deserialize;

use crate::address::FieldErrors;
use crate::types::Email;

/// Shortest password the store API accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Raw registration form input, as submitted.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A registration that passed validation. Name and email are trimmed, the
/// password is kept as typed.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: String,
}

impl RegistrationForm {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once so the form can mark them all.
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required");
        }

        let email = self.email.trim();
        let email = if email.is_empty() {
            errors.add("email", "Email is required");
            None
        } else {
            Email::parse(email)
                .map_err(|_| errors.add("email", "Email is invalid"))
                .ok()
        };

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        if self.confirm_password.is_empty() {
            errors.add("confirmPassword", "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(Registration {
                name: name.to_owned(),
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
