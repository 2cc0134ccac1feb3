//! Credential input and the local checks run before it leaves the client.
//!
//! These checks only save a round-trip; the backend remains the authority on what a
//! valid email or password is.

use crate::error::ValidationError;

/// Email and password for a password sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
}

impl PasswordCredentials {
    /// Trim the email and check both fields.
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Details for creating a password account.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpDetails {
    pub credentials: PasswordCredentials,
    pub name: String,
}

impl SignUpDetails {
    pub fn new(email: &str, password: &str, name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            credentials: PasswordCredentials::new(email, password)?,
            name: name.to_string(),
        })
    }
}

impl std::fmt::Debug for SignUpDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpDetails")
            .field("credentials", &self.credentials)
            .field("name", &self.name)
            .finish()
    }
}

/// Basic shape check: `local@domain`, one `@`, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.') =>
        {
            Ok(())
        }
        _ => Err(ValidationError::InvalidEmail),
    }
}
