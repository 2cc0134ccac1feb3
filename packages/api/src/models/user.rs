//! # User model as reported by the auth backend
//!
//! [`UserInfo`] is the client-safe view of a user: the backend never sends password
//! hashes or internal timestamps, and this type does not model them. It deserializes
//! from the backend's camelCase JSON (`emailVerified`, `image`) and is `PartialEq` so
//! UI state holding it can be compared cheaply.
//!
//! The helper [`UserInfo::display_name`] returns the user's name or falls back to their
//! email address.

use serde::{Deserialize, Serialize};

/// User information safe to hold on the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

impl UserInfo {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}
