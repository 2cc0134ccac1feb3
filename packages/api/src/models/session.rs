//! Authenticated session as cached by the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserInfo;

/// Identity provider that issued a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Email and password.
    Credential,
    #[serde(rename = "github")]
    GitHub,
    Google,
}

impl Provider {
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Credential => "credential",
            Provider::GitHub => "github",
            Provider::Google => "google",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Server-issued proof of authentication, valid until `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user: UserInfo,
    pub expires_at: DateTime<Utc>,
    pub provider: Option<Provider>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
