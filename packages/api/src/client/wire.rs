//! Request and response bodies exchanged with the auth backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Provider, Session, UserInfo};

#[derive(Debug, Serialize)]
pub(crate) struct EmailSignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailSignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SocialSignInRequest<'a> {
    pub provider: &'a str,
    #[serde(rename = "callbackURL")]
    pub callback_url: &'a str,
    #[serde(rename = "errorCallbackURL")]
    pub error_callback_url: &'a str,
}

/// Body of a successful email sign-in or sign-up.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SocialSignInResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionRecord {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub provider: Option<Provider>,
}

/// Body of `get-session`; the backend answers `null` when anonymous.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionEnvelope {
    pub session: SessionRecord,
    pub user: UserInfo,
}

impl SessionEnvelope {
    pub fn into_session(self) -> Result<Session, String> {
        if self.session.user_id != self.user.id {
            return Err(format!(
                "session {} belongs to user {}, not {}",
                self.session.id, self.session.user_id, self.user.id
            ));
        }
        Ok(Session {
            id: self.session.id,
            user: self.user,
            expires_at: self.session.expires_at,
            provider: self.session.provider,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
