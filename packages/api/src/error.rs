//! # Error taxonomy for the auth client and backend configuration
//!
//! Three enums cover every failure this crate can report:
//!
//! - [`AuthError`]: returned by every [`AuthClient`](crate::AuthClient) operation. Its
//!   [`kind`](AuthError::kind) maps onto the stable [`ErrorKind`] names the UI matches on.
//! - [`ConfigError`]: raised while building the backend configuration at startup. It is
//!   fatal: the server refuses to start.
//! - [`ValidationError`]: local credential checks performed before any network call.
//!
//! Only [`ErrorKind::NetworkError`] is retryable. Nothing in this crate retries on its own.

use serde::Serialize;
use thiserror::Error;

/// Maximum length for backend response bodies quoted in error messages.
const MAX_ERROR_BODY_LENGTH: usize = 300;

/// Stable, serializable name of an error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidCredentials,
    ProviderError,
    NetworkError,
    RateLimited,
    ConfigError,
    Validation,
    Rejected,
    InvalidResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCredentials => "invalid_credentials",
            ErrorKind::ProviderError => "provider_error",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ConfigError => "config_error",
            ErrorKind::Validation => "validation",
            ErrorKind::Rejected => "rejected",
            ErrorKind::InvalidResponse => "invalid_response",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local credential check failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmptyEmail,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Password is required")]
    EmptyPassword,

    #[error("Name is required")]
    EmptyName,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Startup-time configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{method} is enabled but {var} is not set")]
    MissingCredential {
        method: &'static str,
        var: &'static str,
    },

    #[error("{var} must be a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be `reject` or `trusted`, got {value:?}")]
    InvalidAccountLinking { var: &'static str, value: String },

    #[error("invalid URL for {name}: {reason}")]
    InvalidUrl { name: String, reason: String },

    #[error("no authentication method is enabled")]
    NoMethodEnabled,
}

/// Failure of an auth client operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Sign-in provider error: {0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Too many attempts, please wait before retrying")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AuthError::Provider(_) => ErrorKind::ProviderError,
            AuthError::Network(_) => ErrorKind::NetworkError,
            AuthError::RateLimited { .. } => ErrorKind::RateLimited,
            AuthError::Config(_) => ErrorKind::ConfigError,
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::Rejected { .. } => ErrorKind::Rejected,
            AuthError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }

    /// Whether the same request may succeed if simply sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Network(_))
    }

    /// Message suitable for rendering next to a form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            AuthError::RateLimited {
                retry_after_secs: Some(secs),
            } => format!("Too many attempts, try again in {secs} seconds"),
            AuthError::InvalidResponse(_) => {
                "Something went wrong on our side. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Truncate a response body to avoid quoting excessive data.
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if is_transport(&e) {
            AuthError::Network(e.to_string())
        } else {
            AuthError::InvalidResponse(e.to_string())
        }
    }
}

/// The request never got an answer: connection, timeout or send failure.
fn is_transport(e: &reqwest::Error) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    if e.is_connect() {
        return true;
    }
    e.is_timeout() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(AuthError::Network("reset".into()).is_retryable());
        assert!(!AuthError::InvalidCredentials.is_retryable());
        assert!(!AuthError::RateLimited {
            retry_after_secs: Some(5)
        }
        .is_retryable());
        assert!(!AuthError::Provider("denied".into()).is_retryable());
    }

    #[test]
    fn test_malformed_request_is_not_retryable() {
        let e = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        assert!(e.is_builder());
        let err = AuthError::from(e);
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_kind_names_are_stable() {
        assert_eq!(
            AuthError::InvalidCredentials.kind().as_str(),
            "invalid_credentials"
        );
        assert_eq!(
            AuthError::Config(ConfigError::NoMethodEnabled).kind(),
            ErrorKind::ConfigError
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::RateLimited).unwrap(),
            "\"rate_limited\""
        );
    }

    #[test]
    fn test_validation_converts_into_auth_error() {
        let err: AuthError = ValidationError::EmptyPassword.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "Password is required");
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "é".repeat(400);
        let truncated = AuthError::truncate_body(&body);
        assert!(truncated.contains("truncated, 800 total bytes"));

        assert_eq!(AuthError::truncate_body("short"), "short");
    }
}
