//! Authentication methods, backend configuration and credential input.

mod config;
mod credentials;

pub use config::{
    AccountLinking, AuthConfig, AuthMethod, OAuthConfig, SocialProvider, DEFAULT_BASE_URL,
};
pub use credentials::{validate_email, PasswordCredentials, SignUpDetails};
