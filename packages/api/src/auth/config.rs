//! # Auth backend configuration from environment variables
//!
//! [`AuthConfig`] is the declarative record handed to the auth backend at startup. It is
//! built exactly once, validated, and never mutated afterwards; changing it requires a
//! redeploy.
//!
//! ## Sources
//!
//! [`AuthConfig::from_env`] loads `.env` through `dotenvy` and then reads the process
//! environment. [`AuthConfig::from_lookup`] takes any `Fn(&str) -> Option<String>` so the
//! same rules run against a plain map in tests.
//!
//! ## Rules
//!
//! - Every OAuth method is enabled unless `<PROVIDER>_ENABLED` says otherwise. An
//!   enabled method must have both `<PROVIDER>_CLIENT_ID` and `<PROVIDER>_CLIENT_SECRET`;
//!   blank values count as missing. Violations fail with [`ConfigError::MissingCredential`].
//! - `CORS_ORIGIN` is a comma separated list of trusted origins. Unset means none.
//! - Redirect URLs are derived from `AUTH_BASE_URL` as
//!   `{base}/api/auth/callback/{provider}`.
//! - At least one method must be enabled.

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, Scope, TokenUrl};

use crate::error::ConfigError;
use crate::models::Provider;

/// Default public base URL of the app when `AUTH_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// OAuth provider that can be enabled on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialProvider {
    GitHub,
    Google,
}

impl SocialProvider {
    pub const ALL: [SocialProvider; 2] = [SocialProvider::GitHub, SocialProvider::Google];

    pub fn id(&self) -> &'static str {
        self.provider().id()
    }

    pub fn provider(&self) -> Provider {
        match self {
            SocialProvider::GitHub => Provider::GitHub,
            SocialProvider::Google => Provider::Google,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SocialProvider::GitHub => "GitHub",
            SocialProvider::Google => "Google",
        }
    }

    fn enabled_var(&self) -> &'static str {
        match self {
            SocialProvider::GitHub => "GITHUB_ENABLED",
            SocialProvider::Google => "GOOGLE_ENABLED",
        }
    }

    fn client_id_var(&self) -> &'static str {
        match self {
            SocialProvider::GitHub => "GITHUB_CLIENT_ID",
            SocialProvider::Google => "GOOGLE_CLIENT_ID",
        }
    }

    fn client_secret_var(&self) -> &'static str {
        match self {
            SocialProvider::GitHub => "GITHUB_CLIENT_SECRET",
            SocialProvider::Google => "GOOGLE_CLIENT_SECRET",
        }
    }

    fn auth_endpoint(&self) -> &'static str {
        match self {
            SocialProvider::GitHub => "https://github.com/login/oauth/authorize",
            SocialProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
        }
    }

    fn token_endpoint(&self) -> &'static str {
        match self {
            SocialProvider::GitHub => "https://github.com/login/oauth/access_token",
            SocialProvider::Google => "https://oauth2.googleapis.com/token",
        }
    }

    fn default_scopes(&self) -> &'static [&'static str] {
        match self {
            SocialProvider::GitHub => &["user:email", "read:user"],
            SocialProvider::Google => &["openid", "email", "profile"],
        }
    }
}

impl std::fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// How an OAuth sign-in whose email matches an existing password account is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountLinking {
    /// Refuse the sign-in; the backend answers `ACCOUNT_NOT_LINKED`.
    #[default]
    Reject,
    /// Merge into the existing account, only when the provider reports a verified email.
    Trusted,
}

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub provider: SocialProvider,
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub redirect_url: RedirectUrl,
    pub scopes: Vec<Scope>,
    /// Refresh the stored email from the provider on every sign-in.
    pub sync_user_email: bool,
}

/// Authentication method that the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    EmailPassword,
    Social(SocialProvider),
}

/// Validated backend configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub base_url: String,
    pub trusted_origins: Vec<String>,
    pub email_and_password: bool,
    pub github: Option<OAuthConfig>,
    pub google: Option<OAuthConfig>,
    pub account_linking: AccountLinking,
}

impl AuthConfig {
    /// Build the configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = var("AUTH_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let trusted_origins = var("CORS_ORIGIN")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(|o| o.trim_end_matches('/').to_string())
                    .collect()
            })
            .unwrap_or_default();

        let email_and_password = parse_bool(
            "AUTH_EMAIL_PASSWORD_ENABLED",
            var("AUTH_EMAIL_PASSWORD_ENABLED"),
        )?;

        let account_linking = match var("AUTH_ACCOUNT_LINKING").as_deref() {
            None => AccountLinking::default(),
            Some(v) if v.eq_ignore_ascii_case("reject") => AccountLinking::Reject,
            Some(v) if v.eq_ignore_ascii_case("trusted") => AccountLinking::Trusted,
            Some(v) => {
                return Err(ConfigError::InvalidAccountLinking {
                    var: "AUTH_ACCOUNT_LINKING",
                    value: v.to_string(),
                })
            }
        };

        let github = oauth_config(SocialProvider::GitHub, &base_url, &var)?;
        let google = oauth_config(SocialProvider::Google, &base_url, &var)?;

        let config = Self {
            base_url,
            trusted_origins,
            email_and_password,
            github,
            google,
            account_linking,
        };

        if config.enabled_methods().is_empty() {
            return Err(ConfigError::NoMethodEnabled);
        }

        Ok(config)
    }

    /// Configuration of an enabled OAuth provider.
    pub fn provider(&self, provider: SocialProvider) -> Option<&OAuthConfig> {
        match provider {
            SocialProvider::GitHub => self.github.as_ref(),
            SocialProvider::Google => self.google.as_ref(),
        }
    }

    pub fn enabled_methods(&self) -> Vec<AuthMethod> {
        let mut methods = Vec::new();
        if self.email_and_password {
            methods.push(AuthMethod::EmailPassword);
        }
        for provider in SocialProvider::ALL {
            if self.provider(provider).is_some() {
                methods.push(AuthMethod::Social(provider));
            }
        }
        methods
    }

    pub fn is_trusted_origin(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.trusted_origins.iter().any(|o| o == origin)
    }
}

fn parse_bool(var: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(true);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}

fn invalid_url(name: impl Into<String>, e: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidUrl {
        name: name.into(),
        reason: e.to_string(),
    }
}

fn oauth_config<F>(
    provider: SocialProvider,
    base_url: &str,
    var: &F,
) -> Result<Option<OAuthConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !parse_bool(provider.enabled_var(), var(provider.enabled_var()))? {
        return Ok(None);
    }

    let client_id = var(provider.client_id_var()).ok_or(ConfigError::MissingCredential {
        method: provider.display_name(),
        var: provider.client_id_var(),
    })?;
    let client_secret =
        var(provider.client_secret_var()).ok_or(ConfigError::MissingCredential {
            method: provider.display_name(),
            var: provider.client_secret_var(),
        })?;

    let redirect = format!("{}/api/auth/callback/{}", base_url, provider.id());

    Ok(Some(OAuthConfig {
        provider,
        client_id: ClientId::new(client_id),
        client_secret: ClientSecret::new(client_secret),
        auth_url: AuthUrl::new(provider.auth_endpoint().to_string())
            .map_err(|e| invalid_url(format!("{provider} authorization endpoint"), e))?,
        token_url: TokenUrl::new(provider.token_endpoint().to_string())
            .map_err(|e| invalid_url(format!("{provider} token endpoint"), e))?,
        redirect_url: RedirectUrl::new(redirect).map_err(|e| invalid_url("AUTH_BASE_URL", e))?,
        scopes: provider
            .default_scopes()
            .iter()
            .map(|s| Scope::new(s.to_string()))
            .collect(),
        sync_user_email: true,
    }))
}
