//! # Auth service client
//!
//! [`AuthClient`] is the handle UI code uses to sign in, sign up, sign out and read the
//! current session. It talks to the auth backend over HTTP under `{base}/api/auth/` and
//! keeps a shared [`SessionObserver`]-backed cache of the session.
//!
//! ## Operations
//!
//! | Call | Endpoint | Cache effect |
//! |------|----------|--------------|
//! | `sign_in().password(..)` | `POST sign-in/email`, then `GET get-session` | stores the new session |
//! | `sign_in().github()` / `.google()` | `POST sign-in/social` | none; returns an [`OAuthRedirect`] |
//! | `sign_up(..)` | `POST sign-up/email`, then `GET get-session` | stores the new session, if any |
//! | `sign_out()` | `POST sign-out` | always cleared |
//! | `get_session()` | `GET get-session` when stale | refreshed |
//!
//! OAuth is two separate steps. The initiator only yields the provider URL; after the
//! provider redirects back, [`AuthClient::resume_after_redirect`] picks up the session the
//! backend attached to the browser.
//!
//! Cloning is cheap: the HTTP pool and the cache are shared between clones.

mod cache;
mod wire;

use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::{header, Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{PasswordCredentials, SignUpDetails, SocialProvider};
use crate::error::{AuthError, ConfigError};
use crate::models::{Session, UserInfo};

pub use cache::{SessionClosed, SessionObserver};
use cache::SessionCache;
use wire::{
    AuthResponse, EmailSignInRequest, EmailSignUpRequest, ErrorBody, SessionEnvelope,
    SocialSignInRequest, SocialSignInResponse,
};

/// Path of the auth endpoints below the base URL.
const AUTH_PREFIX: &str = "api/auth/";

/// How long a fetched session is trusted before `get_session` asks the backend again.
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 60;

/// Where the backend sends the browser after a successful OAuth sign-in.
pub const DEFAULT_CALLBACK_PATH: &str = "/dashboard";

/// Where the backend sends the browser after a failed OAuth sign-in.
pub const DEFAULT_ERROR_CALLBACK_PATH: &str = "/login";

/// Provider authorization URL the caller must navigate to.
///
/// Carries no session: the sign-in completes on a later page load.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthRedirect {
    pub provider: SocialProvider,
    pub url: Url,
}

/// Auth client. Clone is cheap and clones share the session cache.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: Url,
    callback_url: String,
    error_callback_url: String,
    cache: Arc<SessionCache>,
}

impl PartialEq for AuthClient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cache, &other.cache)
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url.as_str())
            .field("callback_url", &self.callback_url)
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Create a client for the app served at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, AuthError> {
        let mut url = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            name: "auth base URL".to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                name: "auth base URL".to_string(),
                reason: format!("{base_url} cannot be used as a base URL"),
            }
            .into());
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: url,
            callback_url: DEFAULT_CALLBACK_PATH.to_string(),
            error_callback_url: DEFAULT_ERROR_CALLBACK_PATH.to_string(),
            cache: Arc::new(SessionCache::new(Duration::seconds(
                DEFAULT_SESSION_MAX_AGE_SECS,
            ))),
        })
    }

    /// Set where the backend returns the browser after an OAuth sign-in.
    pub fn with_callback_urls(
        mut self,
        callback_url: impl Into<String>,
        error_callback_url: impl Into<String>,
    ) -> Self {
        self.callback_url = callback_url.into();
        self.error_callback_url = error_callback_url.into();
        self
    }

    /// Replace the session cache with one using `max_age`.
    ///
    /// Call before handing out clones or observers; they keep the old cache.
    pub fn with_session_max_age(mut self, max_age: Duration) -> Self {
        self.cache = Arc::new(SessionCache::new(max_age));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sign-in methods.
    pub fn sign_in(&self) -> SignIn<'_> {
        SignIn { client: self }
    }

    /// Create a password account. The backend signs the new user in when it is
    /// configured to; the cache reflects whatever session it reports afterwards.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserInfo, AuthError> {
        let details = SignUpDetails::new(email, password, name)?;
        let response: AuthResponse = self
            .post_json(
                "sign-up/email",
                &EmailSignUpRequest {
                    email: &details.credentials.email,
                    password: &details.credentials.password,
                    name: &details.name,
                },
                false,
            )
            .await?;
        info!(user = %response.user.id, "signed up");

        // The account exists now; a failed session check must not invite a resubmission.
        if let Err(e) = self.refresh_session().await {
            warn!(kind = %e.kind(), "session check after sign-up failed: {}", e);
        }
        Ok(response.user)
    }

    /// End the session. The cached session is cleared even when the request fails.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let result = self.post_unit("sign-out").await;
        self.cache.clear();
        match &result {
            Ok(()) => info!("signed out"),
            Err(e) => warn!(kind = %e.kind(), "sign-out request failed: {}", e),
        }
        result
    }

    /// Current session, revalidated with the backend when the cache is stale.
    pub async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        if self.cache.is_fresh(Utc::now()) {
            return Ok(self.cache.current());
        }

        let _guard = self.cache.refresh_lock().await;
        // Another caller may have refreshed while we waited.
        if self.cache.is_fresh(Utc::now()) {
            return Ok(self.cache.current());
        }
        self.revalidate().await
    }

    /// Ask the backend for the session regardless of cache freshness.
    ///
    /// Answers to checks that were already running are discarded, so the result reflects
    /// the backend state after this call started.
    pub async fn refresh_session(&self) -> Result<Option<Session>, AuthError> {
        self.cache.invalidate();
        let _guard = self.cache.refresh_lock().await;
        self.revalidate().await
    }

    /// Fetch and store the session. Callers hold the refresh lock.
    async fn revalidate(&self) -> Result<Option<Session>, AuthError> {
        let generation = self.cache.generation();
        let session = self.fetch_session().await?;
        if !self.cache.store(generation, session) && self.cache.generation() != generation {
            debug!("session changed during revalidation, dropping the answer");
        }
        Ok(self.cache.current())
    }

    /// Finish an OAuth round-trip on the page the provider returned to.
    ///
    /// `query` is the callback page's query string, with or without the leading `?`.
    pub async fn resume_after_redirect(&self, query: &str) -> Result<Option<Session>, AuthError> {
        if let Some(error) = callback_error(query) {
            warn!(%error, "OAuth callback reported an error");
            return Err(AuthError::Provider(error));
        }
        self.refresh_session().await
    }

    /// Session as currently cached, without any network call.
    pub fn cached_session(&self) -> Option<Session> {
        self.cache.current()
    }

    pub fn subscribe(&self) -> SessionObserver {
        self.cache.subscribe()
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(AUTH_PREFIX)
            .and_then(|u| u.join(path))
            .map_err(|e| AuthError::InvalidResponse(format!("bad endpoint {path}: {e}")))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, social: bool) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        let response = check(response, social).await?;
        Ok(response.json().await?)
    }

    async fn post_unit(&self, path: &str) -> Result<(), AuthError> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        check(response, false).await?;
        Ok(())
    }

    async fn fetch_session(&self) -> Result<Option<Session>, AuthError> {
        let url = self.endpoint("get-session")?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let response = check(response, false).await?;
        let envelope: Option<SessionEnvelope> = response.json().await?;
        envelope
            .map(SessionEnvelope::into_session)
            .transpose()
            .map_err(AuthError::InvalidResponse)
    }
}

/// Sign-in methods, reached through [`AuthClient::sign_in`].
pub struct SignIn<'a> {
    client: &'a AuthClient,
}

impl SignIn<'_> {
    /// Sign in with email and password.
    ///
    /// Empty or malformed input is rejected before any request is sent.
    pub async fn password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = PasswordCredentials::new(email, password)?;
        let client = self.client;

        let response: AuthResponse = client
            .post_json(
                "sign-in/email",
                &EmailSignInRequest {
                    email: &credentials.email,
                    password: &credentials.password,
                },
                false,
            )
            .await?;

        let session = client.refresh_session().await?.ok_or_else(|| {
            AuthError::InvalidResponse("sign-in succeeded but no session was issued".to_string())
        })?;
        info!(user = %response.user.id, "signed in with password");
        Ok(session)
    }

    pub async fn github(&self) -> Result<OAuthRedirect, AuthError> {
        self.social(SocialProvider::GitHub).await
    }

    pub async fn google(&self) -> Result<OAuthRedirect, AuthError> {
        self.social(SocialProvider::Google).await
    }

    /// Ask the backend for the provider's authorization URL.
    pub async fn social(&self, provider: SocialProvider) -> Result<OAuthRedirect, AuthError> {
        let client = self.client;
        let response: SocialSignInResponse = client
            .post_json(
                "sign-in/social",
                &SocialSignInRequest {
                    provider: provider.id(),
                    callback_url: &client.callback_url,
                    error_callback_url: &client.error_callback_url,
                },
                true,
            )
            .await?;

        let url = Url::parse(&response.url).map_err(|e| {
            AuthError::InvalidResponse(format!("bad {provider} authorization URL: {e}"))
        })?;
        debug!(%provider, "redirecting to provider");
        Ok(OAuthRedirect { provider, url })
    }
}

/// Pass successful responses through, turn the rest into an [`AuthError`].
async fn check(response: Response, social: bool) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = ["retry-after", "x-retry-after"].iter().find_map(|name| {
        response
            .headers()
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    });
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.text().await.unwrap_or_default();

    let error = classify(status.as_u16(), retry_after, &body, social);
    warn!(
        status = status.as_u16(),
        kind = %error.kind(),
        %content_type,
        "auth backend returned an error"
    );
    Err(error)
}

/// Map a failed backend response onto the error taxonomy.
fn classify(status: u16, retry_after: Option<u64>, body: &str, social: bool) -> AuthError {
    if status == 429 {
        return AuthError::RateLimited {
            retry_after_secs: retry_after,
        };
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| AuthError::truncate_body(body));

    match parsed.code.as_deref() {
        Some("INVALID_EMAIL_OR_PASSWORD") => return AuthError::InvalidCredentials,
        Some(code) if code.starts_with("PROVIDER_") || code == "ACCOUNT_NOT_LINKED" => {
            return AuthError::Provider(message)
        }
        _ => {}
    }

    match status {
        401 | 403 if social => AuthError::Provider(message),
        401 | 403 => AuthError::InvalidCredentials,
        502..=504 => AuthError::Network(format!("auth backend unavailable (status {status})")),
        400..=499 if social => AuthError::Provider(message),
        400..=499 => AuthError::Rejected { status, message },
        _ => AuthError::InvalidResponse(format!("status {status}: {message}")),
    }
}

/// `error` parameter of an OAuth callback query, if any.
fn callback_error(query: &str) -> Option<String> {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return None;
    }
    let url = Url::parse(&format!("http://callback.invalid/?{query}")).ok()?;
    let error = url
        .query_pairs()
        .find(|(key, _)| key == "error")
        .map(|(_, value)| value.into_owned());
    error.filter(|e| !e.is_empty())
}
