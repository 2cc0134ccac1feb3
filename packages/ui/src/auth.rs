//! Authentication context and hooks for the UI.

use std::time::Duration;

use api::{AuthClient, AuthError, Session, UserInfo};
use dioxus::prelude::*;

use crate::navigate::{current_query, navigate_to};

/// Backend base URL for native builds when `AUTH_BASE_URL` is unset.
pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8080";

/// How often the provider revalidates the session in the background.
const REVALIDATE_INTERVAL: Duration = Duration::from_secs(30);

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub loading: bool,
    /// Whether the auth backend is reachable (last session check got an answer).
    pub online: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
            online: false,
        }
    }
}

impl AuthState {
    pub fn user(&self) -> Option<&UserInfo> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Fold the outcome of a session check into the state.
    pub fn record_check(&mut self, result: &Result<Option<Session>, AuthError>) {
        self.loading = false;
        match result {
            Ok(session) => {
                self.session = session.clone();
                self.online = true;
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!("Auth backend unreachable: {}", e);
                self.online = false;
            }
            Err(e) => {
                tracing::warn!(kind = %e.kind(), "Session check failed: {}", e);
                self.online = true;
            }
        }
    }
}

/// Base URL of the auth backend for this build.
///
/// `AUTH_BASE_URL` wins: read at compile time for the browser bundle and at run time on
/// native targets. Without it the browser talks to the origin that served the page.
pub fn auth_base_url() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        option_env!("AUTH_BASE_URL")
            .map(str::to_string)
            .or_else(|| web_sys::window().and_then(|w| w.location().origin().ok()))
            .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var("AUTH_BASE_URL").unwrap_or_else(|_| DEFAULT_AUTH_BASE_URL.to_string())
    }
}

/// Build the client for this app, falling back to the default backend when the
/// configured URL is unusable.
pub fn default_client() -> Result<AuthClient, AuthError> {
    let base_url = auth_base_url();
    AuthClient::new(&base_url).or_else(|e| {
        tracing::error!("Invalid auth base URL {}: {}", base_url, e);
        AuthClient::new(DEFAULT_AUTH_BASE_URL)
    })
}

/// Get the current authentication state.
/// Returns a signal that updates when the user signs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Get the shared auth client.
pub fn use_auth_client() -> AuthClient {
    use_context::<AuthClient>()
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(client: AuthClient, children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);
    use_context_provider(|| client.clone());
    use_context_provider(|| auth_state);

    // Mirror every change of the client's session cache
    let watcher = client.clone();
    use_future(move || {
        let client = watcher.clone();
        async move {
            let mut observer = client.subscribe();
            while let Ok(session) = observer.changed().await {
                auth_state.write().session = session;
            }
        }
    });

    // Initial check (finishing an OAuth round-trip if we just came back from one),
    // then periodic revalidation
    let checker = client.clone();
    use_future(move || {
        let client = checker.clone();
        async move {
            let result = client.resume_after_redirect(&current_query()).await;
            auth_state.write().record_check(&result);

            loop {
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::sleep(REVALIDATE_INTERVAL).await;
                #[cfg(not(target_arch = "wasm32"))]
                tokio::time::sleep(REVALIDATE_INTERVAL).await;

                let result = client.get_session().await;
                let mut next = auth_state();
                next.record_check(&result);
                if next != auth_state() {
                    auth_state.set(next);
                }
            }
        }
    });

    rsx! {
        {children}
    }
}

/// Button to sign the current user out.
#[component]
pub fn SignOutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    #[props(default = "/login".to_string())] redirect_to: String,
) -> Element {
    let client = use_auth_client();
    let mut pending = use_signal(|| false);

    let onclick = move |_| {
        let client = client.clone();
        let redirect_to = redirect_to.clone();
        async move {
            pending.set(true);
            // The local session is gone either way
            if let Err(e) = client.sign_out().await {
                tracing::warn!("Sign-out request failed: {}", e);
            }
            pending.set(false);
            navigate_to(&redirect_to);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: pending(),
            onclick: onclick,
            "{label}"
        }
    }
}
