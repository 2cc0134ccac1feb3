//! Route protection based on the session state.

use dioxus::prelude::*;

use crate::auth::{use_auth, AuthState};
use crate::navigate::navigate_to;

/// What a protected page should do for the current auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The first session check has not finished.
    Pending,
    Granted,
    Denied,
}

pub fn access(state: &AuthState) -> Access {
    if state.loading {
        Access::Pending
    } else if state.session.is_some() {
        Access::Granted
    } else {
        Access::Denied
    }
}

/// Render `children` only with a session; send anonymous visitors to `login_path`.
#[component]
pub fn RequireSession(
    #[props(default = "/login".to_string())] login_path: String,
    children: Element,
) -> Element {
    let auth = use_auth();

    use_effect(move || {
        if access(&auth.read()) == Access::Denied {
            navigate_to(&login_path);
        }
    });

    match access(&auth()) {
        Access::Pending => rsx! {},
        Access::Denied => rsx! {
            p { class: "auth-redirect", "Redirecting to sign in..." }
        },
        Access::Granted => rsx! {
            {children}
        },
    }
}

/// Send visitors who already have a session to `to` (for the login and sign-up pages).
#[component]
pub fn RedirectIfSignedIn(#[props(default = "/dashboard".to_string())] to: String) -> Element {
    let auth = use_auth();

    use_effect(move || {
        if access(&auth.read()) == Access::Granted {
            navigate_to(&to);
        }
    });

    rsx! {}
}
