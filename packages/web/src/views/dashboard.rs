use dioxus::prelude::*;
use ui::{use_auth, RequireSession, SignOutButton};

/// Protected landing page after sign-in.
#[component]
pub fn Dashboard() -> Element {
    rsx! {
        RequireSession {
            DashboardContent {}
        }
    }
}

#[component]
fn DashboardContent() -> Element {
    let auth = use_auth();
    let state = auth();

    let Some(session) = state.session else {
        return rsx! {};
    };
    let provider = session
        .provider
        .map(|p| p.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let expires = session.expires_at.format("%Y-%m-%d %H:%M UTC").to_string();
    let name = session.user.display_name().to_string();
    let email = session.user.email.clone();

    rsx! {
        div {
            class: "auth-page",

            div {
                class: "auth-page__panel",

                h1 { "Welcome, {name}" }
                p { "Signed in as {email} via {provider}" }
                p { class: "auth-page__footer", "Session valid until {expires}" }

                if !state.online {
                    p { class: "auth-form__error", "Offline: showing the last known session" }
                }

                SignOutButton { class: "auth-form__submit" }
            }
        }
    }
}
