//! OAuth sign-in buttons.
//!
//! Each press asks the backend for the provider URL and hands the page over to it. No
//! loading state is kept: on success the page is gone. Only a failure to start the
//! flow is rendered here; failures reported by the provider come back on the error
//! callback page.

use api::{AuthClient, SocialProvider};
use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_brands_icons::{FaGithub, FaGoogle};
use dioxus_free_icons::Icon;

use crate::auth::use_auth_client;
use crate::navigate::navigate_to;

fn start(client: AuthClient, provider: SocialProvider, mut error: Signal<Option<String>>) {
    error.set(None);
    spawn(async move {
        match client.sign_in().social(provider).await {
            Ok(redirect) => navigate_to(redirect.url.as_str()),
            Err(e) => {
                tracing::error!("Failed to start {} sign-in: {}", provider, e);
                error.set(Some(e.user_message()));
            }
        }
    });
}

#[component]
pub fn SocialSignIn(
    #[props(default = true)] github: bool,
    #[props(default = true)] google: bool,
) -> Element {
    let client = use_auth_client();
    let github_client = client.clone();
    let google_client = client;
    let error = use_signal(|| Option::<String>::None);

    rsx! {
        div {
            class: "social-sign-in",

            if let Some(err) = error() {
                div { class: "auth-form__error", role: "alert", "{err}" }
            }

            if github {
                button {
                    class: "social-sign-in__button social-sign-in__button--github",
                    r#type: "button",
                    onclick: move |_| start(github_client.clone(), SocialProvider::GitHub, error),
                    Icon { icon: FaGithub, width: 16, height: 16 }
                    "Sign in with GitHub"
                }
            }

            if google {
                button {
                    class: "social-sign-in__button social-sign-in__button--google",
                    r#type: "button",
                    onclick: move |_| start(google_client.clone(), SocialProvider::Google, error),
                    Icon { icon: FaGoogle, width: 16, height: 16 }
                    "Sign in with Google"
                }
            }
        }
    }
}
