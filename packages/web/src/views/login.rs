//! Login page: password form, then the OAuth buttons.

use dioxus::prelude::*;
use ui::{RedirectIfSignedIn, SignInForm, SocialSignIn};

use crate::Route;

/// Message for the `error` code the backend appends when an OAuth sign-in fails.
pub(crate) fn callback_error_message(code: &str) -> Option<String> {
    match code.trim() {
        "" => None,
        "account_not_linked" => Some(
            "This email already belongs to an account. Sign in with your password instead."
                .to_string(),
        ),
        "access_denied" => Some("Sign-in was cancelled.".to_string()),
        other => Some(format!("Sign-in with the provider failed ({other}).")),
    }
}

/// Login page component.
#[component]
pub fn Login(error: String) -> Element {
    let callback_error = callback_error_message(&error);

    rsx! {
        RedirectIfSignedIn {}

        div {
            class: "auth-page",

            div {
                class: "auth-page__panel",

                if let Some(message) = callback_error {
                    div { class: "auth-form__error", role: "alert", "{message}" }
                }

                SignInForm {}

                div { class: "auth-divider", "Or continue with" }

                SocialSignIn {}

                p {
                    class: "auth-page__footer",
                    "No account yet? "
                    Link { to: Route::SignUp {}, "Sign up" }
                }
            }
        }
    }
}
