//! Registration page view with email/password form.

use dioxus::prelude::*;
use ui::{RedirectIfSignedIn, SignUpForm};

use crate::Route;

/// Sign-up page component.
#[component]
pub fn SignUp() -> Element {
    rsx! {
        RedirectIfSignedIn {}

        div {
            class: "auth-page",

            div {
                class: "auth-page__panel",

                SignUpForm {}

                p {
                    class: "auth-page__footer",
                    "Already have an account? "
                    Link { to: Route::Login { error: String::new() }, "Sign in" }
                }
            }
        }
    }
}
