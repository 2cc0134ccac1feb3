//! Email and password sign-in form.

use api::auth::PasswordCredentials;
use api::client::DEFAULT_CALLBACK_PATH;
use dioxus::prelude::*;

use crate::auth::use_auth_client;
use crate::form::FormStatus;
use crate::navigate::navigate_to;

#[component]
pub fn SignInForm(
    #[props(default = DEFAULT_CALLBACK_PATH.to_string())] redirect_to: String,
) -> Element {
    let client = use_auth_client();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut status = use_signal(FormStatus::default);

    let handle_sign_in = move |evt: FormEvent| {
        evt.prevent_default();

        // Skip the round-trip for input the backend would reject anyway
        if let Err(e) = PasswordCredentials::new(&email(), &password()) {
            status.write().reject(e.to_string());
            return;
        }
        if !status.write().begin_submit() {
            return;
        }

        let client = client.clone();
        let redirect_to = redirect_to.clone();
        spawn(async move {
            let result = client.sign_in().password(&email(), &password()).await;
            password.set(String::new());
            status.write().finish(&result);

            match result {
                Ok(session) => {
                    tracing::info!("Signed in as {}", session.user.display_name());
                    navigate_to(&redirect_to);
                }
                Err(e) => tracing::warn!(kind = %e.kind(), "Sign-in failed: {}", e),
            }
        });
    };

    let current = status();

    rsx! {
        form {
            class: "auth-form",
            onsubmit: handle_sign_in,

            h2 { class: "auth-form__title", "Sign in" }

            if let Some(err) = current.error_message() {
                div { class: "auth-form__error", role: "alert", "{err}" }
            }

            input {
                class: "auth-form__input",
                r#type: "email",
                placeholder: "Email",
                autocomplete: "email",
                value: email(),
                disabled: !current.accepts_input(),
                oninput: move |evt: FormEvent| {
                    email.set(evt.value());
                    status.write().edit();
                },
            }

            input {
                class: "auth-form__input",
                r#type: "password",
                placeholder: "Password",
                autocomplete: "current-password",
                value: password(),
                disabled: !current.accepts_input(),
                oninput: move |evt: FormEvent| {
                    password.set(evt.value());
                    status.write().edit();
                },
            }

            button {
                class: "auth-form__submit",
                r#type: "submit",
                disabled: current.is_submitting(),
                if current.is_submitting() { "Signing in..." } else { "Sign in" }
            }
        }
    }
}
