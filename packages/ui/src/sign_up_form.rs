//! Account creation form.

use api::auth::SignUpDetails;
use api::client::DEFAULT_CALLBACK_PATH;
use api::ValidationError;
use dioxus::prelude::*;

use crate::auth::use_auth_client;
use crate::form::FormStatus;
use crate::navigate::navigate_to;

/// Local checks for the sign-up fields.
pub fn check_sign_up(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<SignUpDetails, ValidationError> {
    let details = SignUpDetails::new(email, password, name)?;
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(details)
}

#[component]
pub fn SignUpForm(
    #[props(default = DEFAULT_CALLBACK_PATH.to_string())] redirect_to: String,
) -> Element {
    let client = use_auth_client();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut status = use_signal(FormStatus::default);

    let handle_sign_up = move |evt: FormEvent| {
        evt.prevent_default();

        let details = match check_sign_up(&name(), &email(), &password(), &confirm_password()) {
            Ok(details) => details,
            Err(e) => {
                status.write().reject(e.to_string());
                return;
            }
        };
        if !status.write().begin_submit() {
            return;
        }

        let client = client.clone();
        let redirect_to = redirect_to.clone();
        spawn(async move {
            let result = client
                .sign_up(
                    &details.credentials.email,
                    &details.credentials.password,
                    &details.name,
                )
                .await;
            password.set(String::new());
            confirm_password.set(String::new());
            status.write().finish(&result);

            match result {
                Ok(user) => {
                    tracing::info!("Created account for {}", user.email);
                    navigate_to(&redirect_to);
                }
                Err(e) => tracing::warn!(kind = %e.kind(), "Sign-up failed: {}", e),
            }
        });
    };

    let current = status();
    let editable = current.accepts_input();

    rsx! {
        form {
            class: "auth-form",
            onsubmit: handle_sign_up,

            h2 { class: "auth-form__title", "Create account" }

            if let Some(err) = current.error_message() {
                div { class: "auth-form__error", role: "alert", "{err}" }
            }

            input {
                class: "auth-form__input",
                r#type: "text",
                placeholder: "Name",
                autocomplete: "name",
                value: name(),
                disabled: !editable,
                oninput: move |evt: FormEvent| {
                    name.set(evt.value());
                    status.write().edit();
                },
            }

            input {
                class: "auth-form__input",
                r#type: "email",
                placeholder: "Email",
                autocomplete: "email",
                value: email(),
                disabled: !editable,
                oninput: move |evt: FormEvent| {
                    email.set(evt.value());
                    status.write().edit();
                },
            }

            input {
                class: "auth-form__input",
                r#type: "password",
                placeholder: "Password",
                autocomplete: "new-password",
                value: password(),
                disabled: !editable,
                oninput: move |evt: FormEvent| {
                    password.set(evt.value());
                    status.write().edit();
                },
            }

            input {
                class: "auth-form__input",
                r#type: "password",
                placeholder: "Confirm password",
                autocomplete: "new-password",
                value: confirm_password(),
                disabled: !editable,
                oninput: move |evt: FormEvent| {
                    confirm_password.set(evt.value());
                    status.write().edit();
                },
            }

            button {
                class: "auth-form__submit",
                r#type: "submit",
                disabled: current.is_submitting(),
                if current.is_submitting() { "Creating account..." } else { "Sign up" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_sign_up() {
        assert!(check_sign_up("Ada", "a@b.com", "secret123", "secret123").is_ok());
        assert_eq!(
            check_sign_up("Ada", "a@b.com", "secret123", "secret124"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            check_sign_up("", "a@b.com", "secret123", "secret123"),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            check_sign_up("Ada", "", "secret123", "secret123"),
            Err(ValidationError::EmptyEmail)
        );
    }
}
