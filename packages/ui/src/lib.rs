//! This crate contains the shared auth UI for the workspace: the session context,
//! the sign-in / sign-up / social sign-in forms and route protection.

mod auth;
pub use auth::{
    auth_base_url, default_client, use_auth, use_auth_client, AuthProvider, AuthState,
    SignOutButton, DEFAULT_AUTH_BASE_URL,
};

mod form;
pub use form::FormStatus;

mod guard;
pub use guard::{access, Access, RedirectIfSignedIn, RequireSession};

mod navigate;
pub use navigate::{current_query, navigate_to};

mod sign_in_form;
pub use sign_in_form::SignInForm;

mod sign_up_form;
pub use sign_up_form::{check_sign_up, SignUpForm};

mod social_sign_in;
pub use social_sign_in::SocialSignIn;
