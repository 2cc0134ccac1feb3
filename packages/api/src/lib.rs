//! # API crate: auth client, session cache and backend configuration
//!
//! This crate holds everything the web frontend needs to talk to the auth backend, and
//! the configuration record the backend is started with.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Auth methods, [`AuthConfig`] built from environment variables, credential input and local validation |
//! | [`client`] | [`AuthClient`]: sign-in (password, GitHub, Google), sign-up, sign-out, session reads and the shared session cache |
//! | [`error`] | [`AuthError`], [`ConfigError`], [`ValidationError`] and the stable [`ErrorKind`] names |
//! | [`models`] | [`Session`] and the client-safe [`UserInfo`] |
//!
//! ## Session flow
//!
//! UI components call [`AuthClient`]; the client calls the backend under `/api/auth/*`
//! and updates its cache; every [`SessionObserver`] obtained from
//! [`AuthClient::subscribe`] sees the change. The cache is the only writer-owned state;
//! components never write to it directly.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use auth::{AuthConfig, AuthMethod, SocialProvider};
pub use client::{AuthClient, OAuthRedirect, SessionObserver, SignIn};
pub use error::{AuthError, ConfigError, ErrorKind, ValidationError};
pub use models::{Provider, Session, UserInfo};
