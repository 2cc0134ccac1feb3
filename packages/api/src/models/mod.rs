//! Data models shared between the auth client and the UI.

mod session;
mod user;

pub use session::{Provider, Session};
pub use user::UserInfo;
