mod login;
pub use login::Login;

mod sign_up;
pub use sign_up::SignUp;

mod dashboard;
pub use dashboard::Dashboard;
