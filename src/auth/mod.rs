pub mod extract;
pub mod password;
pub mod reset_token;
pub mod session;

pub use extract::{CurrentUser, MaybeUser, login_redirect};
pub use session::{SESSION_COOKIE, SessionKeys};
