//! Request middleware: logging setup and session authentication.

pub mod auth;
pub mod logging;

pub use auth::{require_admin, require_auth, CurrentUser, SESSION_COOKIE};
