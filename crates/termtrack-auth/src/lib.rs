//! termtrack Auth — password hashing, opaque session tokens and the
//! authorization policy.

pub mod config;
pub mod error;
pub mod password;
pub mod policy;
pub mod session;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use session::SessionService;
