//! Authentication system
//!
//! Holds the single configured credential pair and validates USER/PASS
//! against it.

pub mod credentials;
pub mod validator;

pub use credentials::Credentials;
pub use validator::{validate_password, validate_user};
