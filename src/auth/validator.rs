//! Authentication validator
//!
//! Compares USER/PASS parameters against the configured credentials.

use super::credentials::Credentials;
use crate::error::AuthError;

/// Accepts `username` if no username is configured or it matches.
pub fn validate_user(credentials: &Credentials, username: &str) -> Result<(), AuthError> {
    match credentials.username() {
        Some(expected) if expected != username => {
            Err(AuthError::UserNotFound(username.to_string()))
        }
        _ => Ok(()),
    }
}

/// Accepts `password` if no password is configured or it matches.
pub fn validate_password(credentials: &Credentials, password: &str) -> Result<(), AuthError> {
    match credentials.password() {
        Some(expected) if expected != password => Err(AuthError::InvalidPassword),
        _ => Ok(()),
    }
}
