//! Client session management
//!
//! The `Session` value a control connection owns for its lifetime.

use std::time::{Duration, Instant};

use crate::auth::Credentials;
use crate::client::ControlState;

#[derive(Debug)]
pub struct Session {
    state: ControlState,
    cwd: String,
    rename_from: Option<String>,
    deadline: Option<Instant>,
    credentials: Credentials,
}

impl Session {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            state: ControlState::Init,
            cwd: "/".to_string(),
            rename_from: None,
            deadline: None,
            credentials,
        }
    }

    /// Clears everything tied to a connection. Credentials and the current
    /// phase are kept.
    pub fn reset(&mut self) {
        self.cwd = "/".to_string();
        self.rename_from = None;
        self.deadline = None;
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn set_state(&mut self, state: ControlState) {
        self.state = state;
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Sets the working directory; `path` must already be resolved.
    pub fn set_cwd(&mut self, path: String) {
        debug_assert!(path.starts_with('/'));
        self.cwd = path;
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn set_rename_from(&mut self, path: String) {
        self.rename_from = Some(path);
    }

    /// Removes and returns the pending rename source.
    pub fn take_rename_from(&mut self) -> Option<String> {
        self.rename_from.take()
    }

    /// (Re)arms the timeout to fire `after` from `now`. A deadline beyond
    /// what `Instant` can represent never fires.
    pub fn arm_timeout(&mut self, now: Instant, after: Duration) {
        self.deadline = now.checked_add(after);
    }

    pub fn timed_out(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

}
