//! Credential storage
//!
//! One optional username and one optional password. A factor left empty
//! at start-up is not checked, which is how anonymous access is enabled.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Builds credentials from start-up strings; empty means "not required".
    pub fn new(username: &str, password: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            username: non_empty(username),
            password: non_empty(password),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn requires_username(&self) -> bool {
        self.username.is_some()
    }

    pub fn requires_password(&self) -> bool {
        self.password.is_some()
    }
}
