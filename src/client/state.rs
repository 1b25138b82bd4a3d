//! Module `state`
//!
//! Control-connection lifecycle phases.
//!
//! ```text
//! Init -> Wait -> Check -+-> AwaitingUser -----+
//!                        |        |            |
//!                        |        v            |
//!                        +-> AwaitingPassword  |
//!                        |        |            |
//!                        |        v            |
//!                        +------> LoggedIn <---+
//!                                    |
//!                                    v
//!                                Processing
//! ```
//!
//! `Init` is re-entered from any phase on disconnect, timeout or QUIT.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Tear down whatever is left and reset the session.
    Init,
    /// Waiting for a control connection.
    Wait,
    /// Connection accepted, greeting not yet sent.
    Check,
    AwaitingUser,
    AwaitingPassword,
    /// Login complete, success reply not yet sent.
    LoggedIn,
    Processing,
}

impl ControlState {
    /// Whether a control connection has been accepted in this phase.
    pub fn has_connection(self) -> bool {
        !matches!(self, ControlState::Init | ControlState::Wait)
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, ControlState::LoggedIn | ControlState::Processing)
    }
}
