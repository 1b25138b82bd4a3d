//! Client session state
//!
//! Per-connection state owned by the server: the control-connection phase,
//! working directory, pending rename and the active timeout deadline.

pub mod session;
pub mod state;

pub use session::Session;
pub use state::ControlState;
