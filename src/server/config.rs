//! Session settings
//!
//! Tunables the engine reads while serving a session. The binary derives
//! them from `crate::config::ServerConfig`; tests build them directly.

use std::net::Ipv4Addr;
use std::time::Duration;

/// Engine settings, fixed for the lifetime of a server except the idle
/// timeout (see `FtpServer::set_timeout`).
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Inactivity allowed in `Processing` before the session is dropped.
    pub idle_timeout: Duration,
    /// Time allowed for each of USER and PASS after connecting.
    pub login_timeout: Duration,
    /// Address advertised by PASV instead of the control socket's local one.
    pub passive_address: Option<Ipv4Addr>,
    /// Upper bound for any transfer buffer.
    pub max_buffer_size: usize,
    /// Preferred buffer for RETR and listings.
    pub retrieve_buffer_size: usize,
    /// Preferred buffer for STOR.
    pub store_buffer_size: usize,
    /// Largest single allocation the host can spare for a transfer
    /// buffer; bigger requests count as failed allocations. `None` leaves
    /// it to the allocator.
    pub buffer_budget: Option<usize>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(5 * 60),
            login_timeout: Duration::from_secs(10),
            passive_address: None,
            max_buffer_size: 32 * 1024,
            retrieve_buffer_size: 32 * 1024,
            store_buffer_size: 2048,
            buffer_budget: None,
        }
    }
}
