//! FTP Transfer modes
//!
//! How the data connection is established.

use std::net::SocketAddrV4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// The server listens on its fixed data port and the client connects.
    #[default]
    Passive,
    /// The server connects to the endpoint given by PORT.
    Active(SocketAddrV4),
}

/// Direction of an in-flight transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// File (or listing) to data connection.
    Retrieve,
    /// Data connection to file.
    Store,
}
