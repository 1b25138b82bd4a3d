//! Transport collaborators
//!
//! The engine never touches sockets directly. It is handed a control
//! listener, a passive-data listener and an active-mode connector, all of
//! which must answer immediately whatever the state of the network.

pub mod tcp;

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

pub use tcp::{TcpConnection, TcpConnector, TcpListenerHandle};

/// A connected byte stream (control or data).
pub trait Connection {
    /// Whether the peer is still connected. Bytes already received may
    /// still be readable after this turns false.
    fn is_connected(&mut self) -> bool;

    /// Reads whatever is available right now, at most `buf.len()` bytes.
    /// Returns 0 when nothing is available.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes as much of `data` as the stream accepts right now.
    /// Returns 0 when it cannot take any bytes at the moment.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Local IPv4 address the peer reached us on.
    fn local_ip(&self) -> Option<Ipv4Addr>;

    fn peer_addr(&self) -> Option<SocketAddr>;

    /// Closes the stream. Idempotent.
    fn close(&mut self);
}

/// A listening socket polled for incoming connections.
pub trait Listener {
    type Conn: Connection;

    /// Starts listening.
    fn begin(&mut self) -> io::Result<()>;

    /// Returns a pending connection if one is waiting.
    fn accept(&mut self) -> io::Result<Option<Self::Conn>>;

    fn local_port(&self) -> u16;

    /// Stops listening. Idempotent.
    fn stop(&mut self);
}

/// Opens outbound data connections for active mode.
pub trait Connector {
    type Conn: Connection;

    /// Connects to `addr`, succeeding or failing without a lengthy wait.
    fn connect(&mut self, addr: SocketAddrV4) -> io::Result<Self::Conn>;
}
