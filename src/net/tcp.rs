//! Module `tcp`
//!
//! std::net implementation of the transport traits. All sockets run in
//! non-blocking mode; a closed peer shows up as a zero-length read or peek.

use log::{debug, info, warn};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{
    IpAddr, Ipv4Addr, Shutdown, SocketAddr, SocketAddrV4, TcpListener, TcpStream,
};
use std::time::Duration;

use super::{Connection, Connector, Listener};

/// A TCP listener bound lazily by `begin`.
pub struct TcpListenerHandle {
    addr: SocketAddr,
    listener: Option<TcpListener>,
}

impl TcpListenerHandle {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            listener: None,
        }
    }
}

impl Listener for TcpListenerHandle {
    type Conn = TcpConnection;

    fn begin(&mut self) -> io::Result<()> {
        let listener = TcpListener::bind(self.addr)?;
        listener.set_nonblocking(true)?;
        info!("Listening on {}", listener.local_addr()?);
        self.listener = Some(listener);
        Ok(())
    }

    fn accept(&mut self) -> io::Result<Option<TcpConnection>> {
        let Some(listener) = self.listener.as_ref() else {
            return Ok(None);
        };
        match listener.accept() {
            Ok((stream, peer)) => {
                debug!("Accepted connection from {} on {}", peer, self.addr);
                TcpConnection::new(stream).map(Some)
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn local_port(&self) -> u16 {
        self.listener
            .as_ref()
            .and_then(|l| l.local_addr().ok())
            .map(|addr| addr.port())
            .unwrap_or_else(|| self.addr.port())
    }

    fn stop(&mut self) {
        if self.listener.take().is_some() {
            info!("Stopped listening on {}", self.addr);
        }
    }
}

/// A non-blocking TCP stream.
pub struct TcpConnection {
    stream: TcpStream,
    connected: bool,
}

impl TcpConnection {
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to disable Nagle on stream: {}", e);
        }
        Ok(Self {
            stream,
            connected: true,
        })
    }
}

impl Connection for TcpConnection {
    fn is_connected(&mut self) -> bool {
        if !self.connected {
            return false;
        }
        let mut peeked = [0u8; 1];
        match self.stream.peek(&mut peeked) {
            Ok(0) => self.connected = false,
            Ok(_) => {}
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {}
            Err(_) => self.connected = false,
        }
        self.connected
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.stream.read(buf) {
            Ok(0) => {
                self.connected = false;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => Ok(0),
            Err(e) => {
                self.connected = false;
                Err(e)
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self.stream.write(data) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => Ok(0),
            Err(e) => {
                self.connected = false;
                Err(e)
            }
        }
    }

    fn local_ip(&self) -> Option<Ipv4Addr> {
        match self.stream.local_addr().ok()?.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(ip) => ip.to_ipv4_mapped(),
        }
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.peer_addr().ok()
    }

    fn close(&mut self) {
        if self.connected {
            let _ = self.stream.shutdown(Shutdown::Both);
            self.connected = false;
        }
    }
}

/// Active-mode connector with a short connect timeout.
pub struct TcpConnector {
    timeout: Duration,
}

impl TcpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Connector for TcpConnector {
    type Conn = TcpConnection;

    fn connect(&mut self, addr: SocketAddrV4) -> io::Result<TcpConnection> {
        let stream = TcpStream::connect_timeout(&SocketAddr::V4(addr), self.timeout)?;
        TcpConnection::new(stream)
    }
}
