//! Module `data_channel`
//!
//! Owns the passive-data listener, the active-mode connector and the one
//! data socket a session may hold. `ready` is polled by the LIST/RETR/STOR
//! handlers until it reports `Ready` or `Failed`; it never waits.

use log::{debug, info, warn};
use std::net::SocketAddrV4;

use crate::net::{Connection, Connector, Listener};
use crate::transfer::modes::DataMode;
use crate::transfer::results::DataReady;

pub struct DataChannel<L, C>
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
{
    listener: L,
    connector: C,
    mode: DataMode,
    socket: Option<L::Conn>,
}

impl<L, C> DataChannel<L, C>
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
{
    pub fn new(listener: L, connector: C) -> Self {
        Self {
            listener,
            connector,
            mode: DataMode::Passive,
            socket: None,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    /// Port the passive listener accepts data connections on.
    pub fn passive_port(&self) -> u16 {
        self.listener.local_port()
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Switches to passive mode, dropping any existing data socket.
    pub fn enter_passive(&mut self) {
        self.close();
        self.mode = DataMode::Passive;
    }

    /// Switches to active mode towards `endpoint`.
    pub fn enter_active(&mut self, endpoint: SocketAddrV4) {
        self.close();
        self.mode = DataMode::Active(endpoint);
        info!("Data connection management active, using {}", endpoint);
    }

    /// Tries to have a connected data socket.
    pub fn ready(&mut self) -> DataReady {
        match self.mode {
            DataMode::Active(endpoint) => {
                self.close();
                debug!("Opening active data connection to {}", endpoint);
                match self.connector.connect(endpoint) {
                    Ok(mut socket) => {
                        if !socket.is_connected() {
                            warn!("Active data connection to {} closed immediately", endpoint);
                            return DataReady::Failed;
                        }
                        self.socket = Some(socket);
                        DataReady::Ready
                    }
                    Err(e) => {
                        warn!("Active data connection to {} failed: {}", endpoint, e);
                        DataReady::Failed
                    }
                }
            }
            DataMode::Passive => {
                if self.socket.as_mut().is_some_and(|s| s.is_connected()) {
                    return DataReady::Ready;
                }
                match self.listener.accept() {
                    Ok(Some(socket)) => {
                        self.close();
                        if let Some(peer) = socket.peer_addr() {
                            info!("Got incoming (passive) data connection from {}", peer);
                        }
                        self.socket = Some(socket);
                        DataReady::Ready
                    }
                    Ok(None) => DataReady::NotReady,
                    Err(e) => {
                        warn!("Accepting passive data connection failed: {}", e);
                        DataReady::Failed
                    }
                }
            }
        }
    }

    pub fn socket_mut(&mut self) -> Option<&mut L::Conn> {
        self.socket.as_mut()
    }

    /// Closes and drops the data socket, if any.
    pub fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            socket.close();
            debug!("Data connection closed");
        }
    }

    /// Back to the session defaults: passive mode, no socket.
    pub fn reset(&mut self) {
        self.close();
        self.mode = DataMode::Passive;
    }
}
