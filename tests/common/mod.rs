//! In-memory transports for driving `FtpServer` without sockets.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use pollftp::net::{Connection, Connector, Listener};
use pollftp::storage::LocalFileSystem;
use pollftp::{FtpServer, SessionSettings};

pub const CONTROL_PORT: u16 = 2121;
pub const DATA_PORT: u16 = 50009;
pub const LOCAL_IP: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 1);

#[derive(Default)]
struct Pipe {
    to_server: VecDeque<u8>,
    from_server: Vec<u8>,
    peer_closed: bool,
    server_closed: bool,
    /// Most bytes the server may write per call; `None` is unlimited.
    window: Option<usize>,
}

/// Server side of an in-memory stream.
pub struct MockConnection {
    pipe: Rc<RefCell<Pipe>>,
}

/// Test side of an in-memory stream.
#[derive(Clone)]
pub struct Peer {
    pipe: Rc<RefCell<Pipe>>,
}

fn pair() -> (MockConnection, Peer) {
    let pipe = Rc::new(RefCell::new(Pipe::default()));
    (
        MockConnection {
            pipe: Rc::clone(&pipe),
        },
        Peer { pipe },
    )
}

impl Connection for MockConnection {
    fn is_connected(&mut self) -> bool {
        let pipe = self.pipe.borrow();
        !pipe.peer_closed && !pipe.server_closed
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut pipe = self.pipe.borrow_mut();
        let n = buf.len().min(pipe.to_server.len());
        for (slot, byte) in buf.iter_mut().zip(pipe.to_server.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut pipe = self.pipe.borrow_mut();
        if pipe.server_closed || pipe.peer_closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        let n = pipe.window.map_or(data.len(), |window| data.len().min(window));
        pipe.from_server.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn local_ip(&self) -> Option<Ipv4Addr> {
        Some(LOCAL_IP)
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        Some(SocketAddr::from(([127, 0, 0, 1], 40000)))
    }

    fn close(&mut self) {
        self.pipe.borrow_mut().server_closed = true;
    }
}

impl Peer {
    pub fn send(&self, text: &str) {
        self.send_bytes(text.as_bytes());
    }

    pub fn send_bytes(&self, bytes: &[u8]) {
        self.pipe.borrow_mut().to_server.extend(bytes);
    }

    pub fn close(&self) {
        self.pipe.borrow_mut().peer_closed = true;
    }

    pub fn set_window(&self, window: usize) {
        self.pipe.borrow_mut().window = Some(window);
    }

    /// Everything the server wrote since the last call.
    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut self.pipe.borrow_mut().from_server);
        String::from_utf8(bytes).expect("server output is UTF-8")
    }

    pub fn received(&self) -> Vec<u8> {
        self.pipe.borrow().from_server.clone()
    }

    pub fn closed_by_server(&self) -> bool {
        self.pipe.borrow().server_closed
    }
}

#[derive(Default)]
struct ListenerState {
    listening: bool,
    pending: VecDeque<MockConnection>,
}

/// Listener whose pending connections are queued by the test.
#[derive(Clone)]
pub struct MockListener {
    port: u16,
    state: Rc<RefCell<ListenerState>>,
}

impl MockListener {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            state: Rc::default(),
        }
    }

    /// Queues an incoming connection and returns the client end.
    pub fn connect(&self) -> Peer {
        let (connection, peer) = pair();
        self.state.borrow_mut().pending.push_back(connection);
        peer
    }

    pub fn is_listening(&self) -> bool {
        self.state.borrow().listening
    }
}

impl Listener for MockListener {
    type Conn = MockConnection;

    fn begin(&mut self) -> io::Result<()> {
        self.state.borrow_mut().listening = true;
        Ok(())
    }

    fn accept(&mut self) -> io::Result<Option<MockConnection>> {
        let mut state = self.state.borrow_mut();
        if !state.listening {
            return Ok(None);
        }
        Ok(state.pending.pop_front())
    }

    fn local_port(&self) -> u16 {
        self.port
    }

    fn stop(&mut self) {
        self.state.borrow_mut().listening = false;
    }
}

#[derive(Default)]
struct ConnectorState {
    refuse: bool,
    attempts: Vec<SocketAddrV4>,
    peers: Vec<Peer>,
}

/// Active-mode connector recording every attempt.
#[derive(Clone, Default)]
pub struct MockConnector {
    state: Rc<RefCell<ConnectorState>>,
}

impl MockConnector {
    pub fn refuse(&self, refuse: bool) {
        self.state.borrow_mut().refuse = refuse;
    }

    pub fn attempts(&self) -> Vec<SocketAddrV4> {
        self.state.borrow().attempts.clone()
    }

    /// Client end of the most recent successful connect.
    pub fn last_peer(&self) -> Option<Peer> {
        self.state.borrow().peers.last().cloned()
    }
}

impl Connector for MockConnector {
    type Conn = MockConnection;

    fn connect(&mut self, addr: SocketAddrV4) -> io::Result<MockConnection> {
        let mut state = self.state.borrow_mut();
        state.attempts.push(addr);
        if state.refuse {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        let (connection, peer) = pair();
        state.peers.push(peer);
        Ok(connection)
    }
}

pub type TestServer = FtpServer<MockListener, MockConnector, LocalFileSystem>;

/// A started server over a temporary root, with a controllable clock.
pub struct Harness {
    pub server: TestServer,
    pub control: MockListener,
    pub data: MockListener,
    pub connector: MockConnector,
    pub root: tempfile::TempDir,
    pub now: Instant,
}

impl Harness {
    pub fn new(username: &str, password: &str) -> Self {
        Self::with_settings(username, password, SessionSettings::default())
    }

    pub fn with_settings(username: &str, password: &str, settings: SessionSettings) -> Self {
        let root = tempfile::tempdir().expect("temp root");
        let control = MockListener::new(CONTROL_PORT);
        let data = MockListener::new(DATA_PORT);
        let connector = MockConnector::default();
        let mut server = FtpServer::new(
            control.clone(),
            data.clone(),
            connector.clone(),
            LocalFileSystem::new(root.path()),
            settings,
        );
        server.start(username, password).expect("server starts");
        Self {
            server,
            control,
            data,
            connector,
            root,
            now: Instant::now(),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn tick(&mut self) {
        self.server.poll_at(self.now);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Connects a client and polls until the greeting has been sent.
    pub fn connect(&mut self) -> Peer {
        let peer = self.control.connect();
        self.ticks(4);
        peer
    }

    /// Connects a client to an anonymous server and drains the greeting
    /// and login replies.
    pub fn login(&mut self) -> Peer {
        let peer = self.connect();
        self.tick();
        let banner = peer.take_output();
        assert!(banner.starts_with("220 "), "unexpected banner {:?}", banner);
        peer
    }

    /// Sends one command line and returns everything answered within a
    /// few polls.
    pub fn command(&mut self, peer: &Peer, line: &str) -> String {
        peer.send(line);
        peer.send("\r\n");
        self.ticks(6);
        peer.take_output()
    }
}
