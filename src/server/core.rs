//! Server core
//!
//! `FtpServer` is the single-client engine. The host calls `poll` at its
//! own cadence; every call advances the control state machine, the
//! latched command and the in-flight transfer by a bounded amount of work
//! and returns without waiting on the network.

use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

use crate::auth::Credentials;
use crate::client::{ControlState, Session};
use crate::error::{FtpServerError, TransportError};
use crate::net::{Connection, Connector, Listener};
use crate::protocol::commands::{CommandStatus, FtpCommand};
use crate::protocol::handlers::{DispatchContext, handle_command};
use crate::protocol::parser::CommandParser;
use crate::protocol::responses::{
    LOGIN_SUCCESS, NOT_LOGGED_IN, PASSWORD_REQUIRED, READY, Replies, SERVICE_TERMINATED,
};
use crate::server::config::SessionSettings;
use crate::storage::FileSystem;
use crate::transfer::{
    DataChannel, DataMode, TransferContext, TransferProgress, abort_transfer, close_transfer,
    step,
};

/// Version reported in the greeting.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct FtpServer<L, C, F>
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    settings: SessionSettings,
    control_listener: L,
    control: Option<L::Conn>,
    parser: CommandParser,
    session: Session,
    replies: Replies,
    data: DataChannel<L, C>,
    /// `None` while no transfer is in flight.
    transfer: Option<TransferContext<F::File>>,
    fs: F,
    running: bool,
}

impl<L, C, F> FtpServer<L, C, F>
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    pub fn new(
        control_listener: L,
        data_listener: L,
        connector: C,
        fs: F,
        settings: SessionSettings,
    ) -> Self {
        Self {
            settings,
            control_listener,
            control: None,
            parser: CommandParser::new(),
            session: Session::new(Credentials::anonymous()),
            replies: Replies::new(),
            data: DataChannel::new(data_listener, connector),
            transfer: None,
            fs,
            running: false,
        }
    }

    /// Starts both listeners. An empty `username` or `password` disables
    /// that login factor.
    pub fn start(&mut self, username: &str, password: &str) -> Result<(), FtpServerError> {
        self.session = Session::new(Credentials::new(username, password));
        self.parser.reset();
        self.replies.clear();
        self.data.reset();

        self.control_listener.begin().map_err(|e| {
            error!("Control listener failed to start: {}", e);
            TransportError::ListenFailed(self.control_listener.local_port(), e)
        })?;
        let data_listener = self.data.listener_mut();
        if let Err(e) = data_listener.begin() {
            error!("Data listener failed to start: {}", e);
            let port = data_listener.local_port();
            self.control_listener.stop();
            return Err(TransportError::ListenFailed(port, e).into());
        }

        info!(
            "FTP server started: control port {}, passive data port {}",
            self.control_listener.local_port(),
            self.data.passive_port()
        );
        self.running = true;
        Ok(())
    }

    /// Aborts any transfer, says goodbye to a connected client and stops
    /// both listeners.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.disconnect_client(true);
        self.session.reset();
        self.session.set_state(ControlState::Init);
        self.control_listener.stop();
        self.data.listener_mut().stop();
        self.running = false;
        info!("FTP server stopped");
    }

    /// Changes the idle timeout used from the next time it is armed.
    pub fn set_timeout(&mut self, seconds: u64) {
        self.settings.idle_timeout = Duration::from_secs(seconds);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> ControlState {
        self.session.state()
    }

    pub fn cwd(&self) -> &str {
        self.session.cwd()
    }

    pub fn data_mode(&self) -> DataMode {
        self.data.mode()
    }

    pub fn is_transferring(&self) -> bool {
        self.transfer.is_some()
    }

    /// Advances the server by one tick.
    pub fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    /// Advances the server by one tick, `now` being the current time.
    pub fn poll_at(&mut self, now: Instant) {
        if !self.running {
            return;
        }

        match self.session.state() {
            ControlState::Init => self.enter_wait(),
            ControlState::Wait => self.accept_control(now),
            ControlState::Check => self.greet(),
            ControlState::LoggedIn => {
                self.replies.send(LOGIN_SUCCESS, "Login successful.");
                self.session.arm_timeout(now, self.settings.idle_timeout);
                self.session.set_state(ControlState::Processing);
            }
            ControlState::AwaitingUser
            | ControlState::AwaitingPassword
            | ControlState::Processing => self.process_command(now),
        }

        if self.session.state().has_connection() {
            self.supervise(now);
        }

        self.flush_replies();
    }

    /// `Init`: drop whatever is left of the last client and listen again.
    fn enter_wait(&mut self) {
        self.disconnect_client(true);
        self.session.reset();
        self.session.set_state(ControlState::Wait);
    }

    /// `Wait`: take a pending control connection, if any.
    fn accept_control(&mut self, now: Instant) {
        match self.control_listener.accept() {
            Ok(Some(connection)) => {
                if let Some(peer) = connection.peer_addr() {
                    info!("Control connection from {}", peer);
                }
                self.control = Some(connection);
                self.session.arm_timeout(now, self.settings.login_timeout);
                self.session.set_state(ControlState::Check);
            }
            Ok(None) => {}
            Err(e) => warn!("Accepting control connection failed: {}", e),
        }
    }

    /// `Check`: greet the client and pick the first login step.
    fn greet(&mut self) {
        let Some(control) = self.control.as_mut() else {
            self.session.set_state(ControlState::Init);
            return;
        };
        if !control.is_connected() {
            return;
        }

        self.replies.send(READY, &format!("(pollftp {})", SERVER_VERSION));
        let credentials = self.session.credentials();
        let next = if credentials.requires_username() {
            ControlState::AwaitingUser
        } else if credentials.requires_password() {
            ControlState::AwaitingPassword
        } else {
            ControlState::LoggedIn
        };
        self.session.set_state(next);
    }

    /// Reading phases: dispatch the latched command, if any. No command is
    /// read or dispatched while replies are still queued, so a client that
    /// stops reading stops being served.
    fn process_command(&mut self, now: Instant) {
        if !self.replies.is_empty() {
            return;
        }
        let Some(control) = self.control.as_mut() else {
            self.session.set_state(ControlState::Init);
            return;
        };
        let local_ip = control.local_ip();
        let Some(command) = self.parser.poll_command(control, &mut self.replies) else {
            return;
        };
        let state = self.session.state();
        let code = command.code;
        let mut ctx = DispatchContext {
            session: &mut self.session,
            data: &mut self.data,
            transfer: &mut self.transfer,
            fs: &mut self.fs,
            replies: &mut self.replies,
            settings: &self.settings,
            local_ip,
            now,
        };
        let status = handle_command(&mut ctx, command);

        match status {
            CommandStatus::Reinvoke => {}
            CommandStatus::Success => {
                self.parser.retire();
                self.advance_login(state, code, now);
            }
            CommandStatus::Failure(reason) => {
                debug!("Command refused: {}", reason);
                self.parser.retire();
                if state == ControlState::Processing {
                    self.session.arm_timeout(now, self.settings.idle_timeout);
                }
            }
            CommandStatus::CloseConnection => {
                self.parser.retire();
                self.disconnect_client(false);
                self.session.set_state(ControlState::Init);
            }
        }
    }

    /// Moves the login phase forward after a successful command.
    fn advance_login(&mut self, state: ControlState, code: FtpCommand, now: Instant) {
        match (state, code) {
            (ControlState::AwaitingUser, FtpCommand::User) => {
                if self.session.credentials().requires_password() {
                    self.session.arm_timeout(now, self.settings.login_timeout);
                    self.replies.send(PASSWORD_REQUIRED, "Please specify the password.");
                    self.session.set_state(ControlState::AwaitingPassword);
                } else {
                    self.session.set_state(ControlState::LoggedIn);
                }
            }
            (ControlState::AwaitingPassword, FtpCommand::Pass) => {
                self.session.set_state(ControlState::LoggedIn);
            }
            (ControlState::Processing, _) => {
                self.session.arm_timeout(now, self.settings.idle_timeout);
            }
            _ => {}
        }
    }

    /// Checks the connection and the deadline, then moves the transfer on.
    fn supervise(&mut self, now: Instant) {
        let connected = self.control.as_mut().is_some_and(|control| control.is_connected());
        if !connected {
            info!("Client lost or disconnected");
            self.drop_client();
            return;
        }

        if self.session.timed_out(now) {
            info!("Client connection timed out");
            self.replies.send(NOT_LOGGED_IN, "Timeout.");
            self.disconnect_client(true);
            self.session.reset();
            self.session.set_state(ControlState::Init);
            return;
        }

        let Some(transfer) = self.transfer.as_mut() else {
            return;
        };
        let before = transfer.bytes_transferred();
        let outcome = match self.data.socket_mut() {
            Some(socket) => step(transfer, socket),
            None => Ok(TransferProgress::Finished),
        };
        let moved = transfer.bytes_transferred() > before;
        match outcome {
            Ok(TransferProgress::Continue) => {
                if moved && self.session.state() == ControlState::Processing {
                    self.session.arm_timeout(now, self.settings.idle_timeout);
                }
            }
            Ok(TransferProgress::Finished) => {
                close_transfer(&mut self.transfer, &mut self.data, &mut self.replies, now);
            }
            Err(e) => {
                warn!("Transfer failed: {}", e);
                abort_transfer(&mut self.transfer, &mut self.data, &mut self.replies);
            }
        }
    }

    /// Tears down after the peer vanished; nothing can be sent any more.
    fn drop_client(&mut self) {
        abort_transfer(&mut self.transfer, &mut self.data, &mut self.replies);
        self.replies.clear();
        if let Some(mut control) = self.control.take() {
            control.close();
        }
        self.data.reset();
        self.parser.reset();
        self.session.reset();
        self.session.set_state(ControlState::Init);
    }

    /// Aborts the transfer, answers 231 if `terminated` and a client is
    /// still connected, and closes every connection. Queued replies are
    /// flushed first.
    fn disconnect_client(&mut self, terminated: bool) {
        abort_transfer(&mut self.transfer, &mut self.data, &mut self.replies);
        if let Some(control) = self.control.as_mut().filter(|_| terminated) {
            if control.is_connected() {
                self.replies.send(SERVICE_TERMINATED, "Service terminated.");
            }
        }
        self.flush_replies();
        self.replies.clear();
        if let Some(mut control) = self.control.take() {
            debug!("Disconnecting client");
            control.close();
        }
        self.data.reset();
        self.parser.reset();
    }

    /// Writes queued replies without waiting; an unwritten tail stays
    /// queued for the next poll.
    fn flush_replies(&mut self) {
        let Some(control) = self.control.as_mut() else {
            self.replies.clear();
            return;
        };
        while !self.replies.is_empty() {
            match control.write(self.replies.pending()) {
                Ok(0) => break,
                Ok(written) => self.replies.consume(written),
                Err(e) => {
                    debug!("Dropping replies, control write failed: {}", e);
                    self.replies.clear();
                    break;
                }
            }
        }
    }
}
