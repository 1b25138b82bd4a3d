//! FTP Command parsing
//!
//! Incremental line framing over the control connection. The parser pulls
//! bytes only while no command is latched, so a handler that needs several
//! polls (e.g. waiting for a data connection) keeps its command until the
//! dispatcher retires it.

use std::collections::VecDeque;

use log::{debug, warn};

use crate::net::Connection;
use crate::protocol::commands::Command;
use crate::protocol::responses::{Replies, UNKNOWN_COMMAND};

/// Longest command line accepted, in bytes.
pub const MAX_COMMAND_LENGTH: usize = 127;

const READ_CHUNK: usize = 64;

#[derive(Debug, Default)]
pub struct CommandParser {
    /// Bytes read from the socket but not yet framed.
    inbound: VecDeque<u8>,
    line: Vec<u8>,
    /// Set after an over-long line until its terminator arrives.
    discarding: bool,
    latched: Option<Command>,
}

impl CommandParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latched command, framing a new one from the control
    /// connection if none is latched. Never waits for input.
    pub fn poll_command<S: Connection>(
        &mut self,
        control: &mut S,
        replies: &mut Replies,
    ) -> Option<&mut Command> {
        if self.latched.is_none() {
            self.latched = self.frame(control, replies);
        }
        self.latched.as_mut()
    }

    /// Releases the latched command so the next poll reads new input.
    pub fn retire(&mut self) {
        self.latched = None;
    }

    /// Forgets buffered input, partial lines and the latched command.
    pub fn reset(&mut self) {
        self.inbound.clear();
        self.line.clear();
        self.discarding = false;
        self.latched = None;
    }

    fn frame<S: Connection>(&mut self, control: &mut S, replies: &mut Replies) -> Option<Command> {
        loop {
            let byte = match self.inbound.pop_front() {
                Some(byte) => byte,
                None => {
                    if !self.fill(control) {
                        return None;
                    }
                    continue;
                }
            };

            match byte {
                b'\r' | b'\n' => {
                    if self.discarding {
                        self.discarding = false;
                        continue;
                    }
                    let line = String::from_utf8_lossy(&self.line).trim().to_string();
                    self.line.clear();
                    if line.is_empty() {
                        continue;
                    }
                    let command = Command::from_line(&line);
                    debug!("<<< {}", command);
                    return Some(command);
                }
                _ if self.discarding => {}
                _ => {
                    self.line.push(if byte == b'\\' { b'/' } else { byte });
                    if self.line.len() > MAX_COMMAND_LENGTH {
                        warn!("Discarding command line longer than {} bytes", MAX_COMMAND_LENGTH);
                        self.line.clear();
                        self.discarding = true;
                        replies.send(UNKNOWN_COMMAND, "Line too long");
                    }
                }
            }
        }
    }

    /// Reads what the control connection has available. Returns false when
    /// nothing was read.
    fn fill<S: Connection>(&mut self, control: &mut S) -> bool {
        let mut chunk = [0u8; READ_CHUNK];
        match control.read(&mut chunk) {
            Ok(0) => false,
            Ok(n) => {
                self.inbound.extend(&chunk[..n]);
                true
            }
            Err(e) => {
                debug!("Control read failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::commands::FtpCommand;
    use std::io;
    use std::net::{Ipv4Addr, SocketAddr};

    /// Control stream that hands out its input a few bytes at a time.
    struct ScriptedControl {
        input: VecDeque<u8>,
        step: usize,
    }

    impl ScriptedControl {
        fn new(input: &[u8], step: usize) -> Self {
            Self {
                input: input.iter().copied().collect(),
                step,
            }
        }
    }

    impl Connection for ScriptedControl {
        fn is_connected(&mut self) -> bool {
            true
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.input.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.input.pop_front().unwrap();
            }
            Ok(n)
        }

        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            Ok(data.len())
        }

        fn local_ip(&self) -> Option<Ipv4Addr> {
            None
        }

        fn peer_addr(&self) -> Option<SocketAddr> {
            None
        }

        fn close(&mut self) {}
    }

    fn next(parser: &mut CommandParser, control: &mut ScriptedControl) -> Option<Command> {
        let mut replies = Replies::new();
        let cmd = parser.poll_command(control, &mut replies).cloned();
        parser.retire();
        cmd
    }

    #[test]
    fn frames_lines_split_across_reads() {
        let mut control = ScriptedControl::new(b"us", 64);
        let mut parser = CommandParser::new();
        let mut replies = Replies::new();
        assert!(parser.poll_command(&mut control, &mut replies).is_none());

        control.input.extend(b"er bob\r\n");
        let cmd = parser.poll_command(&mut control, &mut replies).unwrap();
        assert_eq!(cmd.code, FtpCommand::User);
        assert_eq!(cmd.params, "bob");
    }

    #[test]
    fn latched_command_blocks_further_reads() {
        let mut control = ScriptedControl::new(b"LIST\r\nNOOP\r\n", 64);
        let mut parser = CommandParser::new();
        let mut replies = Replies::new();

        assert_eq!(parser.poll_command(&mut control, &mut replies).unwrap().code, FtpCommand::List);
        assert_eq!(parser.poll_command(&mut control, &mut replies).unwrap().code, FtpCommand::List);
        parser.retire();
        assert_eq!(parser.poll_command(&mut control, &mut replies).unwrap().code, FtpCommand::Noop);
    }

    #[test]
    fn empty_lines_are_dropped() {
        let mut control = ScriptedControl::new(b"\r\n\r\n  \nPWD\n", 3);
        let mut parser = CommandParser::new();
        assert_eq!(next(&mut parser, &mut control).unwrap().code, FtpCommand::Pwd);
        assert!(next(&mut parser, &mut control).is_none());
    }

    #[test]
    fn backslashes_become_slashes() {
        let mut control = ScriptedControl::new(b"CWD dir\\sub\r\n", 5);
        let mut parser = CommandParser::new();
        assert_eq!(next(&mut parser, &mut control).unwrap().params, "dir/sub");
    }

    #[test]
    fn over_long_line_is_discarded_with_500() {
        let mut input = vec![b'A'; MAX_COMMAND_LENGTH + 40];
        input.extend_from_slice(b"\r\nNOOP\r\n");
        let mut control = ScriptedControl::new(&input, 16);
        let mut parser = CommandParser::new();
        let mut replies = Replies::new();

        let cmd = parser.poll_command(&mut control, &mut replies).cloned().unwrap();
        assert_eq!(cmd.code, FtpCommand::Noop);
        assert_eq!(replies.pending(), b"500 Line too long\r\n");
    }
}
