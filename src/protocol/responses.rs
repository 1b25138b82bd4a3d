//! FTP Response handling
//!
//! Defines FTP response codes, the single reply formatting function, and
//! the outbox replies are queued in until the server flushes them to the
//! control connection.

use log::debug;

/// Standard FTP response codes
pub const OPENING_DATA: u16 = 150;
pub const OK: u16 = 200;
pub const FILE_STATUS: u16 = 213;
pub const SYSTEM_TYPE: u16 = 215;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const PASSIVE_MODE: u16 = 227;
pub const LOGIN_SUCCESS: u16 = 230;
pub const SERVICE_TERMINATED: u16 = 231;
pub const FEATURES: u16 = 211;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATH_CREATED: u16 = 257;
pub const PASSWORD_REQUIRED: u16 = 331;
pub const PENDING_FURTHER_INFO: u16 = 350;
pub const NO_DATA_CONNECTION: u16 = 425;
pub const TRANSFER_ABORTED: u16 = 426;
pub const INVALID_CREDENTIALS: u16 = 430;
pub const FILE_UNAVAILABLE: u16 = 450;
pub const LOCAL_ERROR: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const BAD_PARAMETERS: u16 = 501;
pub const NOT_IMPLEMENTED: u16 = 502;
pub const BAD_SEQUENCE: u16 = 503;
pub const PARAMETER_NOT_IMPLEMENTED: u16 = 504;
pub const NOT_LOGGED_IN: u16 = 530;
pub const FILE_NOT_FOUND: u16 = 550;
pub const FILE_EXISTS: u16 = 553;

/// Format an FTP response line.
///
/// `continued` selects the multi-line separator (`211-...`) instead of the
/// final one (`211 ...`).
pub fn format_response(code: u16, continued: bool, message: &str) -> String {
    let separator = if continued { '-' } else { ' ' };
    format!("{}{}{}\r\n", code, separator, message)
}

/// Replies waiting to be written to the control connection.
#[derive(Debug, Default)]
pub struct Replies {
    outbox: Vec<u8>,
}

impl Replies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a final reply line.
    pub fn send(&mut self, code: u16, message: &str) {
        self.push(code, false, message);
    }

    /// Queue a continuation line of a multi-line reply.
    pub fn send_continued(&mut self, code: u16, message: &str) {
        self.push(code, true, message);
    }

    /// Queue a line without a reply code, used inside multi-line replies.
    pub fn send_raw(&mut self, line: &str) {
        debug!(">>> {}", line);
        self.outbox.extend_from_slice(line.as_bytes());
        self.outbox.extend_from_slice(b"\r\n");
    }

    fn push(&mut self, code: u16, continued: bool, message: &str) {
        let line = format_response(code, continued, message);
        debug!(">>> {}", line.trim_end());
        self.outbox.extend_from_slice(line.as_bytes());
    }

    pub fn is_empty(&self) -> bool {
        self.outbox.is_empty()
    }

    /// Bytes not yet written to the control connection.
    pub fn pending(&self) -> &[u8] {
        &self.outbox
    }

    /// Drop the first `written` bytes after a (possibly partial) write.
    pub fn consume(&mut self, written: usize) {
        let written = written.min(self.outbox.len());
        self.outbox.drain(..written);
    }

    pub fn clear(&mut self) {
        self.outbox.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_and_continued_separators() {
        assert_eq!(format_response(220, false, "hello"), "220 hello\r\n");
        assert_eq!(format_response(211, true, "Features:"), "211-Features:\r\n");
    }

    #[test]
    fn outbox_keeps_unwritten_tail() {
        let mut replies = Replies::new();
        replies.send(200, "Zzz...");
        replies.consume(4);
        assert_eq!(replies.pending(), b"Zzz...\r\n");
        replies.consume(100);
        assert!(replies.is_empty());
    }

    #[test]
    fn multi_line_reply_layout() {
        let mut replies = Replies::new();
        replies.send_continued(211, "Features:");
        replies.send_raw(" MLSD");
        replies.send(211, "End.");
        assert_eq!(replies.pending(), b"211-Features:\r\n MLSD\r\n211 End.\r\n");
    }
}
