//! Module `commands`
//!
//! Defines the command model shared by the parser and the dispatcher:
//! the recognised command codes, a parsed command line, and the status a
//! handler reports back to the session state machine.

use std::fmt;

/// FTP command codes understood by the server.
///
/// Tokens are matched on their exact text, so `LIS` or `LISTX` never alias
/// `LIST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpCommand {
    User,
    Pass,
    Quit,
    Noop,
    Cdup,
    Cwd,
    Pwd,
    Mode,
    Stru,
    Type,
    Pasv,
    Port,
    Abor,
    Dele,
    List,
    Mlsd,
    Nlst,
    Retr,
    Stor,
    Mkd,
    Rmd,
    Rnfr,
    Rnto,
    Feat,
    Mdtm,
    Size,
    Site,
    Syst,
    Unknown,
}

impl FtpCommand {
    /// Maps an upper-cased command token to its code.
    pub fn from_token(token: &str) -> Self {
        match token {
            "USER" => FtpCommand::User,
            "PASS" => FtpCommand::Pass,
            "QUIT" => FtpCommand::Quit,
            "NOOP" => FtpCommand::Noop,
            "CDUP" => FtpCommand::Cdup,
            "CWD" => FtpCommand::Cwd,
            "PWD" => FtpCommand::Pwd,
            "MODE" => FtpCommand::Mode,
            "STRU" => FtpCommand::Stru,
            "TYPE" => FtpCommand::Type,
            "PASV" => FtpCommand::Pasv,
            "PORT" => FtpCommand::Port,
            "ABOR" => FtpCommand::Abor,
            "DELE" => FtpCommand::Dele,
            "LIST" => FtpCommand::List,
            "MLSD" => FtpCommand::Mlsd,
            "NLST" => FtpCommand::Nlst,
            "RETR" => FtpCommand::Retr,
            "STOR" => FtpCommand::Stor,
            "MKD" => FtpCommand::Mkd,
            "RMD" => FtpCommand::Rmd,
            "RNFR" => FtpCommand::Rnfr,
            "RNTO" => FtpCommand::Rnto,
            "FEAT" => FtpCommand::Feat,
            "MDTM" => FtpCommand::Mdtm,
            "SIZE" => FtpCommand::Size,
            "SITE" => FtpCommand::Site,
            "SYST" => FtpCommand::Syst,
            _ => FtpCommand::Unknown,
        }
    }
}

/// A complete command line read from the control connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// The trimmed line as received (backslashes already turned into slashes).
    pub raw: String,
    /// Upper-cased command token.
    pub token: String,
    pub code: FtpCommand,
    /// Trimmed text after the first space, empty when there was none.
    pub params: String,
}

impl Command {
    /// Splits a trimmed, non-empty line into token and parameters.
    pub fn from_line(line: &str) -> Self {
        let raw = line.trim().to_string();
        let (token, params) = match raw.find(' ') {
            Some(pos) => (&raw[..pos], raw[pos + 1..].trim()),
            None => (raw.as_str(), ""),
        };
        let token = token.to_ascii_uppercase();
        Self {
            code: FtpCommand::from_token(&token),
            params: params.to_string(),
            token,
            raw,
        }
    }

    /// Rewrites the command in place, e.g. `CWD ..` into `CDUP`.
    pub fn rewrite(&mut self, code: FtpCommand) {
        self.code = code;
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never echo passwords into the logs.
        if self.code == FtpCommand::Pass {
            write!(f, "PASS ****")
        } else {
            write!(f, "{}", self.raw)
        }
    }
}

/// Outcome of one dispatch of a latched command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandStatus {
    /// Dispatch again on the next poll before reading new input; the
    /// command was rewritten or is waiting on the data channel.
    Reinvoke,
    /// Command fully handled.
    Success,
    /// Command fully handled but refused; login does not advance.
    Failure(String),
    /// Command fully handled and the control connection must be closed.
    CloseConnection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_token_and_params() {
        let cmd = Command::from_line("stor  my file.txt ");
        assert_eq!(cmd.token, "STOR");
        assert_eq!(cmd.code, FtpCommand::Stor);
        assert_eq!(cmd.params, "my file.txt");
    }

    #[test]
    fn no_space_means_no_params() {
        let cmd = Command::from_line("PASV");
        assert_eq!(cmd.code, FtpCommand::Pasv);
        assert!(cmd.params.is_empty());
    }

    #[test]
    fn tokens_match_exactly() {
        assert_eq!(FtpCommand::from_token("LIS"), FtpCommand::Unknown);
        assert_eq!(FtpCommand::from_token("LISTX"), FtpCommand::Unknown);
        assert_eq!(FtpCommand::from_token("MKD"), FtpCommand::Mkd);
        assert_eq!(FtpCommand::from_token("MKDX"), FtpCommand::Unknown);
    }

    #[test]
    fn password_is_masked_in_display() {
        let cmd = Command::from_line("PASS secret");
        assert_eq!(cmd.to_string(), "PASS ****");
    }
}
