//! FTP Protocol implementation
//!
//! Command framing and model, the dispatcher, and reply formatting.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{Command, CommandStatus, FtpCommand};
pub use handlers::{DispatchContext, handle_command};
pub use parser::CommandParser;
pub use responses::{Replies, format_response};
