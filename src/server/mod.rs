//! Server core functionality
//!
//! The poll-driven session state machine and the settings it runs with.

pub mod config;
pub mod core;

pub use config::SessionSettings;
pub use core::{FtpServer, SERVER_VERSION};
