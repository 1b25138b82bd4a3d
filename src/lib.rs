//! pollftp
//!
//! A single-client FTP server engine driven entirely by polling. The host
//! owns the scheduling loop and calls `FtpServer::poll`; the engine never
//! blocks on the network or the filesystem.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod navigate;
pub mod net;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use server::{FtpServer, SessionSettings};
