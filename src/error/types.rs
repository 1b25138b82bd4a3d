//! Error types
//!
//! Defines domain-specific error types for each part of the FTP engine.
//! None of these escape `FtpServer::poll`; they are turned into replies
//! or a session reset. Only `FtpServer::start` and configuration loading
//! hand them back to the host.

use std::fmt;
use std::io;

/// Authentication errors
#[derive(Debug, PartialEq)]
pub enum AuthError {
    UserNotFound(String),
    InvalidPassword,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UserNotFound(u) => write!(f, "User not found: {}", u),
            AuthError::InvalidPassword => write!(f, "Password invalid"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Filesystem backend errors
#[derive(Debug)]
pub enum StorageError {
    FileNotFound(String),
    NotADirectory(String),
    IsADirectory(String),
    DirectoryNotEmpty(String),
    PathTraversal(String),
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::FileNotFound(p) => write!(f, "File not found: {}", p),
            StorageError::NotADirectory(p) => write!(f, "Not a directory: {}", p),
            StorageError::IsADirectory(p) => write!(f, "Is a directory: {}", p),
            StorageError::DirectoryNotEmpty(p) => write!(f, "Directory not empty: {}", p),
            StorageError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

/// Transfer engine errors
#[derive(Debug)]
pub enum TransferError {
    FileReadFailed(io::Error),
    FileWriteFailed(io::Error),
    DataSocketFailed(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::FileReadFailed(e) => write!(f, "File read failed: {}", e),
            TransferError::FileWriteFailed(e) => write!(f, "File write failed: {}", e),
            TransferError::DataSocketFailed(e) => write!(f, "Data socket failed: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

/// Transport (socket) errors
#[derive(Debug)]
pub enum TransportError {
    /// A listener could not be started on the given port.
    ListenFailed(u16, io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ListenFailed(port, e) => {
                write!(f, "Failed to listen on port {}: {}", port, e)
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// Errors handed back to the host by `FtpServer::start` and the binary
#[derive(Debug)]
pub enum FtpServerError {
    Transport(TransportError),
    Config(config::ConfigError),
}

impl fmt::Display for FtpServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtpServerError::Transport(e) => write!(f, "Transport error: {}", e),
            FtpServerError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for FtpServerError {}

impl From<TransportError> for FtpServerError {
    fn from(error: TransportError) -> Self {
        FtpServerError::Transport(error)
    }
}

impl From<config::ConfigError> for FtpServerError {
    fn from(error: config::ConfigError) -> Self {
        FtpServerError::Config(error)
    }
}
