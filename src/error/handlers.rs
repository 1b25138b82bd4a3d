//! Error handlers
//!
//! Maps filesystem failures onto the reply codes the dispatcher sends.

use crate::error::types::StorageError;
use log::warn;

/// Log a storage failure for the given command and hand back the reply code
/// that best describes it.
///
/// Missing files and traversal attempts are indistinguishable to the client
/// (550); anything the backend could not complete is a local error (450).
pub fn storage_error_code(command: &str, err: &StorageError) -> u16 {
    warn!("{} failed: {}", command, err);
    match err {
        StorageError::FileNotFound(_)
        | StorageError::NotADirectory(_)
        | StorageError::PathTraversal(_)
        | StorageError::DirectoryNotEmpty(_) => 550,
        StorageError::IsADirectory(_) | StorageError::IoError(_) => 450,
    }
}
