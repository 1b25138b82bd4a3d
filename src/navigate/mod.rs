//! Path navigation
//!
//! Turns client-supplied path arguments into absolute virtual paths.

pub mod operations;

pub use operations::{file_name, parent_path, resolve_path};
