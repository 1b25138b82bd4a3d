//! Storage result types
//!
//! Defines the structures returned by filesystem queries.

use std::time::SystemTime;

/// Facts about a single path.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// One entry of a directory enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    /// Leaf name, without any directory part.
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}
