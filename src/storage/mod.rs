//! File system storage
//!
//! The filesystem collaborator boundary, a directory-rooted std
//! implementation of it, and the rendering of directory listings.

pub mod filesystem;
pub mod operations;
pub mod permissions;
pub mod results;
pub mod validation;

pub use filesystem::{FileHandle, FileSystem, LocalFile, LocalFileSystem};
pub use operations::{ListingFormat, format_timestamp, render_listing};
pub use results::{DirEntry, Metadata};
