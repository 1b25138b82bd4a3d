//! Path validation
//!
//! Maps virtual paths onto the served root directory and refuses anything
//! that would step outside it.

use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Converts a virtual absolute path (`/a/b`) into a real path under `root`.
pub fn virtual_to_real_path(root: &Path, virtual_path: &str) -> Result<PathBuf, StorageError> {
    let relative = Path::new(virtual_path.trim_start_matches('/'));
    let mut real = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => real.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathTraversal(virtual_path.to_string()));
            }
        }
    }
    Ok(real)
}
