//! File permissions
//!
//! The backend has no ownership or permission model, so listings report
//! fixed modes: directories are 0755 and files 0644.

/// `ls -l` style permission string.
pub fn unix_permissions(is_dir: bool) -> &'static str {
    if is_dir { "drwxr-xr-x" } else { "-rw-r--r--" }
}

/// Octal mode as used by the MLSD `UNIX.mode` fact.
pub fn octal_mode(is_dir: bool) -> &'static str {
    if is_dir { "0755" } else { "0644" }
}
