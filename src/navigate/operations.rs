//! Navigation operations implementation
//!
//! Pure functions over virtual paths. A virtual path always starts with
//! `/` and never ends with `/` unless it is exactly `/`.

/// Resolves a path argument against the current working directory.
///
/// An argument starting with `/` is taken as absolute, anything else is
/// appended to `cwd` with exactly one `/` in between. When `include_last`
/// is false the last path component is dropped, leaving the containing
/// directory.
pub fn resolve_path(cwd: &str, param: &str, include_last: bool) -> String {
    let mut path = if param.starts_with('/') {
        param.to_string()
    } else {
        let mut path = String::with_capacity(cwd.len() + param.len() + 1);
        if !cwd.starts_with('/') {
            path.push('/');
        }
        path.push_str(cwd);
        if !param.is_empty() {
            if !path.ends_with('/') {
                path.push('/');
            }
            path.push_str(param);
        }
        path
    };

    if !include_last {
        if let Some(last_slash) = path.rfind('/') {
            path.truncate(last_slash);
        }
    }

    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

/// Parent directory of `cwd`, as used by CDUP.
pub fn parent_path(cwd: &str) -> String {
    resolve_path(cwd, "", false)
}

/// Resolves `param` to a file path. With `full_path` false only the leaf
/// name is returned.
pub fn file_name(cwd: &str, param: &str, full_path: bool) -> String {
    let path = resolve_path(cwd, param, true);
    if full_path {
        return path;
    }
    match path.rfind('/') {
        Some(last_slash) if last_slash + 1 < path.len() => path[last_slash + 1..].to_string(),
        _ => path,
    }
}
