//! Path utilities for tree keys.
//!
//! Cache keys are absolute `/`-separated paths without a trailing slash. The
//! root is the empty string internally and `/` when addressed to a source.

/// Cache key of the root directory.
pub const ROOT: &str = "";

/// Normalize a path into a cache key.
///
/// Collapses repeated separators, drops a trailing slash and guarantees a single
/// leading `/`. Both `""` and `"/"` map to [`ROOT`].
pub fn normalize(path: &str) -> String {
    let mut key = String::with_capacity(path.len() + 1);
    for segment in segments(path) {
        key.push('/');
        key.push_str(segment);
    }
    key
}

/// Address used when asking a source for the listing of `path`.
pub fn backend_address(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Non-empty `/`-delimited segments of `path`.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Display name for a directory node: its final segment, or `root_name`.
pub fn display_name(path: &str, root_name: &str) -> String {
    match path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => root_name.to_string(),
    }
}

/// Strict ancestors of `target`, root first, `target` itself excluded.
///
/// `/a/b/c` yields `["", "/a", "/a/b"]`; the root yields nothing.
pub fn ancestors(target: &str) -> Vec<String> {
    let parts = segments(target);
    if parts.is_empty() {
        return Vec::new();
    }

    let mut chain = Vec::with_capacity(parts.len());
    let mut current = String::new();
    chain.push(current.clone());
    for part in &parts[..parts.len() - 1] {
        current.push('/');
        current.push_str(part);
        chain.push(current.clone());
    }
    chain
}

/// Key of the child `name` below the normalized key `parent`.
pub fn join(parent: &str, name: &str) -> String {
    normalize(&format!("{}/{}", parent, name))
}

/// Whether `path` lies strictly below `ancestor`. Both are normalized keys.
pub fn is_descendant(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// Number of segments below the root.
pub fn depth(path: &str) -> usize {
    segments(path).len()
}
