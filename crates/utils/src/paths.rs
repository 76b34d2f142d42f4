//! Path resolution relative to a manifest directory

use std::path::{Component, Path, PathBuf};

/// Resolve `relative` against `base`.
///
/// Absolute paths are returned as-is (normalized). The result is lexically
/// normalized and does not need to exist.
pub fn resolve_path(relative: impl AsRef<Path>, base: impl AsRef<Path>) -> PathBuf {
    let relative = relative.as_ref();
    if relative.is_absolute() {
        return normalize_path(relative);
    }

    normalize_path(&base.as_ref().join(relative))
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment where there is one.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Directory containing `file`, or `.` when it has none
pub fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
