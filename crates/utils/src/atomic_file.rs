//! Atomic file replacement so a vault file is never left half-written

use rigger_core::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Write data to a file atomically by writing to a temporary file and renaming
///
/// An existing file keeps its permission bits. A new file is created with
/// `default_mode` (ignored on platforms without unix permissions). The
/// temporary file is owner-only until the content is synced.
pub fn write_atomic(path: &Path, content: &[u8], default_mode: u32) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(Error::configuration(format!(
                "invalid file path '{}': no parent directory",
                path.display()
            )))
        }
    };

    fs::create_dir_all(parent)
        .map_err(|e| Error::file_system(parent.to_path_buf(), "create parent directory", e))?;

    let mode = existing_mode(path).unwrap_or(default_mode);

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

    let result = (|| -> Result<()> {
        let mut file = create_temp(&temp_path, mode)?;

        file.write_all(content)
            .map_err(|e| Error::file_system(&temp_path, "write to temporary file", e))?;

        file.sync_all()
            .map_err(|e| Error::file_system(&temp_path, "sync temporary file", e))?;

        apply_mode(&temp_path, mode)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
        return result;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::file_system(path.to_path_buf(), "atomic rename", e)
    })?;

    Ok(())
}

/// Write string content to a file atomically
pub fn write_atomic_string(path: &Path, content: &str, default_mode: u32) -> Result<()> {
    write_atomic(path, content.as_bytes(), default_mode)
}

fn create_temp(path: &Path, mode: u32) -> Result<File> {
    let mut options = OpenOptions::new();
    options.create_new(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & 0o700);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options
        .open(path)
        .map_err(|e| Error::file_system(path, "create temporary file", e))
}

#[cfg(unix)]
fn existing_mode(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .ok()
        .map(|meta| meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn existing_mode(_path: &Path) -> Option<u32> {
    None
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| Error::file_system(path, "set permissions", e))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secrets.env");

        write_atomic_string(&file_path, "A=\"1\"\n", 0o644).unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "A=\"1\"\n");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir").join("secrets.env");

        write_atomic_string(&file_path, "Test", 0o644).unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "Test");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secrets.env");

        fs::write(&file_path, "Old content").unwrap();
        write_atomic_string(&file_path, "New content", 0o644).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "New content");
        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_preserves_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secrets.env");
        fs::write(&file_path, "old").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o600)).unwrap();

        write_atomic_string(&file_path, "new", 0o644).unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_temp_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path().join(".pending.tmp");

        let file = create_temp(&temp_path, 0o644).unwrap();
        drop(file);

        let mode = fs::metadata(&temp_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & 0o077, 0);
        assert!(create_temp(&temp_path, 0o644).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_uses_default_mode_for_new_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("fresh.env");

        write_atomic_string(&file_path, "x", 0o640).unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
