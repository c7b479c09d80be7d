//! Atomic I/O operations used by the real-execution providers

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use tracing::warn;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access. An existing file's
/// permissions and ownership carry over to the replacement, and the temp file
/// is removed when any step fails.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let result = write_temp(&temp_path, &native_path, content)
        .and_then(|()| fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e)));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp(temp_path: &Path, native_path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    if let Ok(existing) = fs::metadata(native_path) {
        fs::set_permissions(temp_path, existing.permissions())
            .map_err(|e| Error::io(temp_path, e))?;
        keep_ownership(temp_path, &existing);
    }

    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })
}

/// Hand the replacement the owner of the file it replaces. Only privileged
/// processes can give files away, so a refusal is logged and the write goes on.
#[cfg(unix)]
fn keep_ownership(temp_path: &Path, existing: &fs::Metadata) {
    use std::os::unix::fs::MetadataExt;

    let Ok(current) = fs::metadata(temp_path) else {
        return;
    };
    if current.uid() == existing.uid() && current.gid() == existing.gid() {
        return;
    }
    if let Err(errno) = nix::unistd::chown(
        temp_path,
        Some(nix::unistd::Uid::from_raw(existing.uid())),
        Some(nix::unistd::Gid::from_raw(existing.gid())),
    ) {
        warn!(path = %temp_path.display(), %errno, "could not keep ownership of replaced file");
    }
}

#[cfg(not(unix))]
fn keep_ownership(_temp_path: &Path, _existing: &fs::Metadata) {}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read raw bytes from a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Remove a file or symlink. Returns `false` when nothing was there.
pub fn remove_file(path: &NormalizedPath) -> Result<bool> {
    if !path.exists() && !path.is_symlink() {
        return Ok(false);
    }
    let native_path = path.to_native();
    fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(true)
}

/// Create a directory. Returns `false` when it already existed.
pub fn create_dir(path: &NormalizedPath, recursive: bool) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    let native_path = path.to_native();
    let created = if recursive {
        fs::create_dir_all(&native_path)
    } else {
        fs::create_dir(&native_path)
    };
    created.map_err(|e| Error::io(&native_path, e))?;
    Ok(true)
}

/// Remove a directory. Returns `false` when nothing was there.
pub fn remove_dir(path: &NormalizedPath, recursive: bool) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let native_path = path.to_native();
    let removed = if recursive {
        fs::remove_dir_all(&native_path)
    } else {
        fs::remove_dir(&native_path)
    };
    removed.map_err(|e| Error::io(&native_path, e))?;
    Ok(true)
}

/// Update the modification time of a file, creating it if missing.
pub fn touch(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&native_path)
        .map_err(|e| Error::io(&native_path, e))?;
    file.set_modified(std::time::SystemTime::now())
        .map_err(|e| Error::io(&native_path, e))
}

/// Apply an octal permission string such as `"0644"`.
#[cfg(unix)]
pub fn set_mode(path: &NormalizedPath, mode: u32) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let native_path = path.to_native();
    let metadata = fs::metadata(&native_path).map_err(|e| Error::io(&native_path, e))?;
    if metadata.permissions().mode() & 0o7777 == mode {
        return Ok(false);
    }
    fs::set_permissions(&native_path, fs::Permissions::from_mode(mode))
        .map_err(|e| Error::io(&native_path, e))?;
    Ok(true)
}

#[cfg(not(unix))]
pub fn set_mode(_path: &NormalizedPath, _mode: u32) -> Result<bool> {
    Err(Error::Unsupported {
        operation: "setting file modes".into(),
    })
}

/// Create a symbolic link at `link` pointing to `target`.
#[cfg(unix)]
pub fn symlink(target: &str, link: &NormalizedPath) -> Result<bool> {
    let native_link = link.to_native();
    if let Ok(existing) = fs::read_link(&native_link) {
        if existing.to_string_lossy() == target {
            return Ok(false);
        }
        fs::remove_file(&native_link).map_err(|e| Error::io(&native_link, e))?;
    }
    std::os::unix::fs::symlink(target, &native_link).map_err(|e| Error::io(&native_link, e))?;
    Ok(true)
}

#[cfg(not(unix))]
pub fn symlink(_target: &str, _link: &NormalizedPath) -> Result<bool> {
    Err(Error::Unsupported {
        operation: "creating symlinks".into(),
    })
}

/// Parse an octal mode string (`"644"`, `"0755"`).
pub fn parse_mode(mode: &str) -> Option<u32> {
    u32::from_str_radix(mode.trim_start_matches("0o"), 8).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mode_accepts_leading_zero() {
        assert_eq!(parse_mode("0644"), Some(0o644));
        assert_eq!(parse_mode("755"), Some(0o755));
        assert_eq!(parse_mode("rwx"), None);
    }

    #[test]
    fn remove_file_reports_absence() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("missing.txt"));
        assert!(!remove_file(&path).unwrap());
    }
}
