//! Ownership snapshots and changes
//!
//! Tests take an [`Ownership`] snapshot before and after a converge to prove
//! that a record-only run left the filesystem alone. The `file` and
//! `directory` providers use [`chown`] when their type is stepped into.

use std::fs;

use crate::{Error, NormalizedPath, Result};

const PASSWD: &str = "/etc/passwd";
const GROUP: &str = "/etc/group";

/// Numeric owner and group of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

/// Take an ownership snapshot of `path`.
#[cfg(unix)]
pub fn owner_and_group(path: impl AsRef<std::path::Path>) -> Result<Ownership> {
    use std::os::unix::fs::MetadataExt;

    let path = path.as_ref();
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::io(path, e))?;
    Ok(Ownership {
        uid: metadata.uid(),
        gid: metadata.gid(),
    })
}

#[cfg(not(unix))]
pub fn owner_and_group(_path: impl AsRef<std::path::Path>) -> Result<Ownership> {
    Err(Error::Unsupported {
        operation: "reading ownership".into(),
    })
}

/// Resolve a user name (or numeric id) to a uid through the system user database.
#[cfg(unix)]
pub fn resolve_user(name: &str) -> Result<u32> {
    if let Ok(id) = name.parse::<u32>() {
        return Ok(id);
    }
    nix::unistd::User::from_name(name)
        .ok()
        .flatten()
        .map(|user| user.uid.as_raw())
        .ok_or_else(|| Error::UnknownUser {
            name: name.to_string(),
        })
}

/// Resolve a group name (or numeric id) to a gid through the system group database.
#[cfg(unix)]
pub fn resolve_group(name: &str) -> Result<u32> {
    if let Ok(id) = name.parse::<u32>() {
        return Ok(id);
    }
    nix::unistd::Group::from_name(name)
        .ok()
        .flatten()
        .map(|group| group.gid.as_raw())
        .ok_or_else(|| Error::UnknownGroup {
            name: name.to_string(),
        })
}

/// Change owner and/or group of `path`. Returns `true` when anything changed.
#[cfg(unix)]
pub fn chown(path: &NormalizedPath, owner: Option<&str>, group: Option<&str>) -> Result<bool> {
    if owner.is_none() && group.is_none() {
        return Ok(false);
    }
    let uid = owner.map(resolve_user).transpose()?;
    let gid = group.map(resolve_group).transpose()?;

    let current = owner_and_group(path)?;
    if uid.is_none_or(|u| u == current.uid) && gid.is_none_or(|g| g == current.gid) {
        return Ok(false);
    }

    let native_path = path.to_native();
    nix::unistd::chown(
        &native_path,
        uid.map(nix::unistd::Uid::from_raw),
        gid.map(nix::unistd::Gid::from_raw),
    )
    .map_err(|errno| Error::io(&native_path, std::io::Error::from(errno)))?;
    tracing::debug!(path = %path, ?uid, ?gid, "changed ownership");
    Ok(true)
}

#[cfg(not(unix))]
pub fn chown(_path: &NormalizedPath, owner: Option<&str>, group: Option<&str>) -> Result<bool> {
    if owner.is_none() && group.is_none() {
        return Ok(false);
    }
    Err(Error::Unsupported {
        operation: "changing ownership".into(),
    })
}
