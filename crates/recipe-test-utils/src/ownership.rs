//! Ownership snapshots for "nothing changed on disk" assertions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use recipe_fs::{Ownership, owner_and_group};

/// Owner and group of a set of paths at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipSnapshot {
    entries: BTreeMap<PathBuf, Ownership>,
}

impl OwnershipSnapshot {
    /// Snapshot every path in `paths`.
    ///
    /// # Panics
    /// Panics if any path cannot be inspected.
    pub fn take<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        let entries = paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref().to_path_buf();
                let ownership = owner_and_group(&path)
                    .unwrap_or_else(|e| panic!("Could not snapshot {}: {e}", path.display()));
                (path, ownership)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Ownership> {
        self.entries.get(path.as_ref()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
