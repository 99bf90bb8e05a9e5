// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use crate::StorageError;

/// Snapshot and mount mechanism.
///
/// Implementations decide how each step is carried out (or merely echoed in
/// a dry run); callers decide when.
pub trait SnapshotOps {
    fn create_snapshot(
        &self,
        source: &str,
        size_kib: u64,
        name: &str,
    ) -> Result<(), StorageError>;

    /// `name` is qualified as `<group>/<snapshot>`.
    fn remove_snapshot(&self, name: &str, force: bool) -> Result<(), StorageError>;

    fn mount(
        &self,
        device: &str,
        fs_type: &str,
        options: &str,
        dir: &Path,
    ) -> Result<(), StorageError>;

    fn unmount(&self, dir: &Path) -> Result<(), StorageError>;

    /// Create `dir` and its parents if missing.
    fn ensure_directory(&self, dir: &Path) -> Result<(), StorageError>;

    /// Remove `dir` if it is empty.
    fn remove_directory(&self, dir: &Path) -> Result<(), StorageError>;
}
