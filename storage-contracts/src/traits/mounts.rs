// SPDX-License-Identifier: GPL-3.0-only

use storage_types::MountInfo;

use crate::StorageError;

pub trait MountTable {
    /// Entry whose device spec equals `device_path`, if any.
    fn lookup(&self, device_path: &str) -> Result<Option<MountInfo>, StorageError>;
}
