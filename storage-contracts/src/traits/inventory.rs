// SPDX-License-Identifier: GPL-3.0-only

use storage_types::{LogicalVolumeRef, Volume, VolumeGroupInfo};

use crate::StorageError;

/// Read-only queries against the host's volume groups and logical volumes.
pub trait VolumeInventory {
    fn list_groups(&self) -> Result<Vec<VolumeGroupInfo>, StorageError>;

    fn list_volumes(&self, vg_name: &str) -> Result<Vec<LogicalVolumeRef>, StorageError>;

    /// `None` when `name` is not a volume group.
    fn group_info(&self, name: &str) -> Result<Option<VolumeGroupInfo>, StorageError>;

    /// `None` when `device_path` is not a managed logical volume.
    fn volume_info(&self, device_path: &str) -> Result<Option<Volume>, StorageError>;
}
