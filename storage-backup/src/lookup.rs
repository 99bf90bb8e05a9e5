// SPDX-License-Identifier: GPL-3.0-only

//! Volume and mount metadata for one device path

use storage_contracts::{MountTable, StorageError, VolumeInventory};
use storage_types::{MountInfo, Volume};
use tracing::debug;

use crate::error::LookupError;

/// A volume that passed validation and can be handed to the lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeTarget {
    pub device_path: String,
    pub volume: Volume,
    pub mount: MountInfo,
}

pub fn lookup_volume(
    inventory: &dyn VolumeInventory,
    mounts: &dyn MountTable,
    device_path: &str,
) -> Result<VolumeTarget, LookupError> {
    let query_error = |source: StorageError| LookupError::Query {
        device: device_path.to_string(),
        source,
    };

    let volume = inventory
        .volume_info(device_path)
        .map_err(query_error)?
        .ok_or_else(|| LookupError::NotALogicalVolume(device_path.to_string()))?;

    let mount = match complete_entry(mounts, device_path).map_err(query_error)? {
        Some(mount) => mount,
        None => {
            let alias = volume.alias_for(device_path);
            debug!("{device_path} not in mount table, trying {alias}");
            complete_entry(mounts, &alias)
                .map_err(query_error)?
                .ok_or_else(|| LookupError::NoMountEntry(device_path.to_string()))?
        }
    };

    if mount.is_swap() {
        return Err(LookupError::SwapFilesystem(device_path.to_string()));
    }

    Ok(VolumeTarget {
        device_path: device_path.to_string(),
        volume,
        mount,
    })
}

fn complete_entry(
    mounts: &dyn MountTable,
    device_path: &str,
) -> Result<Option<MountInfo>, StorageError> {
    Ok(mounts
        .lookup(device_path)?
        .filter(MountInfo::is_complete))
}
