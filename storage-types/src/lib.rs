// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for LVM snapshot backups
//!
//! These types are shared by every layer of the stack:
//!
//! - **storage-contracts**: collaborator traits are expressed in these types
//! - **storage-sys**: parses host tool output into these types
//! - **storage-backup**: drives the snapshot lifecycle with them
//!
//! All inventory and mount-table values are read-only snapshots of host
//! state taken at lookup time.

pub mod common;
pub mod lvm;
pub mod mount;
pub mod operation;
pub mod snapshot;

pub use common::{UnitError, bytes_to_pretty, parse_size};
pub use lvm::{LogicalVolumeRef, Volume, VolumeGroupInfo, lv_device_path, lv_mapper_path};
pub use mount::{MountInfo, SWAP_FS_TYPE};
pub use operation::{Operation, OperationRequest, ToolOptions};
pub use snapshot::{SNAPSHOT_SUFFIX, SnapshotSizing, SnapshotSpec};
