// SPDX-License-Identifier: GPL-3.0-only

pub mod backup_tool;
pub mod inventory;
pub mod mounts;
pub mod snapshot;

pub use backup_tool::BackupTool;
pub use inventory::VolumeInventory;
pub use mounts::MountTable;
pub use snapshot::SnapshotOps;
