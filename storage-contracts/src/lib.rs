// SPDX-License-Identifier: GPL-3.0-only

//! Contracts between the snapshot backup engine and the host.
//!
//! The engine only talks to volume inventory, mount table, snapshot
//! mechanism and backup tool through these traits.

pub mod error;
pub mod traits;

pub use error::{StorageError, StorageErrorKind};
pub use traits::{BackupTool, MountTable, SnapshotOps, VolumeInventory};
