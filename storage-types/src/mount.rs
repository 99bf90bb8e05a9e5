//! Mount-table entry types

use serde::{Deserialize, Serialize};

/// Filesystem type marker used for swap entries
pub const SWAP_FS_TYPE: &str = "swap";

/// One mount-table entry for a block device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountInfo {
    /// Device spec as written in the table (e.g., "/dev/mapper/vg0-root")
    pub spec: String,

    /// Mount point path
    pub mount_point: String,

    /// Filesystem type (e.g., "ext4", "xfs", "swap")
    pub fs_type: String,

    /// Mount options, passed through verbatim
    pub options: String,
}

impl MountInfo {
    pub fn is_swap(&self) -> bool {
        self.fs_type == SWAP_FS_TYPE
    }

    /// An entry is usable only when every field is populated.
    pub fn is_complete(&self) -> bool {
        !self.spec.is_empty()
            && !self.mount_point.is_empty()
            && !self.fs_type.is_empty()
            && !self.options.is_empty()
    }

    /// Options for mounting a snapshot of this entry; always read-only.
    pub fn snapshot_mount_options(&self) -> String {
        if self.options.is_empty() {
            "ro".to_string()
        } else {
            format!("{},ro", self.options)
        }
    }
}
