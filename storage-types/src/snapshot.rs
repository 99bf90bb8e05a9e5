//! Snapshot provisioning types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::lvm::{Volume, lv_device_path};

/// Suffix appended to the source volume name to form the snapshot name
pub const SNAPSHOT_SUFFIX: &str = "-snapshot";

/// Sizing limits for snapshot volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSizing {
    /// Volume size is divided by this ratio; always at least 1
    pub ratio: u64,

    /// Lower bound in bytes
    pub min: u64,

    /// Upper bound in bytes; 0 means no upper bound
    pub max: u64,
}

impl Default for SnapshotSizing {
    fn default() -> Self {
        Self {
            ratio: 1,
            min: 0,
            max: 0,
        }
    }
}

/// Ephemeral description of one snapshot, valid for a single lifecycle run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSpec {
    /// Group holding both the source volume and its snapshot
    pub vg_name: String,

    /// Source device path
    pub source: String,

    /// Snapshot volume name (`<volume>-snapshot`)
    pub name: String,

    /// Snapshot size in bytes
    pub size: u64,

    /// Directory the snapshot is mounted on
    pub mount_dir: PathBuf,
}

impl SnapshotSpec {
    pub fn for_volume(volume: &Volume, size: u64, mount_base: &Path) -> Self {
        Self {
            vg_name: volume.vg_name.clone(),
            source: volume.device_path(),
            name: format!("{}{}", volume.name, SNAPSHOT_SUFFIX),
            size,
            mount_dir: mount_base.join(volume.qualified_name()),
        }
    }

    /// Size as whole kibibytes, truncated
    pub fn size_kib(&self) -> u64 {
        self.size / 1024
    }

    pub fn device_path(&self) -> String {
        lv_device_path(&self.vg_name, &self.name)
    }

    /// `<group>/<snapshot>` as accepted by the removal tool
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.vg_name, self.name)
    }
}
