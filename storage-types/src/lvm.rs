//! LVM (Logical Volume Manager) types
//!
//! Read-only views of volume group and logical volume state, as returned by
//! the volume inventory at lookup time.

use serde::{Deserialize, Serialize};

/// Volume group information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeGroupInfo {
    /// Volume group name
    pub name: String,
}

/// Logical volume reference inside a group, as listed by the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalVolumeRef {
    /// Parent volume group name
    pub vg_name: String,

    /// Logical volume name
    pub name: String,
}

impl LogicalVolumeRef {
    pub fn new(vg_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vg_name: vg_name.into(),
            name: name.into(),
        }
    }

    /// Device path under `/dev/<group>/<volume>`
    pub fn device_path(&self) -> String {
        lv_device_path(&self.vg_name, &self.name)
    }
}

/// Logical volume with the sizing data needed for snapshot provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Parent volume group name
    pub vg_name: String,

    /// Logical volume name
    pub name: String,

    /// Size in bytes
    pub size: u64,

    /// Free space of the parent volume group in bytes
    pub vg_free: u64,
}

impl Volume {
    /// `/dev/<group>/<volume>`
    pub fn device_path(&self) -> String {
        lv_device_path(&self.vg_name, &self.name)
    }

    /// `/dev/mapper/<group>-<volume>` with device-mapper escaping
    pub fn mapper_path(&self) -> String {
        lv_mapper_path(&self.vg_name, &self.name)
    }

    /// The other device-node spelling for this volume.
    ///
    /// Returns the mapper path unless `path` already is the mapper path.
    pub fn alias_for(&self, path: &str) -> String {
        let mapper = self.mapper_path();
        if path == mapper {
            self.device_path()
        } else {
            mapper
        }
    }

    /// `<group>-<volume>`, used for archive and directory names
    pub fn qualified_name(&self) -> String {
        format!("{}-{}", self.vg_name, self.name)
    }
}

pub fn lv_device_path(vg_name: &str, lv_name: &str) -> String {
    format!("/dev/{vg_name}/{lv_name}")
}

/// Device-mapper doubles any `-` inside the group and volume names.
pub fn lv_mapper_path(vg_name: &str, lv_name: &str) -> String {
    format!(
        "/dev/mapper/{}-{}",
        vg_name.replace('-', "--"),
        lv_name.replace('-', "--")
    )
}
