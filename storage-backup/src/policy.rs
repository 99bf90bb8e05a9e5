// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot size policy

use storage_types::{SnapshotSizing, Volume};

/// Snapshot size in bytes for a volume.
///
/// Applied in a fixed order, truncating at each step: divide by the ratio,
/// raise to the minimum, lower to the maximum (when non-zero), then lower to
/// the group's free space.
pub fn snapshot_size(volume_size: u64, vg_free: u64, sizing: &SnapshotSizing) -> u64 {
    let mut size = volume_size / sizing.ratio.max(1);
    size = size.max(sizing.min);
    if sizing.max > 0 {
        size = size.min(sizing.max);
    }
    size.min(vg_free)
}

pub fn snapshot_size_for(volume: &Volume, sizing: &SnapshotSizing) -> u64 {
    snapshot_size(volume.size, volume.vg_free, sizing)
}
