use std::path::PathBuf;

use storage_backup::{
    BatchResult, Collaborators, Configuration, DestinationConfig, TargetSelection, VolumeTarget,
    lookup_volume,
};
use storage_types::{Operation, SnapshotSizing};

use super::fakes::FakeHost;

pub const GB: u64 = 1_000_000_000;
pub const MOUNT_BASE: &str = "/run/lvm-backup-test";

pub fn collaborators(host: &FakeHost) -> Collaborators<'_> {
    Collaborators {
        inventory: host,
        mounts: host,
        ops: host,
        tool: host,
    }
}

/// Explicit-target configuration backing up to `file:///backups`.
pub fn config(names: &[&str]) -> Configuration {
    Configuration {
        targets: TargetSelection {
            all: false,
            names: names.iter().map(|name| name.to_string()).collect(),
        },
        destination: DestinationConfig {
            dir: Some("/backups".to_string()),
            ..DestinationConfig::default()
        },
        snapshot_mount_base: PathBuf::from(MOUNT_BASE),
        ..Configuration::default()
    }
}

pub fn all_config() -> Configuration {
    let mut config = config(&[]);
    config.targets.all = true;
    config
}

pub fn with_operation(mut config: Configuration, operation: Operation) -> Configuration {
    config.request.operation = operation;
    config
}

pub fn with_sizing(mut config: Configuration, ratio: u64, min: u64, max: u64) -> Configuration {
    config.sizing = SnapshotSizing { ratio, min, max };
    config
}

pub fn target(host: &FakeHost, device: &str) -> VolumeTarget {
    lookup_volume(host, host, device).expect("volume passes lookup")
}

pub fn run(config: &Configuration, host: &FakeHost) -> BatchResult {
    storage_backup::run(config, collaborators(host)).expect("targets resolve")
}
