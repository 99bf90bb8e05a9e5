// SPDX-License-Identifier: GPL-3.0-only

//! Point-in-time backups of LVM logical volumes
//!
//! Each selected volume is snapshotted, the snapshot is mounted read-only,
//! an external incremental backup tool archives the mounted tree, and the
//! snapshot is torn down again. The host is reached only through the
//! collaborator traits of `storage-contracts`; `storage-sys` provides the
//! real implementations.

pub mod batch;
pub mod command;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod lookup;
pub mod policy;
pub mod resolver;

pub use batch::{BatchResult, BatchRunner, Collaborators};
pub use config::{Cli, Configuration, DestinationConfig, LogLevel, TargetSelection};
pub use error::{ConfigError, LifecycleError, LookupError, ResolveError};
pub use lifecycle::{LifecycleController, VolumeRun};
pub use lookup::{VolumeTarget, lookup_volume};
pub use resolver::{ResolvedTarget, resolve_targets};

/// Resolve the configured targets and process them one after another.
pub fn run(
    config: &Configuration,
    collaborators: Collaborators<'_>,
) -> Result<BatchResult, ResolveError> {
    let targets = resolve_targets(collaborators.inventory, &config.targets)?;
    Ok(BatchRunner::new(config, collaborators).run(&targets))
}
