// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use storage_contracts::StorageError;
use storage_types::UnitError;
use thiserror::Error;

/// Usage errors, raised before any volume is touched
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Clap(#[from] clap::Error),

    #[error("configuration file {path:?}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },

    #[error(transparent)]
    InvalidSize(#[from] UnitError),

    #[error("snapshot size ratio must be at least 1, got {0}")]
    InvalidRatio(u64),

    #[error(transparent)]
    Targets(ResolveError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("--all cannot be combined with explicit volume groups or devices")]
    ConflictingTargetSpecification,

    #[error("no volume group or device given; use --all to back up every volume")]
    NoTargetSpecified,

    #[error("volume inventory query failed: {0}")]
    Inventory(#[from] StorageError),
}

/// Per-volume validation failures
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0} is not a logical volume")]
    NotALogicalVolume(String),

    #[error("{0} has no mount-table entry")]
    NoMountEntry(String),

    #[error("{0} is a swap volume")]
    SwapFilesystem(String),

    #[error("metadata lookup for {device} failed: {source}")]
    Query {
        device: String,
        #[source]
        source: StorageError,
    },
}

impl LookupError {
    /// Skips that may stay silent during discovery (`--all`) runs.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NoMountEntry(_) | Self::SwapFilesystem(_))
    }
}

/// Failures of one lifecycle step
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("cannot prepare directory {dir:?}: {source}")]
    PrepareDirectory {
        dir: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("cannot create snapshot {name}: {source}")]
    CreateSnapshot {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("cannot mount snapshot on {dir:?}: {source}")]
    Mount {
        dir: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("cannot run backup tool: {0}")]
    ToolLaunch(#[source] StorageError),

    #[error("backup tool exited with status {0}")]
    ToolExit(i32),

    #[error("cannot unmount {dir:?}: {source}")]
    Unmount {
        dir: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("cannot remove snapshot {name}: {source}")]
    RemoveSnapshot {
        name: String,
        #[source]
        source: StorageError,
    },
}

impl LifecycleError {
    /// Volume status this failure stands for.
    pub fn status(&self) -> i32 {
        match self {
            Self::ToolExit(code) => *code,
            _ => 1,
        }
    }
}
