// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot mechanism backed by the host's LVM and mount tools

use std::fs;
use std::path::Path;

use storage_contracts::{SnapshotOps, StorageError};

use crate::cmd::CommandRunner;
use crate::logical::LvmTools;
use crate::mounts;

#[derive(Debug, Clone, Copy, Default)]
pub struct HostSnapshotOps {
    runner: CommandRunner,
    lvm: LvmTools,
}

impl HostSnapshotOps {
    pub fn new(runner: CommandRunner) -> Self {
        Self {
            runner,
            lvm: LvmTools::new(runner),
        }
    }
}

impl SnapshotOps for HostSnapshotOps {
    fn create_snapshot(
        &self,
        source: &str,
        size_kib: u64,
        name: &str,
    ) -> Result<(), StorageError> {
        Ok(self.lvm.create_snapshot(source, size_kib, name)?)
    }

    fn remove_snapshot(&self, name: &str, force: bool) -> Result<(), StorageError> {
        Ok(self.lvm.remove_snapshot(name, force)?)
    }

    fn mount(
        &self,
        device: &str,
        fs_type: &str,
        options: &str,
        dir: &Path,
    ) -> Result<(), StorageError> {
        Ok(mounts::mount(&self.runner, device, fs_type, options, dir)?)
    }

    fn unmount(&self, dir: &Path) -> Result<(), StorageError> {
        Ok(mounts::unmount(&self.runner, dir)?)
    }

    fn ensure_directory(&self, dir: &Path) -> Result<(), StorageError> {
        if dir.is_dir() {
            return Ok(());
        }
        if self.runner.is_dry_run() {
            self.runner.echo(&format!("mkdir -p {}", dir.display()));
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(crate::SysError::from)?;
        Ok(())
    }

    fn remove_directory(&self, dir: &Path) -> Result<(), StorageError> {
        if self.runner.is_dry_run() {
            self.runner.echo(&format!("rmdir {}", dir.display()));
            return Ok(());
        }
        fs::remove_dir(dir).map_err(crate::SysError::from)?;
        Ok(())
    }
}
